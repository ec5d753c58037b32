use alloy_primitives::Address;

/// Shortens an address for display: `0x282f...Ca66`.
pub fn format_address(address: &Address) -> String {
    let checksummed = address.to_checksum(None);
    format!("{}...{}", &checksummed[..6], &checksummed[checksummed.len() - 4..])
}
