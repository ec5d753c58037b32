use alloy_primitives::TxHash;
use oxie_wallets::ProviderRpcError;

/// Message shown when a mint fails without a usable wallet message.
pub const MINT_FAILED: &str = "Failed to mint NFT.";

/// Errors of the mint flow, displayed as the user-facing status message.
#[derive(Debug, thiserror::Error)]
pub enum MintError {
    #[error("Transaction rejected by user.")]
    Rejected(#[source] ProviderRpcError),
    #[error("{}", failure_message(.0))]
    Provider(#[source] ProviderRpcError),
    #[error("Transaction reverted on-chain")]
    Reverted(TxHash),
    #[error("Transaction {0} was not confirmed in time")]
    Timeout(TxHash),
    #[error("invalid contract response: {0}")]
    Decode(#[from] alloy_sol_types::Error),
}

impl From<ProviderRpcError> for MintError {
    fn from(err: ProviderRpcError) -> Self {
        if err.is_user_rejection() { Self::Rejected(err) } else { Self::Provider(err) }
    }
}

fn failure_message(err: &ProviderRpcError) -> &str {
    if err.message.trim().is_empty() { MINT_FAILED } else { &err.message }
}
