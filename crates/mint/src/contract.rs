//! Bindings of the mint contract.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use alloy_rpc_types_eth::{TransactionInput, TransactionRequest};
use alloy_sol_types::{SolCall, sol};
use oxie_wallets::Eip1193Provider;
use serde_json::json;

use crate::error::MintError;

sol! {
    /// The Oxie NFT collection.
    interface IOxieMint {
        function mint() external payable;
        function totalSupply() external view returns (uint256);
    }
}

/// Returns the `eth_call` request reading `totalSupply()`.
pub fn total_supply_request(contract: Address) -> TransactionRequest {
    let calldata = IOxieMint::totalSupplyCall {}.abi_encode();
    TransactionRequest::default().to(contract).input(TransactionInput::both(calldata.into()))
}

/// Returns the `mint()` transaction sent from `from`.
pub fn mint_request(from: Address, contract: Address, value: U256, gas: u64) -> TransactionRequest {
    let calldata = IOxieMint::mintCall {}.abi_encode();
    let mut tx = TransactionRequest::default()
        .from(from)
        .to(contract)
        .value(value)
        .input(TransactionInput::both(calldata.into()));
    tx.gas = Some(gas);
    tx
}

/// Reads `totalSupply()` through the wallet.
pub async fn total_supply(
    provider: &Arc<dyn Eip1193Provider>,
    contract: Address,
) -> Result<U256, MintError> {
    let request = total_supply_request(contract);
    let data = provider.call::<Bytes>("eth_call", json!([request, "latest"])).await?;
    Ok(IOxieMint::totalSupplyCall::abi_decode_returns(&data)?)
}
