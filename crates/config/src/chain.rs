//! Target chain parameters.
//!
//! The serialized form of [`ChainParams`] is the
//! [EIP-3085](https://eips.ethereum.org/EIPS/eip-3085) `wallet_addEthereumChain` payload, so the
//! same value can be handed to a wallet verbatim.

use crate::serde_helpers;
use serde::{Deserialize, Serialize};

/// Sei EVM mainnet (`pacific-1`).
pub const SEI_CHAIN_ID: u64 = 1329;

/// Native currency descriptor of a chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Parameters of the chain the wallet must be switched to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainParams {
    /// EIP-155 chain id, serialized as a `0x`-prefixed quantity.
    #[serde(with = "serde_helpers::chain_id")]
    pub chain_id: u64,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    #[serde(default)]
    pub block_explorer_urls: Vec<String>,
}

impl ChainParams {
    /// Sei EVM mainnet parameters.
    pub fn sei() -> Self {
        Self {
            chain_id: SEI_CHAIN_ID,
            chain_name: "Sei Network".to_string(),
            native_currency: NativeCurrency {
                name: "SEI".to_string(),
                symbol: "SEI".to_string(),
                decimals: 18,
            },
            rpc_urls: vec!["https://evm-rpc.sei-apis.com".to_string()],
            block_explorer_urls: vec!["https://seitrace.com".to_string()],
        }
    }

    /// Returns the chain id as the hex quantity wallets expect, e.g. `0x531`.
    pub fn hex_chain_id(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// Returns the first configured block explorer, without a trailing slash.
    pub fn explorer(&self) -> Option<&str> {
        self.block_explorer_urls.first().map(|url| url.trim_end_matches('/'))
    }
}

impl Default for ChainParams {
    fn default() -> Self {
        Self::sei()
    }
}
