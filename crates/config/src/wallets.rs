//! Statically configured wallet endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A JSON-RPC wallet endpoint that is announced to the provider registry on startup, the same
/// way a browser extension announces itself through EIP-6963.
///
/// ```toml
/// [[profile.default.wallets]]
/// name = "Local Anvil"
/// rdns = "sh.foundry.anvil"
/// url = "http://localhost:8545"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletEndpoint {
    /// Human-readable wallet name.
    pub name: String,
    /// Reverse-DNS identifier, e.g. `io.rabby`.
    pub rdns: String,
    /// Icon as a data URI.
    #[serde(default)]
    pub icon: String,
    /// Stable identifier. A name-based UUID of `rdns` and `url` is used when not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// JSON-RPC endpoint of the wallet.
    pub url: String,
}

impl WalletEndpoint {
    /// Returns the configured uuid, or a deterministic one derived from `rdns` and `url`.
    pub fn uuid(&self) -> String {
        self.uuid.clone().unwrap_or_else(|| {
            let name = format!("{}@{}", self.rdns, self.url);
            Uuid::new_v5(&Uuid::NAMESPACE_URL, name.as_bytes()).to_string()
        })
    }
}
