//! Waiting for a transaction to be mined.

use std::{sync::Arc, time::Duration};

use alloy_primitives::{TxHash, U64};
use oxie_wallets::Eip1193Provider;
use serde::Deserialize;
use serde_json::json;

use crate::error::MintError;

/// The parts of a transaction receipt the mint flow looks at.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintReceipt {
    pub transaction_hash: TxHash,
    #[serde(default)]
    pub block_number: Option<U64>,
    /// `None` for pre-Byzantium receipts, which carry a state root instead.
    #[serde(default)]
    pub status: Option<U64>,
}

impl MintReceipt {
    /// Returns `false` if the transaction was mined but reverted.
    pub fn succeeded(&self) -> bool {
        self.status.is_none_or(|status| status == U64::from(1))
    }
}

/// Polls `eth_getTransactionReceipt` every `interval` until the transaction is mined.
///
/// Gives up with [`MintError::Timeout`] after `timeout`.
pub async fn wait_for_receipt(
    provider: &Arc<dyn Eip1193Provider>,
    hash: TxHash,
    interval: Duration,
    timeout: Duration,
) -> Result<MintReceipt, MintError> {
    tokio::time::timeout(timeout, poll_receipt(provider, hash, interval))
        .await
        .map_err(|_| MintError::Timeout(hash))?
}

async fn poll_receipt(
    provider: &Arc<dyn Eip1193Provider>,
    hash: TxHash,
    interval: Duration,
) -> Result<MintReceipt, MintError> {
    loop {
        let receipt = provider
            .call::<Option<MintReceipt>>("eth_getTransactionReceipt", json!([hash]))
            .await?;
        if let Some(receipt) = receipt {
            trace!(%hash, block = ?receipt.block_number, "transaction mined");
            return Ok(receipt);
        }
        tokio::time::sleep(interval).await;
    }
}
