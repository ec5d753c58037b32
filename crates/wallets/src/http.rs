//! An [`Eip1193Provider`] backed by a JSON-RPC endpoint.

use crate::{
    error::{ErrorCode, ProviderRpcError},
    provider::{Eip1193Provider, RequestArguments},
};
use alloy_json_rpc::RpcError;
use alloy_rpc_client::{ClientBuilder, RpcClient};
use alloy_transport::TransportError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use url::Url;

/// Talks to a node or wallet daemon over HTTP.
///
/// The endpoint is expected to hold unlocked accounts: `eth_requestAccounts` is answered with
/// `eth_accounts` since there is nobody to prompt.
#[derive(Clone)]
pub struct HttpProvider {
    url: Url,
    client: RpcClient,
}

impl HttpProvider {
    pub fn new(url: Url) -> Self {
        let client = ClientBuilder::default().http(url.clone());
        Self { url, client }
    }

    /// Parses `url` and creates a provider for it.
    pub fn try_new(url: &str) -> Result<Self, url::ParseError> {
        Url::parse(url).map(Self::new)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpProvider").field("url", &self.url.as_str()).finish()
    }
}

#[async_trait]
impl Eip1193Provider for HttpProvider {
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderRpcError> {
        let RequestArguments { method, params } = args;
        let method = if method == "eth_requestAccounts" { "eth_accounts".into() } else { method };
        let params = params.unwrap_or_else(|| Value::Array(Vec::new()));

        trace!(url = %self.url, %method, "json-rpc request");
        self.client.request::<_, Value>(method, params).await.map_err(into_provider_error)
    }
}

/// Converts a transport level error into the EIP-1193 error a wallet would have returned.
fn into_provider_error(err: TransportError) -> ProviderRpcError {
    match err {
        RpcError::ErrorResp(payload) => ProviderRpcError {
            code: ErrorCode::from(payload.code),
            message: payload.message,
            data: payload.data.and_then(|raw| serde_json::from_str(raw.get()).ok()),
        },
        err => ProviderRpcError::with_message(ErrorCode::Disconnected, err.to_string()),
    }
}
