//! The [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193) provider interface.

use crate::error::ProviderRpcError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{borrow::Cow, fmt};

/// Arguments of an EIP-1193 `request` call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestArguments {
    pub method: Cow<'static, str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl RequestArguments {
    /// Creates a request without params.
    pub fn new(method: impl Into<Cow<'static, str>>) -> Self {
        Self { method: method.into(), params: None }
    }

    /// Creates a request with positional params.
    pub fn with_params(method: impl Into<Cow<'static, str>>, params: Value) -> Self {
        Self { method: method.into(), params: Some(params) }
    }
}

/// A wallet-supplied provider.
///
/// Implementations forward the request to the wallet and return the raw JSON result, or the
/// wallet's [`ProviderRpcError`].
#[async_trait]
pub trait Eip1193Provider: fmt::Debug + Send + Sync {
    /// Submits a request to the wallet.
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderRpcError>;
}

impl dyn Eip1193Provider {
    /// Submits `method` with `params` and deserializes the result.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<T, ProviderRpcError> {
        let params = if params.is_null() { None } else { Some(params) };
        let value = self.request(RequestArguments { method: method.into(), params }).await?;
        trace!(method, %value, "wallet response");
        serde_json::from_value(value).map_err(|err| {
            ProviderRpcError::internal_error_with(format!("invalid `{method}` response: {err}"))
        })
    }
}
