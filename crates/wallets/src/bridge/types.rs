use crate::{error::ProviderRpcError, provider::RequestArguments};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A wallet request waiting to be picked up by the page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BridgeRequest {
    pub id: Uuid,
    /// uuid of the announced wallet to use, `None` for `window.ethereum`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(flatten)]
    pub args: RequestArguments,
}

/// The page's answer to a [`BridgeRequest`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub id: Uuid,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<ProviderRpcError>,
}

/// What the page found in the browser.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStatus {
    /// Whether `window.ethereum` is present.
    pub injected: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum BrowserApiResponse<T> {
    Ok(T),
    Error { message: String },
}

impl BrowserApiResponse<()> {
    pub(crate) fn ok() -> Self {
        Self::Ok(())
    }
}

impl<T> BrowserApiResponse<T> {
    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }
}
