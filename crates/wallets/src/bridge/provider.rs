use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;
use uuid::Uuid;

use super::{state::BridgeState, types::BridgeRequest};
use crate::{
    error::{ErrorCode, ProviderRpcError},
    provider::{Eip1193Provider, RequestArguments},
};

const RESPONSE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Forwards requests to a wallet in the browser page.
///
/// The request is queued until the page picks it up, then the provider polls for the page's
/// answer until the bridge timeout elapses.
#[derive(Clone)]
pub struct BrowserProvider {
    state: Arc<BridgeState>,
    /// uuid of the announced wallet, `None` for `window.ethereum`.
    target: Option<String>,
}

impl BrowserProvider {
    pub(crate) fn new(state: Arc<BridgeState>, target: Option<String>) -> Self {
        Self { state, target }
    }

    /// Returns the uuid of the wallet this provider talks to.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

impl fmt::Debug for BrowserProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserProvider").field("target", &self.target).finish_non_exhaustive()
    }
}

#[async_trait]
impl Eip1193Provider for BrowserProvider {
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderRpcError> {
        let id = Uuid::new_v4();
        let method = args.method.clone();
        trace!(%id, %method, target = ?self.target, "queueing browser request");
        self.state.add_request(BridgeRequest { id, target: self.target.clone(), args });
        let _queued = Queued { state: &self.state, id };

        let timeout = self.state.timeout();
        let start = Instant::now();
        loop {
            if let Some(response) = self.state.take_response(&id) {
                return match response.error {
                    Some(err) => Err(err),
                    None => Ok(response.result.unwrap_or(Value::Null)),
                };
            }

            if start.elapsed() > timeout {
                return Err(ProviderRpcError::with_message(
                    ErrorCode::Disconnected,
                    format!("browser did not answer `{method}` within {timeout:?}"),
                ));
            }

            tokio::time::sleep(RESPONSE_POLL_INTERVAL).await;
        }
    }
}

/// Removes a request from the queue once its caller is done with it, also when the caller stops
/// waiting, so a late answer of the page is rejected instead of kept.
struct Queued<'a> {
    state: &'a BridgeState,
    id: Uuid,
}

impl Drop for Queued<'_> {
    fn drop(&mut self) {
        self.state.remove_request(&self.id);
    }
}
