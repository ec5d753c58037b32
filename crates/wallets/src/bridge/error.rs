use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum BrowserBridgeError {
    #[error("failed to bind browser bridge: {0}")]
    Bind(#[source] std::io::Error),
    #[error("browser bridge is already running")]
    AlreadyRunning,
    #[error("no browser page connected within {0:?}, open the bridge URL in your browser")]
    PageTimeout(Duration),
    #[error("browser bridge shut down")]
    Closed,
}
