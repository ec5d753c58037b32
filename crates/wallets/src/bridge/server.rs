use std::{sync::Arc, time::Duration};

use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

use super::{
    error::BrowserBridgeError,
    provider::BrowserProvider,
    router::build_router,
    state::BridgeState,
    types::PageStatus,
};
use crate::{discovery::DiscoveryBus, provider::Eip1193Provider};

/// Local HTTP server relaying EIP-1193 requests to the wallets of a browser page.
///
/// The page announces the EIP-6963 wallets it finds on the [`DiscoveryBus`] the bridge was
/// created with; `window.ethereum` is exposed through [`BrowserBridge::injected_provider`].
#[derive(Debug)]
pub struct BrowserBridge {
    port: u16,
    pub(super) state: Arc<BridgeState>,
    shutdown: Option<oneshot::Sender<()>>,
    server: Option<JoinHandle<()>>,
    announcer: Option<JoinHandle<()>>,
}

impl BrowserBridge {
    /// Creates a bridge listening on `port`, `0` picks a free one on start.
    pub fn new(port: u16, timeout: Duration, bus: DiscoveryBus) -> Self {
        Self {
            port,
            state: Arc::new(BridgeState::new(bus, timeout)),
            shutdown: None,
            server: None,
            announcer: None,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.state.timeout()
    }

    /// The URL to open in the browser.
    pub fn url(&self) -> String {
        format!("http://localhost:{}/", self.port)
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_some()
    }

    pub async fn start(&mut self) -> Result<(), BrowserBridgeError> {
        if self.is_running() {
            return Err(BrowserBridgeError::AlreadyRunning);
        }

        let listener =
            TcpListener::bind(("127.0.0.1", self.port)).await.map_err(BrowserBridgeError::Bind)?;
        self.port = listener.local_addr().map_err(BrowserBridgeError::Bind)?.port();

        let router = build_router(self.state.clone());
        let (tx, rx) = oneshot::channel::<()>();
        self.server = Some(tokio::spawn(async move {
            let shutdown = async {
                let _ = rx.await;
            };
            if let Err(err) = axum::serve(listener, router).with_graceful_shutdown(shutdown).await
            {
                error!(%err, "browser bridge failed");
            }
        }));
        self.announcer = Some(self.state.spawn_announcer());
        self.shutdown = Some(tx);

        info!(url = %self.url(), "browser bridge listening");
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), BrowserBridgeError> {
        if let Some(announcer) = self.announcer.take() {
            announcer.abort();
        }
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(server) = self.server.take() {
            server.await.map_err(|_| BrowserBridgeError::Closed)?;
        }
        debug!("browser bridge stopped");
        Ok(())
    }

    /// Waits until the page reported in.
    pub async fn wait_for_page(&self) -> Result<PageStatus, BrowserBridgeError> {
        let timeout = self.state.timeout();
        let mut page = self.state.subscribe_page();
        let status = tokio::time::timeout(timeout, page.wait_for(Option::is_some))
            .await
            .map_err(|_| BrowserBridgeError::PageTimeout(timeout))?
            .map_err(|_| BrowserBridgeError::Closed)?;
        Ok((*status).unwrap_or_default())
    }

    /// Returns what the page reported, if it connected.
    pub fn page_status(&self) -> Option<PageStatus> {
        self.state.page_status()
    }

    /// Returns the page's `window.ethereum`, if it has one.
    pub fn injected_provider(&self) -> Option<Arc<dyn Eip1193Provider>> {
        self.page_status()
            .filter(|status| status.injected)
            .map(|_| Arc::new(BrowserProvider::new(self.state.clone(), None)) as _)
    }

    /// Number of wallets the page announced.
    pub fn announced_wallets(&self) -> usize {
        self.state.announced().len()
    }
}
