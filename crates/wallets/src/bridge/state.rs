use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::{
    sync::{broadcast::error::RecvError, watch},
    task::JoinHandle,
};
use uuid::Uuid;

use super::{
    provider::BrowserProvider,
    queue::RequestQueue,
    types::{BridgeRequest, BridgeResponse, PageStatus},
};
use crate::discovery::{DiscoveryBus, ProviderDetail, ProviderInfo};

#[derive(Debug)]
pub(crate) struct BridgeState {
    /// Token the page has to present on every API call.
    token: Arc<String>,
    /// Requests waiting for the page and their responses.
    queue: Mutex<RequestQueue>,
    /// Set once the page reported in.
    page: watch::Sender<Option<PageStatus>>,
    /// Wallets the page discovered, in announcement order.
    announced: Mutex<Vec<ProviderInfo>>,
    bus: DiscoveryBus,
    /// How long a request may wait for the page.
    timeout: Duration,
}

impl BridgeState {
    pub fn new(bus: DiscoveryBus, timeout: Duration) -> Self {
        Self {
            token: Arc::new(Uuid::new_v4().to_string()),
            queue: Mutex::new(RequestQueue::new()),
            page: watch::Sender::new(None),
            announced: Mutex::new(Vec::new()),
            bus,
            timeout,
        }
    }

    pub fn session_token(&self) -> Arc<String> {
        self.token.clone()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn add_request(&self, request: BridgeRequest) {
        self.queue.lock().add_request(request);
    }

    pub fn take_request(&self) -> Option<BridgeRequest> {
        self.queue.lock().take_request()
    }

    pub fn remove_request(&self, id: &Uuid) {
        self.queue.lock().remove_request(id);
    }

    /// Returns `false` if nobody is waiting for the response.
    pub fn add_response(&self, response: BridgeResponse) -> bool {
        self.queue.lock().add_response(response)
    }

    pub fn take_response(&self, id: &Uuid) -> Option<BridgeResponse> {
        self.queue.lock().take_response(id)
    }

    pub fn set_page_status(&self, status: PageStatus) {
        debug!(injected = status.injected, "browser page connected");
        self.page.send_replace(Some(status));
    }

    pub fn page_status(&self) -> Option<PageStatus> {
        *self.page.borrow()
    }

    pub fn subscribe_page(&self) -> watch::Receiver<Option<PageStatus>> {
        self.page.subscribe()
    }

    pub fn announced(&self) -> Vec<ProviderInfo> {
        self.announced.lock().clone()
    }

    /// Records a wallet the page discovered and announces it on the bus.
    ///
    /// Returns `false` if the wallet was already known.
    pub fn announce(self: &Arc<Self>, info: ProviderInfo) -> bool {
        {
            let mut announced = self.announced.lock();
            if announced.iter().any(|known| known.uuid == info.uuid) {
                return false;
            }
            announced.push(info.clone());
        }
        self.bus.announce(self.detail(info));
        true
    }

    fn detail(self: &Arc<Self>, info: ProviderInfo) -> ProviderDetail {
        let provider = BrowserProvider::new(self.clone(), Some(info.uuid.clone()));
        ProviderDetail::new(info, Arc::new(provider))
    }

    /// Re-announces the browser wallets on every `requestProvider` signal.
    pub fn spawn_announcer(self: &Arc<Self>) -> JoinHandle<()> {
        let state = self.clone();
        let mut requests = self.bus.subscribe_requests();
        tokio::spawn(async move {
            loop {
                match requests.recv().await {
                    Ok(()) | Err(RecvError::Lagged(_)) => {
                        for info in state.announced() {
                            state.bus.announce(state.detail(info));
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
