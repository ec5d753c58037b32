//! Multi-provider discovery following [EIP-6963](https://eips.ethereum.org/EIPS/eip-6963).
//!
//! Wallets announce themselves on a [`DiscoveryBus`]; a [`ProviderRegistry`] listens on the bus
//! and keeps the unique announcements for its whole lifetime. Like the browser events it mirrors,
//! the bus is lossy: announcers re-announce whenever a `requestProvider` signal is dispatched.

use crate::provider::Eip1193Provider;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};

const BUS_CAPACITY: usize = 64;

/// Metadata a wallet announces about itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Unique per wallet instance, used for de-duplication.
    pub uuid: String,
    /// Human-readable wallet name.
    pub name: String,
    /// Icon as a data URI.
    pub icon: String,
    /// Reverse-DNS identifier, e.g. `io.metamask`.
    pub rdns: String,
}

/// An announced wallet: its [`ProviderInfo`] and the provider handle.
#[derive(Clone)]
pub struct ProviderDetail {
    pub info: ProviderInfo,
    pub provider: Arc<dyn Eip1193Provider>,
}

impl ProviderDetail {
    pub fn new(info: ProviderInfo, provider: Arc<dyn Eip1193Provider>) -> Self {
        Self { info, provider }
    }

    /// Returns `true` if `query` is this wallet's uuid, rdns or (case-insensitive) name.
    pub fn matches(&self, query: &str) -> bool {
        self.info.uuid == query
            || self.info.rdns == query
            || self.info.name.eq_ignore_ascii_case(query)
    }
}

impl fmt::Debug for ProviderDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDetail").field("info", &self.info).finish_non_exhaustive()
    }
}

/// The channel wallets announce themselves on.
///
/// Cloning the bus yields another handle to the same channels.
#[derive(Clone, Debug)]
pub struct DiscoveryBus {
    announcements: broadcast::Sender<ProviderDetail>,
    requests: broadcast::Sender<()>,
}

impl Default for DiscoveryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscoveryBus {
    pub fn new() -> Self {
        let (announcements, _) = broadcast::channel(BUS_CAPACITY);
        let (requests, _) = broadcast::channel(BUS_CAPACITY);
        Self { announcements, requests }
    }

    /// Broadcasts an announcement (`eip6963:announceProvider`).
    ///
    /// Returns `false` if nobody is listening.
    pub fn announce(&self, detail: ProviderDetail) -> bool {
        trace!(uuid = %detail.info.uuid, name = %detail.info.name, "announce provider");
        self.announcements.send(detail).is_ok()
    }

    /// Asks every wallet to announce itself again (`eip6963:requestProvider`).
    pub fn request_providers(&self) {
        let _ = self.requests.send(());
    }

    /// Subscribes to announcements.
    pub fn subscribe(&self) -> broadcast::Receiver<ProviderDetail> {
        self.announcements.subscribe()
    }

    /// Subscribes to `requestProvider` signals.
    pub fn subscribe_requests(&self) -> broadcast::Receiver<()> {
        self.requests.subscribe()
    }

    /// Announces `details` now and again on every `requestProvider` signal, until the returned
    /// task is aborted or the bus is dropped.
    pub fn serve(&self, details: Vec<ProviderDetail>) -> JoinHandle<()> {
        let bus = self.clone();
        let mut requests = self.subscribe_requests();
        tokio::spawn(async move {
            loop {
                for detail in &details {
                    bus.announce(detail.clone());
                }
                match requests.recv().await {
                    Ok(()) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

/// Accumulates unique [`ProviderDetail`]s, keyed by uuid, in announcement order.
#[derive(Clone, Debug, Default)]
pub struct ProviderRegistry {
    providers: Arc<RwLock<Vec<ProviderDetail>>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an announcement. The first announcement of a uuid wins.
    ///
    /// Returns `true` if the provider was not known yet.
    pub fn announce(&self, detail: ProviderDetail) -> bool {
        let mut providers = self.providers.write();
        if providers.iter().any(|known| known.info.uuid == detail.info.uuid) {
            trace!(uuid = %detail.info.uuid, "ignoring duplicate announcement");
            return false;
        }
        let info = &detail.info;
        debug!(uuid = %info.uuid, name = %info.name, rdns = %info.rdns, "discovered wallet");
        providers.push(detail);
        true
    }

    /// Listens for announcements on `bus` and dispatches a `requestProvider` signal once the
    /// listener is subscribed.
    ///
    /// The listener runs until the returned task is aborted or every bus handle is dropped.
    pub fn listen(&self, bus: &DiscoveryBus) -> JoinHandle<()> {
        let registry = self.clone();
        let mut announcements = bus.subscribe();
        bus.request_providers();
        tokio::spawn(async move {
            loop {
                match announcements.recv().await {
                    Ok(detail) => {
                        registry.announce(detail);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "provider announcements lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    /// Returns all known providers in announcement order.
    pub fn providers(&self) -> Vec<ProviderDetail> {
        self.providers.read().clone()
    }

    /// Returns the provider whose uuid, rdns or name matches `query`.
    pub fn find(&self, query: &str) -> Option<ProviderDetail> {
        self.providers.read().iter().find(|detail| detail.matches(query)).cloned()
    }

    pub fn len(&self) -> usize {
        self.providers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ProviderRpcError, provider::RequestArguments};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::time::Duration;

    #[derive(Debug)]
    struct Unreachable;

    #[async_trait]
    impl Eip1193Provider for Unreachable {
        async fn request(&self, _args: RequestArguments) -> Result<Value, ProviderRpcError> {
            Err(ProviderRpcError::disconnected())
        }
    }

    fn detail(uuid: &str, name: &str) -> ProviderDetail {
        ProviderDetail::new(
            ProviderInfo {
                uuid: uuid.to_string(),
                name: name.to_string(),
                icon: "data:image/svg+xml,<svg/>".to_string(),
                rdns: format!("io.{}", name.to_lowercase()),
            },
            Arc::new(Unreachable),
        )
    }

    #[test]
    fn deduplicates_by_uuid() {
        let registry = ProviderRegistry::new();
        assert!(registry.announce(detail("1", "Rabby")));
        assert!(registry.announce(detail("2", "MetaMask")));
        assert!(!registry.announce(detail("1", "Rabby Wallet")));

        let names = registry.providers().into_iter().map(|d| d.info.name).collect::<Vec<_>>();
        assert_eq!(names, ["Rabby", "MetaMask"]);
    }

    #[test]
    fn finds_by_uuid_rdns_or_name() {
        let registry = ProviderRegistry::new();
        registry.announce(detail("6f0b6a6c", "Rabby"));
        assert!(registry.find("6f0b6a6c").is_some());
        assert!(registry.find("io.rabby").is_some());
        assert!(registry.find("rabby").is_some());
        assert!(registry.find("metamask").is_none());
    }

    #[tokio::test]
    async fn listens_for_announcements() {
        let bus = DiscoveryBus::new();
        let registry = ProviderRegistry::new();
        let listener = registry.listen(&bus);

        // served details are announced on start and on every request
        let server = bus.serve(vec![detail("1", "Rabby")]);
        bus.announce(detail("2", "MetaMask"));
        bus.request_providers();

        tokio::time::timeout(Duration::from_secs(5), async {
            while registry.len() < 2 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
        assert_eq!(registry.len(), 2);

        server.abort();
        listener.abort();
    }
}
