use std::{sync::Arc, time::Duration};

use oxie_config::ChainParams;
use oxie_test_utils::MockWallet;
use oxie_wallets::{DiscoveryBus, ProviderRegistry, WalletManager};

async fn wait_for(registry: &ProviderRegistry, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while registry.len() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("wallets were not announced");
}

#[tokio::test]
async fn connects_to_discovered_wallet() {
    let rabby = Arc::new(MockWallet::new());
    let metamask = Arc::new(MockWallet::new());

    let bus = DiscoveryBus::new();
    let announcer = bus.serve(vec![rabby.detail("Rabby"), metamask.detail("MetaMask")]);

    let registry = ProviderRegistry::new();
    let listener = registry.listen(&bus);
    wait_for(&registry, 2).await;

    let manager = WalletManager::new(registry, ChainParams::sei());
    let names = manager.detected_wallets().into_iter().map(|d| d.info.name).collect::<Vec<_>>();
    similar_asserts::assert_eq!(names, ["Rabby", "MetaMask"]);

    let detail = manager.registry().find("io.metamask").unwrap();
    let session = manager.connect(Some(&detail)).await.unwrap();
    assert_eq!(session.wallet.as_deref(), Some("MetaMask"));
    assert!(rabby.calls().is_empty());
    assert!(!metamask.calls().is_empty());

    announcer.abort();
    listener.abort();
}

#[tokio::test]
async fn repeated_announcements_are_ignored() {
    let wallet = Arc::new(MockWallet::new());
    let bus = DiscoveryBus::new();
    let registry = ProviderRegistry::new();
    let listener = registry.listen(&bus);

    for _ in 0..3 {
        bus.announce(wallet.detail("Rabby"));
    }
    bus.announce(Arc::new(MockWallet::new()).detail("Coinbase Wallet"));
    wait_for(&registry, 2).await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(registry.len(), 2);
    listener.abort();
}
