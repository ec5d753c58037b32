use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use oxie_config::{ChainParams, SEI_CHAIN_ID};
use oxie_test_utils::{ALICE, BOB, MockWallet, init_tracing, wallet_info};
use oxie_wallets::{
    Eip1193Provider, ProviderDetail, ProviderRegistry, ProviderRpcError, RequestArguments,
    WalletError, WalletManager,
};
use serde_json::Value;

fn manager() -> WalletManager {
    WalletManager::new(ProviderRegistry::new(), ChainParams::sei())
}

/// A wallet that never answers, like one waiting on a prompt nobody looks at.
#[derive(Debug)]
struct Unanswered;

#[async_trait]
impl Eip1193Provider for Unanswered {
    async fn request(&self, _args: RequestArguments) -> Result<Value, ProviderRpcError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn connects_on_target_chain() {
    init_tracing();
    let wallet = Arc::new(MockWallet::new().on_chain(SEI_CHAIN_ID));
    let manager = manager();

    let session = manager.connect(Some(&wallet.detail("Rabby"))).await.unwrap();
    assert_eq!(session.account, ALICE);
    assert_eq!(session.chain_id, SEI_CHAIN_ID);
    assert_eq!(session.wallet.as_deref(), Some("Rabby"));
    assert_eq!(manager.account(), Some(ALICE));
    assert!(!manager.is_connecting());
    assert_eq!(manager.error(), None);

    assert_eq!(wallet.calls(), ["eth_requestAccounts", "eth_chainId", "eth_accounts"]);
}

#[tokio::test]
async fn switches_to_known_chain() {
    let wallet = Arc::new(MockWallet::new().knowing_chain(SEI_CHAIN_ID));
    let manager = manager();

    manager.connect(Some(&wallet.detail("Rabby"))).await.unwrap();
    assert_eq!(wallet.chain_id(), SEI_CHAIN_ID);
    assert_eq!(wallet.call_count("wallet_switchEthereumChain"), 1);
    assert_eq!(wallet.call_count("wallet_addEthereumChain"), 0);
}

#[tokio::test]
async fn adds_unknown_chain() {
    let wallet = Arc::new(MockWallet::new());
    let manager = manager();

    let session = manager.connect(Some(&wallet.detail("MetaMask"))).await.unwrap();
    assert_eq!(session.chain_id, SEI_CHAIN_ID);
    assert_eq!(wallet.chain_id(), SEI_CHAIN_ID);
    assert_eq!(
        wallet.calls(),
        [
            "eth_requestAccounts",
            "eth_chainId",
            "wallet_switchEthereumChain",
            "wallet_addEthereumChain",
            "eth_accounts",
        ]
    );
}

#[tokio::test]
async fn adds_chain_when_wallet_wraps_errors() {
    let wallet = Arc::new(MockWallet::new().wrapping_errors());
    let manager = manager();

    manager.connect(Some(&wallet.detail("MetaMask"))).await.unwrap();
    assert_eq!(wallet.call_count("wallet_addEthereumChain"), 1);
    assert_eq!(wallet.chain_id(), SEI_CHAIN_ID);
}

#[tokio::test]
async fn rejected_connection() {
    let wallet = Arc::new(MockWallet::new().rejecting_connection());
    let manager = manager();

    let err = manager.connect(Some(&wallet.detail("Rabby"))).await.unwrap_err();
    assert!(matches!(err, WalletError::Rejected(_)), "{err:?}");
    assert!(manager.session().is_none());
    assert!(!manager.is_connecting());
    assert_eq!(manager.error(), Some(err.to_string()));
    assert_eq!(wallet.calls(), ["eth_requestAccounts"]);
}

#[tokio::test]
async fn rejected_chain_switch_leaves_no_session() {
    let wallet = Arc::new(MockWallet::new().rejecting_switch());
    let manager = manager();

    let err = manager.connect(Some(&wallet.detail("Rabby"))).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to switch to Sei Network. Please do it manually.");
    assert!(manager.session().is_none());
    assert_eq!(wallet.call_count("wallet_addEthereumChain"), 0);
    assert_eq!(wallet.call_count("eth_accounts"), 0);
}

#[tokio::test]
async fn no_wallet_found() {
    let manager = manager();
    let err = manager.connect(None).await.unwrap_err();
    assert!(matches!(err, WalletError::NotFound));
    assert_eq!(err.to_string(), "No Ethereum wallet found. Please install Rabby or MetaMask.");
    assert_eq!(manager.error().as_deref(), Some(err.to_string().as_str()));
}

#[tokio::test]
async fn empty_accounts() {
    let wallet = Arc::new(MockWallet::new().on_chain(SEI_CHAIN_ID).with_accounts(vec![]));
    let manager = manager();

    let err = manager.connect(Some(&wallet.detail("Rabby"))).await.unwrap_err();
    assert!(matches!(err, WalletError::NoAccounts));
    assert!(manager.session().is_none());
}

#[tokio::test]
async fn falls_back_to_injected_provider() {
    let wallet = Arc::new(MockWallet::new().on_chain(SEI_CHAIN_ID).with_accounts(vec![BOB, ALICE]));
    let manager = manager().with_injected(wallet.clone());

    let session = manager.connect(None).await.unwrap();
    assert_eq!(session.account, BOB);
    assert_eq!(session.wallet, None);
}

#[tokio::test]
async fn disconnect_notifies_subscribers() {
    let wallet = Arc::new(MockWallet::new().on_chain(SEI_CHAIN_ID));
    let manager = manager();
    let mut sessions = manager.subscribe();

    manager.connect(Some(&wallet.detail("Rabby"))).await.unwrap();
    sessions.changed().await.unwrap();
    assert_eq!(sessions.borrow_and_update().as_ref().map(|s| s.account), Some(ALICE));

    manager.disconnect();
    sessions.changed().await.unwrap();
    assert!(sessions.borrow_and_update().is_none());
    assert!(manager.account().is_none());
}

#[tokio::test]
async fn failed_attempt_clears_on_next_success() {
    let manager = manager();
    manager.connect(None).await.unwrap_err();
    assert!(manager.error().is_some());

    let wallet = Arc::new(MockWallet::new().on_chain(SEI_CHAIN_ID));
    manager.connect(Some(&wallet.detail("Rabby"))).await.unwrap();
    assert_eq!(manager.error(), None);
}

#[tokio::test(start_paused = true)]
async fn cancelled_connect_is_not_connecting() {
    let manager = manager();
    let unanswered = ProviderDetail::new(wallet_info("Frame"), Arc::new(Unanswered));

    let attempt =
        tokio::time::timeout(Duration::from_secs(30), manager.connect(Some(&unanswered))).await;
    assert!(attempt.is_err());
    assert!(!manager.is_connecting());
    assert!(manager.session().is_none());
}

#[tokio::test(start_paused = true)]
async fn overlapping_connects_stay_connecting() {
    let wallet = Arc::new(MockWallet::new().on_chain(SEI_CHAIN_ID));
    let manager = manager();
    let unanswered = ProviderDetail::new(wallet_info("Frame"), Arc::new(Unanswered));

    let stalled =
        tokio::time::timeout(Duration::from_secs(30), manager.connect(Some(&unanswered)));
    let quick = async {
        let session = manager.connect(Some(&wallet.detail("Rabby"))).await;
        (session, manager.is_connecting())
    };
    let (stalled, (session, connecting)) = tokio::join!(stalled, quick);

    assert!(session.is_ok());
    assert!(connecting, "the stalled attempt is still in flight");
    assert!(stalled.is_err());
    assert!(!manager.is_connecting());
}
