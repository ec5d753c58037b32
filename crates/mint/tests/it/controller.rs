use std::{sync::Arc, time::Duration};

use alloy_primitives::U256;
use oxie_config::Config;
use oxie_mint::{MintController, MintError, MintState, MintStatus};
use oxie_test_utils::{ALICE, MockWallet};
use oxie_wallets::{ErrorCode, ProviderRpcError};
use serde_json::json;

use crate::Setup;

fn state(status: MintStatus, message: &str) -> MintState {
    MintState::new(status, message)
}

#[tokio::test(start_paused = true)]
async fn mints_and_resets() {
    let Setup { wallet, controller, .. } =
        Setup::connected(MockWallet::new().with_supply(U256::from(41))).await;

    let hash = controller.mint().await.unwrap();
    assert!(hash.is_some());
    assert_eq!(controller.state(), state(MintStatus::Success, "NFT minted successfully! 🎉"));
    assert_eq!(controller.supply(), U256::from(42));

    let sent = wallet.sent_transactions();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["from"], json!(ALICE));
    assert_eq!(sent[0]["to"], json!(Config::DEFAULT_CONTRACT));
    assert_eq!(sent[0]["gas"], "0x493e0");
    assert_eq!(sent[0]["data"], "0x1249c58b");

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(controller.state(), MintState::default());
}

#[tokio::test(start_paused = true)]
async fn reports_progress() {
    let Setup { wallet, controller, .. } =
        Setup::connected(MockWallet::new().gated().never_mining()).await;
    let mut states = controller.subscribe_state();

    let minting = tokio::spawn({
        let controller = controller.clone();
        async move { controller.mint().await }
    });

    let current = states.wait_for(|s| s.status == MintStatus::Minting).await.unwrap().clone();
    assert_eq!(current, state(MintStatus::Minting, "Minting your NFT..."));

    wallet.release();
    let current = states
        .wait_for(|s| s.message == "Transaction submitted! Waiting for confirmation...")
        .await
        .unwrap()
        .clone();
    assert_eq!(current.status, MintStatus::Minting);

    let err = minting.await.unwrap().unwrap_err();
    assert!(matches!(err, MintError::Timeout(_)));
    assert_eq!(controller.state().status, MintStatus::Error);
}

#[tokio::test(start_paused = true)]
async fn mint_while_minting_is_a_noop() {
    let Setup { wallet, controller, .. } = Setup::connected(MockWallet::new().gated()).await;

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.mint().await }
    });
    while wallet.call_count("eth_sendTransaction") == 0 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(controller.mint().await.unwrap(), None);
    assert_eq!(controller.state().status, MintStatus::Minting);

    wallet.release();
    assert!(first.await.unwrap().unwrap().is_some());
    assert_eq!(wallet.call_count("eth_sendTransaction"), 1);
}

#[tokio::test]
async fn mint_without_session_is_a_noop() {
    let Setup { wallet, controller, .. } = Setup::new(MockWallet::new());

    assert_eq!(controller.mint().await.unwrap(), None);
    assert_eq!(controller.state(), MintState::default());
    assert!(wallet.calls().is_empty());
}

#[tokio::test]
async fn user_rejection() {
    let Setup { controller, .. } =
        Setup::connected(MockWallet::new().rejecting_transactions()).await;

    let err = controller.mint().await.unwrap_err();
    assert!(matches!(err, MintError::Rejected(_)), "{err:?}");
    assert_eq!(controller.state(), state(MintStatus::Error, "Transaction rejected by user."));
}

#[tokio::test]
async fn wallet_failure_message() {
    let err = ProviderRpcError::with_message(ErrorCode::Other(-32000), "insufficient funds");
    let Setup { controller, .. } =
        Setup::connected(MockWallet::new().failing_transactions(err)).await;

    controller.mint().await.unwrap_err();
    assert_eq!(controller.state(), state(MintStatus::Error, "insufficient funds"));
}

#[tokio::test]
async fn generic_failure_message() {
    let err = ProviderRpcError::with_message(ErrorCode::Other(-32000), "");
    let Setup { controller, .. } =
        Setup::connected(MockWallet::new().failing_transactions(err)).await;

    controller.mint().await.unwrap_err();
    assert_eq!(controller.state(), state(MintStatus::Error, "Failed to mint NFT."));
}

#[tokio::test]
async fn reverted_mint() {
    let Setup { controller, .. } =
        Setup::connected(MockWallet::new().reverting().with_supply(U256::from(3))).await;

    let err = controller.mint().await.unwrap_err();
    assert!(matches!(err, MintError::Reverted(_)));
    assert_eq!(controller.state(), state(MintStatus::Error, "Transaction reverted on-chain"));
}

#[tokio::test(start_paused = true)]
async fn unconfirmed_mint_times_out() {
    let Setup { controller, .. } = Setup::connected(MockWallet::new().never_mining()).await;

    let err = controller.mint().await.unwrap_err();
    assert!(matches!(err, MintError::Timeout(_)));
    assert_eq!(controller.state().status, MintStatus::Error);
}

#[tokio::test(start_paused = true)]
async fn reset_does_not_clobber_newer_mint() {
    let Setup { controller, .. } = Setup::connected(MockWallet::new()).await;

    controller.mint().await.unwrap();
    tokio::time::sleep(Duration::from_secs(3)).await;
    controller.mint().await.unwrap();

    // the first reset fires here but the success belongs to the second mint
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(controller.state().status, MintStatus::Success);

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(controller.state().status, MintStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn error_survives_reset_delay() {
    let Setup { controller, .. } =
        Setup::connected(MockWallet::new().rejecting_transactions()).await;

    controller.mint().await.unwrap_err();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(controller.state().status, MintStatus::Error);
}

#[test]
fn controller_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Arc<MintController>>();
}
