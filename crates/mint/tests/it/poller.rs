use std::{sync::Arc, time::Duration};

use alloy_primitives::U256;
use oxie_config::SEI_CHAIN_ID;
use oxie_test_utils::MockWallet;

use crate::Setup;

/// Lets spawned tasks catch up without moving the clock past the next poll.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn polls_while_connected() {
    let setup = Setup::connected(MockWallet::new().with_supply(U256::from(7))).await;
    let _poller = setup.controller.spawn_supply_poller();

    settle().await;
    assert_eq!(setup.controller.supply(), U256::from(7));
    assert_eq!(setup.wallet.call_count("eth_call"), 1);

    setup.wallet.set_supply(U256::from(9));
    tokio::time::sleep(Duration::from_secs(15)).await;
    assert_eq!(setup.controller.supply(), U256::from(9));
    assert_eq!(setup.wallet.call_count("eth_call"), 2);
}

#[tokio::test(start_paused = true)]
async fn stops_when_session_is_cleared() {
    let setup = Setup::connected(MockWallet::new().with_supply(U256::from(1))).await;
    let poller = setup.controller.spawn_supply_poller();
    settle().await;
    let polled = setup.wallet.call_count("eth_call");

    setup.manager.disconnect();
    settle().await;
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(setup.wallet.call_count("eth_call"), polled);
    assert!(!poller.is_finished());

    // a new session resumes polling right away
    setup.connect().await;
    settle().await;
    assert_eq!(setup.wallet.call_count("eth_call"), polled + 1);
}

#[tokio::test(start_paused = true)]
async fn clearing_the_session_cancels_a_pending_read() {
    let setup = Setup::connected(MockWallet::new().with_supply(U256::from(3))).await;
    setup.wallet.hold_reads();
    let poller = setup.controller.spawn_supply_poller();
    settle().await;
    assert_eq!(setup.wallet.call_count("eth_call"), 1);

    setup.manager.disconnect();
    settle().await;
    setup.wallet.release_reads();
    settle().await;
    assert_eq!(setup.controller.supply(), U256::ZERO);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(setup.wallet.call_count("eth_call"), 1);
    assert!(!poller.is_finished());
}

#[tokio::test(start_paused = true)]
async fn reads_a_replaced_session_right_away() {
    let setup = Setup::connected(MockWallet::new().with_supply(U256::from(1))).await;
    let _poller = setup.controller.spawn_supply_poller();
    settle().await;
    assert_eq!(setup.controller.supply(), U256::from(1));

    let other = Arc::new(MockWallet::new().on_chain(SEI_CHAIN_ID).with_supply(U256::from(50)));
    setup.manager.connect(Some(&other.detail("MetaMask"))).await.unwrap();
    settle().await;
    assert_eq!(other.call_count("eth_call"), 1);
    assert_eq!(setup.controller.supply(), U256::from(50));

    // the old wallet is not read anymore
    tokio::time::sleep(Duration::from_secs(15)).await;
    assert_eq!(setup.wallet.call_count("eth_call"), 1);
    assert_eq!(other.call_count("eth_call"), 2);
}

#[tokio::test(start_paused = true)]
async fn waits_for_a_session() {
    let setup = Setup::new(MockWallet::new().with_supply(U256::from(4)));
    let _poller = setup.controller.spawn_supply_poller();

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(setup.wallet.call_count("eth_call"), 0);

    setup.connect().await;
    settle().await;
    assert_eq!(setup.controller.supply(), U256::from(4));
}

#[tokio::test(start_paused = true)]
async fn failed_reads_keep_last_supply() {
    let setup = Setup::connected(MockWallet::new().with_supply(U256::from(5))).await;
    let _poller = setup.controller.spawn_supply_poller();
    settle().await;

    setup.wallet.fail_supply(true);
    setup.wallet.set_supply(U256::from(6));
    tokio::time::sleep(Duration::from_secs(15)).await;
    assert_eq!(setup.wallet.call_count("eth_call"), 2);
    assert_eq!(setup.controller.supply(), U256::from(5));
}

#[tokio::test(start_paused = true)]
async fn dropping_the_guard_stops_polling() {
    let setup = Setup::connected(MockWallet::new()).await;
    let poller = setup.controller.spawn_supply_poller();
    settle().await;

    drop(poller);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(setup.wallet.call_count("eth_call"), 1);
}
