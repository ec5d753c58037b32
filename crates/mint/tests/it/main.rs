mod controller;
mod poller;

use std::{sync::Arc, time::Duration};

use oxie_config::{ChainParams, SEI_CHAIN_ID};
use oxie_mint::{MintConfig, MintController};
use oxie_test_utils::MockWallet;
use oxie_wallets::{ProviderRegistry, WalletManager};

pub(crate) struct Setup {
    pub wallet: Arc<MockWallet>,
    pub manager: WalletManager,
    pub controller: Arc<MintController>,
}

impl Setup {
    /// A controller whose wallet is not connected yet.
    pub(crate) fn new(wallet: MockWallet) -> Self {
        oxie_test_utils::init_tracing();
        let wallet = Arc::new(wallet.on_chain(SEI_CHAIN_ID));
        let manager = WalletManager::new(ProviderRegistry::new(), ChainParams::sei());
        let config =
            MintConfig { receipt_poll_interval: Duration::from_millis(10), ..Default::default() };
        let controller = Arc::new(MintController::new(manager.subscribe(), config));
        Self { wallet, manager, controller }
    }

    pub(crate) async fn connected(wallet: MockWallet) -> Self {
        let setup = Self::new(wallet);
        setup.connect().await;
        setup
    }

    pub(crate) async fn connect(&self) {
        self.manager.connect(Some(&self.wallet.detail("Rabby"))).await.unwrap();
    }
}
