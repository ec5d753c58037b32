//! The mint state machine and the supply poller.

use std::{
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use alloy_primitives::{Address, TxHash, U256};
use oxie_config::Config;
use oxie_wallets::Session;
use serde_json::json;
use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};

use crate::{contract, error::MintError, receipt};

const MINTING: &str = "Minting your NFT...";
const SUBMITTED: &str = "Transaction submitted! Waiting for confirmation...";
const MINTED: &str = "NFT minted successfully! 🎉";

/// Settings of the mint flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintConfig {
    pub contract: Address,
    /// Value attached to `mint()`.
    pub mint_price: U256,
    pub gas_limit: u64,
    /// Delay between two `totalSupply()` reads.
    pub poll_interval: Duration,
    /// How long [`MintStatus::Success`] is shown before reverting to idle.
    pub success_reset: Duration,
    /// How long to wait for the mint transaction to be mined.
    pub transaction_timeout: Duration,
    pub receipt_poll_interval: Duration,
}

impl MintConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            contract: config.contract,
            mint_price: config.mint_price,
            gas_limit: config.gas_limit,
            poll_interval: config.poll_interval(),
            success_reset: config.success_reset(),
            transaction_timeout: config.transaction_timeout(),
            receipt_poll_interval: config.receipt_poll_interval(),
        }
    }
}

impl Default for MintConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MintStatus {
    #[default]
    Idle,
    Minting,
    Success,
    Error,
}

/// The mint status and the message shown for it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MintState {
    pub status: MintStatus,
    pub message: String,
}

impl MintState {
    pub fn new(status: MintStatus, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

/// Drives the mint flow of the current wallet session.
///
/// The latest [`MintState`] and total supply are published through `watch` channels.
#[derive(Debug)]
pub struct MintController {
    session: watch::Receiver<Option<Session>>,
    config: MintConfig,
    state: watch::Sender<MintState>,
    supply: watch::Sender<U256>,
    /// Bumped on every mint, so a pending reset only reverts its own success.
    epoch: AtomicU64,
}

impl MintController {
    pub fn new(session: watch::Receiver<Option<Session>>, config: MintConfig) -> Self {
        Self {
            session,
            config,
            state: watch::Sender::new(MintState::default()),
            supply: watch::Sender::new(U256::ZERO),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &MintConfig {
        &self.config
    }

    pub fn state(&self) -> MintState {
        self.state.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<MintState> {
        self.state.subscribe()
    }

    /// Returns the last known total supply.
    pub fn supply(&self) -> U256 {
        *self.supply.borrow()
    }

    pub fn subscribe_supply(&self) -> watch::Receiver<U256> {
        self.supply.subscribe()
    }

    fn current_session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    /// Reads `totalSupply()` through the session's wallet.
    ///
    /// Failures are logged and leave the last known supply untouched. Returns `None` without a
    /// session.
    pub async fn fetch_supply(&self) -> Option<U256> {
        let session = self.current_session()?;
        match contract::total_supply(session.provider(), self.config.contract).await {
            Ok(supply) => {
                trace!(%supply, "fetched total supply");
                self.supply.send_replace(supply);
                Some(supply)
            }
            Err(err) => {
                warn!(%err, "failed to fetch total supply");
                None
            }
        }
    }

    /// Mints one token from the session's account.
    ///
    /// Without a session, or while a mint is in flight, this does nothing and returns
    /// `Ok(None)`. Otherwise it returns the hash of the confirmed transaction; failures are
    /// also reflected in [`MintController::state`].
    pub async fn mint(self: &Arc<Self>) -> Result<Option<TxHash>, MintError> {
        let Some(session) = self.current_session() else {
            debug!("mint requested without a wallet session");
            return Ok(None);
        };

        let started = self.state.send_if_modified(|state| {
            if state.status == MintStatus::Minting {
                return false;
            }
            *state = MintState::new(MintStatus::Minting, MINTING);
            true
        });
        if !started {
            debug!("mint already in progress");
            return Ok(None);
        }
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;

        match self.submit(&session).await {
            Ok(hash) => {
                info!(%hash, "mint confirmed");
                self.state.send_replace(MintState::new(MintStatus::Success, MINTED));
                self.fetch_supply().await;
                self.schedule_reset(epoch);
                Ok(Some(hash))
            }
            Err(err) => {
                warn!(%err, "mint failed");
                self.state.send_replace(MintState::new(MintStatus::Error, err.to_string()));
                Err(err)
            }
        }
    }

    async fn submit(&self, session: &Session) -> Result<TxHash, MintError> {
        let tx = contract::mint_request(
            session.account,
            self.config.contract,
            self.config.mint_price,
            self.config.gas_limit,
        );
        let hash = session.provider().call::<TxHash>("eth_sendTransaction", json!([tx])).await?;
        debug!(%hash, "mint transaction submitted");
        self.state.send_replace(MintState::new(MintStatus::Minting, SUBMITTED));

        let receipt = receipt::wait_for_receipt(
            session.provider(),
            hash,
            self.config.receipt_poll_interval,
            self.config.transaction_timeout,
        )
        .await?;
        if !receipt.succeeded() {
            return Err(MintError::Reverted(hash));
        }
        Ok(hash)
    }

    /// Reverts the success of mint `epoch` to idle once the reset delay elapsed.
    fn schedule_reset(self: &Arc<Self>, epoch: u64) {
        let this = Arc::downgrade(self);
        let delay = self.config.success_reset;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(this) = Weak::upgrade(&this) {
                this.state.send_if_modified(|state| {
                    let current = this.epoch.load(Ordering::SeqCst) == epoch;
                    if !current || state.status != MintStatus::Success {
                        return false;
                    }
                    *state = MintState::default();
                    true
                });
            }
        });
    }

    /// Spawns a task refreshing the supply every poll interval while a session is present.
    ///
    /// Polling starts as soon as a session appears and stops the moment it is cleared, even
    /// with a read in flight. A replaced session is read right away. The task is aborted when
    /// the returned guard is dropped.
    pub fn spawn_supply_poller(self: &Arc<Self>) -> PollerGuard {
        let this = self.clone();
        let mut session = self.session.clone();
        PollerGuard(tokio::spawn(async move {
            loop {
                let connected = session.wait_for(Option::is_some).await.is_ok();
                if !connected {
                    return;
                }
                debug!(interval = ?this.config.poll_interval, "supply polling started");

                let mut interval = tokio::time::interval(this.config.poll_interval);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    tokio::select! {
                        biased;
                        changed = session.changed() => {
                            if changed.is_err() {
                                return;
                            }
                            if session.borrow_and_update().is_none() {
                                debug!("session cleared, supply polling stopped");
                                break;
                            }
                            // another wallet, read its supply now
                            interval.reset_immediately();
                        }
                        _ = async {
                            interval.tick().await;
                            this.fetch_supply().await
                        } => {}
                    }
                }
            }
        }))
    }
}

/// Aborts the supply poller when dropped.
#[derive(Debug)]
pub struct PollerGuard(JoinHandle<()>);

impl PollerGuard {
    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl Drop for PollerGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}
