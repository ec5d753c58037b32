//! Wallet session management.

use crate::{
    discovery::{ProviderDetail, ProviderRegistry},
    error::{ProviderRpcError, WalletError},
    provider::Eip1193Provider,
};
use alloy_primitives::{Address, U64};
use oxie_config::ChainParams;
use parking_lot::Mutex;
use serde_json::json;
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::sync::watch;

/// An established wallet connection.
#[derive(Clone)]
pub struct Session {
    /// The connected account.
    pub account: Address,
    /// The chain the wallet was on once the connection completed.
    pub chain_id: u64,
    /// Name of the announced wallet, `None` for the injected provider.
    pub wallet: Option<String>,
    provider: Arc<dyn Eip1193Provider>,
}

impl Session {
    pub fn new(
        account: Address,
        chain_id: u64,
        wallet: Option<String>,
        provider: Arc<dyn Eip1193Provider>,
    ) -> Self {
        Self { account, chain_id, wallet, provider }
    }

    /// Returns the provider the session was established with.
    pub fn provider(&self) -> &Arc<dyn Eip1193Provider> {
        &self.provider
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .field("chain_id", &self.chain_id)
            .field("wallet", &self.wallet)
            .finish_non_exhaustive()
    }
}

/// Discovers wallets, connects to one of them and keeps the resulting [`Session`].
///
/// At most one session is active at a time. Observers get notified of every change through
/// [`WalletManager::subscribe`].
#[derive(Debug)]
pub struct WalletManager {
    registry: ProviderRegistry,
    injected: Mutex<Option<Arc<dyn Eip1193Provider>>>,
    chain: ChainParams,
    session: watch::Sender<Option<Session>>,
    /// Number of connection attempts in flight.
    connecting: AtomicUsize,
    error: Mutex<Option<String>>,
}

impl WalletManager {
    /// Creates a manager targeting `chain` that looks up announced wallets in `registry`.
    pub fn new(registry: ProviderRegistry, chain: ChainParams) -> Self {
        Self {
            registry,
            injected: Mutex::new(None),
            chain,
            session: watch::Sender::new(None),
            connecting: AtomicUsize::new(0),
            error: Mutex::new(None),
        }
    }

    /// Sets the globally injected provider, used when no announced wallet is chosen.
    pub fn with_injected(self, provider: Arc<dyn Eip1193Provider>) -> Self {
        self.set_injected(Some(provider));
        self
    }

    /// Replaces the globally injected provider.
    pub fn set_injected(&self, provider: Option<Arc<dyn Eip1193Provider>>) {
        *self.injected.lock() = provider;
    }

    /// Returns `true` if a globally injected provider is set.
    pub fn has_injected(&self) -> bool {
        self.injected.lock().is_some()
    }

    /// Returns the registry of announced wallets.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Returns the announced wallets.
    pub fn detected_wallets(&self) -> Vec<ProviderDetail> {
        self.registry.providers()
    }

    /// Returns the target chain.
    pub fn chain(&self) -> &ChainParams {
        &self.chain
    }

    /// Returns the active session.
    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    /// Returns the connected account.
    pub fn account(&self) -> Option<Address> {
        self.session.borrow().as_ref().map(|session| session.account)
    }

    /// Subscribes to session changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    /// Returns `true` while a connection attempt is in flight.
    pub fn is_connecting(&self) -> bool {
        self.connecting.load(Ordering::SeqCst) > 0
    }

    /// Returns the message of the last failed connection attempt.
    pub fn error(&self) -> Option<String> {
        self.error.lock().clone()
    }

    /// Connects to `wallet`, or to the injected provider if `wallet` is `None`.
    ///
    /// Requests account access, makes sure the wallet is on the target chain (switching, or
    /// adding the chain if the wallet does not know it) and resolves the account. The session is
    /// only stored if every step succeeds.
    pub async fn connect(&self, wallet: Option<&ProviderDetail>) -> Result<Session, WalletError> {
        let _attempt = Attempt::start(&self.connecting);
        *self.error.lock() = None;

        let result = self.try_connect(wallet).await;
        match &result {
            Ok(session) => {
                debug!(account = %session.account, wallet = ?session.wallet, "wallet connected");
                self.session.send_replace(Some(session.clone()));
            }
            Err(err) => {
                warn!(%err, "failed to connect wallet");
                *self.error.lock() = Some(err.to_string());
            }
        }
        result
    }

    async fn try_connect(&self, wallet: Option<&ProviderDetail>) -> Result<Session, WalletError> {
        let (provider, name) = match wallet {
            Some(detail) => (detail.provider.clone(), Some(detail.info.name.clone())),
            None => {
                let injected = self.injected.lock().clone();
                (injected.ok_or(WalletError::NotFound)?, None)
            }
        };

        provider
            .call::<Vec<Address>>("eth_requestAccounts", json!([]))
            .await
            .map_err(WalletError::from_connect)?;

        let chain_id = self.ensure_chain(&provider).await?;

        let accounts = provider
            .call::<Vec<Address>>("eth_accounts", json!([]))
            .await
            .map_err(WalletError::from_connect)?;
        let account = accounts.first().copied().ok_or(WalletError::NoAccounts)?;

        Ok(Session::new(account, chain_id, name, provider))
    }

    /// Switches the wallet to the target chain if it is on another one.
    ///
    /// Returns the chain id the wallet ends up on.
    async fn ensure_chain(
        &self,
        provider: &Arc<dyn Eip1193Provider>,
    ) -> Result<u64, WalletError> {
        let target = self.chain.chain_id;
        self.switch_chain(provider).await.map_err(|source| {
            warn!(%source, target, "failed to switch network");
            WalletError::ChainSwitch { chain: self.chain.chain_name.clone(), source }
        })?;
        Ok(target)
    }

    async fn switch_chain(
        &self,
        provider: &Arc<dyn Eip1193Provider>,
    ) -> Result<(), ProviderRpcError> {
        let current = provider.call::<U64>("eth_chainId", json!([])).await?.to::<u64>();
        if current == self.chain.chain_id {
            return Ok(());
        }

        debug!(current, target = self.chain.chain_id, "switching chain");
        let switch = provider
            .call::<serde_json::Value>(
                "wallet_switchEthereumChain",
                json!([{ "chainId": self.chain.hex_chain_id() }]),
            )
            .await;

        match switch {
            Ok(_) => Ok(()),
            Err(err) if err.is_unrecognized_chain() => {
                debug!(chain = %self.chain.chain_name, "chain unknown to the wallet, adding it");
                provider
                    .call::<serde_json::Value>("wallet_addEthereumChain", json!([self.chain]))
                    .await
                    .map(drop)
            }
            Err(err) => Err(err),
        }
    }

    /// Forgets the session. The wallet keeps its permissions, there is no way to revoke them
    /// through EIP-1193.
    pub fn disconnect(&self) {
        debug!("wallet disconnected");
        self.session.send_replace(None);
        *self.error.lock() = None;
    }
}

/// Counts a connection attempt until dropped, also when the attempt is cancelled.
struct Attempt<'a>(&'a AtomicUsize);

impl<'a> Attempt<'a> {
    fn start(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(count)
    }
}

impl Drop for Attempt<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
