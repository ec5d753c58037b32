//! # oxie-config
//!
//! Oxie configuration.
//!
//! The [`Config`] is assembled from, in increasing order of precedence:
//!
//! 1. built-in defaults (Sei EVM mainnet, the Oxie contract),
//! 2. the `[profile.<name>]` tables of `oxie.toml` (path overridable with `OXIE_CONFIG`), with
//!    the `default` profile acting as a base for every other profile,
//! 3. `OXIE_*` environment variables, e.g. `OXIE_GAS_LIMIT=500000`,
//! 4. whatever the caller merges on top, usually CLI options.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use alloy_primitives::{Address, U256, address};
use figment::{
    Figment, Metadata, Profile, Provider,
    providers::{Env, Serialized},
    value::{Dict, Map},
};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use url::Url;

pub mod chain;
pub use chain::{ChainParams, NativeCurrency, SEI_CHAIN_ID};

pub mod error;
pub use error::ExtractConfigError;

mod providers;
use providers::ProfileTable;

pub mod serde_helpers;

mod wallets;
pub use wallets::WalletEndpoint;

pub use figment;

/// Oxie configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// The selected profile. **(default: _default_ `default`)**
    ///
    /// **Note:** This field is never serialized nor deserialized. When a `Config` is merged into
    /// a `Figment` as a `Provider`, this profile is selected on the `Figment`. When a `Config` is
    /// extracted, this field is set to the extracting `Figment`'s selected `Profile`.
    #[serde(skip)]
    pub profile: Profile,
    /// Directory `oxie.toml` is looked up in.
    #[serde(skip)]
    pub root: PathBuf,
    /// The chain the wallet is switched to before minting.
    pub chain: ChainParams,
    /// Address of the mint contract.
    pub contract: Address,
    /// Value in wei attached to `mint()`.
    #[serde(deserialize_with = "serde_helpers::from_int_or_hex")]
    pub mint_price: U256,
    /// Gas ceiling of the mint transaction.
    pub gas_limit: u64,
    /// Seconds between two `totalSupply()` reads.
    pub poll_interval: u64,
    /// Seconds a successful mint stays visible before the state reverts to idle.
    pub success_reset: u64,
    /// Seconds to wait for a mint transaction to be included.
    pub transaction_timeout: u64,
    /// Milliseconds between two receipt lookups while waiting for inclusion.
    pub receipt_poll_interval_ms: u64,
    /// JSON-RPC endpoint used as the globally injected provider.
    pub eth_rpc_url: Option<String>,
    /// Wallet endpoints announced to the provider registry.
    pub wallets: Vec<WalletEndpoint>,
    /// Port of the local browser wallet bridge, `0` picks a free one.
    pub browser_port: u16,
    /// Seconds to wait for the browser page to connect to the bridge, and for the page to
    /// answer a single wallet request.
    pub browser_timeout: u64,
}

impl Config {
    /// The default profile: "default"
    pub const DEFAULT_PROFILE: Profile = Profile::Default;

    /// TOML section for profiles
    pub const PROFILE_SECTION: &'static str = "profile";

    /// File name of config toml file
    pub const FILE_NAME: &'static str = "oxie.toml";

    /// The Oxie mint contract on Sei EVM mainnet.
    pub const DEFAULT_CONTRACT: Address = address!("0x282fF0aC4D4F2657A6390Badb259cC78406CCa66");

    /// Returns the current `Config`, looking up `oxie.toml` in the current directory.
    pub fn load() -> Result<Self, ExtractConfigError> {
        Self::load_with_root(std::env::current_dir().unwrap_or_default())
    }

    /// Returns the `Config` for the given root directory.
    pub fn load_with_root(root: impl AsRef<Path>) -> Result<Self, ExtractConfigError> {
        Self::try_from(Self::figment_with_root(root))
    }

    /// Attempts to extract a `Config` from `provider`, returning the result.
    ///
    /// # Example
    ///
    /// ```rust
    /// use oxie_config::{Config, figment::providers::Serialized};
    ///
    /// let figment = Config::figment().merge(Serialized::default("gas_limit", 500_000));
    /// let config = Config::try_from(figment).unwrap();
    /// assert_eq!(config.gas_limit, 500_000);
    /// ```
    pub fn try_from<T: Provider>(provider: T) -> Result<Self, ExtractConfigError> {
        let figment = Figment::from(provider);
        let mut config = figment.extract::<Self>().map_err(ExtractConfigError::new)?;
        config.profile = figment.profile().clone();
        trace!(profile = %config.profile, "loaded config");
        Ok(config)
    }

    /// Returns the default figment rooted at the current directory.
    pub fn figment() -> Figment {
        Self::figment_with_root(std::env::current_dir().unwrap_or_default())
    }

    /// Returns the default figment rooted at `root`.
    pub fn figment_with_root(root: impl AsRef<Path>) -> Figment {
        Self::with_root(root).to_figment()
    }

    /// Creates a new default config rooted at `root`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf(), ..Default::default() }
    }

    /// Returns the selected profile.
    ///
    /// If the `OXIE_PROFILE` env variable is not set, this returns the `DEFAULT_PROFILE`.
    pub fn selected_profile() -> Profile {
        Profile::from_env_or("OXIE_PROFILE", Self::DEFAULT_PROFILE)
    }

    /// Returns the populated [Figment]: defaults, `oxie.toml` and `OXIE_*` env vars.
    ///
    /// The env vars are emitted under the selected profile, so options merged on top under that
    /// profile take precedence over them.
    pub fn to_figment(self) -> Figment {
        let profile = Self::selected_profile();
        let file = self.root.join(Self::FILE_NAME);

        // the default profile is always the base of the selected one
        let mut figment = Figment::from(self)
            .merge(ProfileTable::new("OXIE_CONFIG", file.clone(), Self::DEFAULT_PROFILE));
        if profile != Self::DEFAULT_PROFILE {
            figment = figment.merge(ProfileTable::new("OXIE_CONFIG", file, profile.clone()));
        }

        figment
            .merge(Env::prefixed("OXIE_").ignore(&["PROFILE", "CONFIG"]).profile(profile.clone()))
            .select(profile)
    }

    /// Returns the delay between two supply reads.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    /// Returns how long a successful mint stays visible.
    pub fn success_reset(&self) -> Duration {
        Duration::from_secs(self.success_reset)
    }

    /// Returns the receipt timeout.
    pub fn transaction_timeout(&self) -> Duration {
        Duration::from_secs(self.transaction_timeout)
    }

    /// Returns the delay between two receipt lookups.
    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }

    /// Returns the browser bridge timeout.
    pub fn browser_timeout(&self) -> Duration {
        Duration::from_secs(self.browser_timeout)
    }

    /// Returns the configured `eth_rpc_url`, parsed.
    ///
    /// Returns `None` if no url is configured.
    pub fn get_rpc_url(&self) -> Option<Result<Url, url::ParseError>> {
        let url = self.eth_rpc_url.as_deref()?;
        // a bare `localhost:8545` is not a valid url, assume http
        let url = if url.starts_with("localhost:") {
            Url::parse(&format!("http://{url}"))
        } else {
            Url::parse(url)
        };
        Some(url)
    }

    /// Returns the explorer page of the mint contract, if the chain has an explorer.
    pub fn contract_explorer_url(&self) -> Option<String> {
        self.chain.explorer().map(|explorer| format!("{explorer}/address/{}", self.contract))
    }
}

impl Provider for Config {
    fn metadata(&self) -> Metadata {
        Metadata::named("Oxie Config")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }

    fn profile(&self) -> Option<Profile> {
        Some(self.profile.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: Self::DEFAULT_PROFILE,
            root: PathBuf::new(),
            chain: ChainParams::default(),
            contract: Self::DEFAULT_CONTRACT,
            mint_price: U256::ZERO,
            gas_limit: 300_000,
            poll_interval: 15,
            success_reset: 5,
            transaction_timeout: 120,
            receipt_poll_interval_ms: 1_000,
            eth_rpc_url: None,
            wallets: Vec::new(),
            browser_port: 9545,
            browser_timeout: 300,
        }
    }
}
