//! # oxie-wallets
//!
//! Wallet discovery and connection.
//!
//! Wallets are reached through the [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193) provider
//! interface and discovered through [EIP-6963](https://eips.ethereum.org/EIPS/eip-6963)
//! announcements. The [`WalletManager`] turns a chosen wallet into a [`Session`] on the target
//! chain.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate tracing;

pub mod discovery;
pub mod error;
pub mod http;
pub mod provider;
pub mod session;

#[cfg(feature = "browser")]
pub mod bridge;

pub use discovery::{DiscoveryBus, ProviderDetail, ProviderInfo, ProviderRegistry};
pub use error::{ErrorCode, ProviderRpcError, WalletError};
pub use http::HttpProvider;
pub use provider::{Eip1193Provider, RequestArguments};
pub use session::{Session, WalletManager};
