//! # oxie-mint
//!
//! The mint flow: a small state machine around the contract's `mint()` call and a poller keeping
//! `totalSupply()` up to date while a wallet is connected.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod contract;
pub mod controller;
pub mod error;
pub mod format;
pub mod receipt;

pub use controller::{MintConfig, MintController, MintState, MintStatus, PollerGuard};
pub use error::MintError;
pub use format::format_address;
