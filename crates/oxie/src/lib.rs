//! # oxie
//!
//! Connects a wallet and mints Oxie NFTs from the command line.

#[macro_use]
extern crate tracing;

pub mod wallets;
pub use wallets::Wallets;
