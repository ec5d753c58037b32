//! A browser bridge exposing the wallets of a regular browser page as [`Eip1193Provider`]s.
//!
//! [`Eip1193Provider`]: crate::provider::Eip1193Provider

mod error;
mod provider;
mod server;
mod types;

mod app;
mod handlers;
mod queue;
mod router;
mod state;

pub use error::BrowserBridgeError;
pub use provider::BrowserProvider;
pub use server::BrowserBridge;
pub use types::{BridgeRequest, BridgeResponse, BrowserApiResponse, PageStatus};
