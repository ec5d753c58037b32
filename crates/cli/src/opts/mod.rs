mod mint;
mod wallet;

pub use mint::{ContractOpts, MintOpts};
pub use wallet::WalletOpts;
