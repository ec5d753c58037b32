use crate::cmd::{mint::MintArgs, supply::SupplyArgs, watch::WatchArgs, wallets::WalletsArgs};
use clap::{Parser, Subcommand};

/// Connect a wallet and mint Oxie NFTs.
#[derive(Parser)]
#[command(name = "oxie", version, next_display_order = None)]
pub struct Oxie {
    #[command(subcommand)]
    pub cmd: OxieSubcommand,
}

#[derive(Subcommand)]
pub enum OxieSubcommand {
    /// Lists the wallets announced on this machine.
    #[command(visible_alias = "w")]
    Wallets(WalletsArgs),

    /// Prints the number of minted tokens.
    #[command(visible_aliases = &["total-supply", "s"])]
    Supply(SupplyArgs),

    /// Follows the number of minted tokens until interrupted.
    Watch(WatchArgs),

    /// Connects a wallet and mints a token.
    #[command(visible_alias = "m")]
    Mint(MintArgs),
}
