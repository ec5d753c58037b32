//! Subcommands.
//!
//! All subcommands should respect the `oxie_config::Config`.
//! If a subcommand accepts values that are supported by the `Config`, then the subcommand should
//! implement `figment::Provider` which allows the subcommand to override the config's defaults.

use eyre::Result;
use oxie::Wallets;
use oxie_cli::opts::WalletOpts;
use oxie_config::Config;
use oxie_wallets::Session;
use yansi::Paint;

pub mod mint;
pub mod supply;
pub mod wallets;
pub mod watch;

/// Starts wallet discovery and connects to the wallet selected by `opts`.
pub(crate) async fn connect(config: &Config, opts: &WalletOpts) -> Result<(Wallets, Session)> {
    let wallets = start(config, opts).await?;
    let session = wallets.connect(opts.wallet.as_deref()).await?;
    let wallet = session.wallet.as_deref().unwrap_or("injected provider");
    eprintln!(
        "Connected {} ({wallet}) on {}",
        oxie_mint::format_address(&session.account).bold(),
        config.chain.chain_name
    );
    Ok((wallets, session))
}

/// Starts wallet discovery and waits for announcements.
pub(crate) async fn start(config: &Config, opts: &WalletOpts) -> Result<Wallets> {
    let wallets = Wallets::start(config, opts.browser).await?;
    if let Some(bridge) = wallets.bridge() {
        eprintln!("Open {} to connect your browser wallet", bridge.url().cyan());
    }
    wallets.discover().await?;
    Ok(wallets)
}
