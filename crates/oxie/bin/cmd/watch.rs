use super::connect;
use clap::Parser;
use eyre::Result;
use oxie_cli::opts::{ContractOpts, WalletOpts};
use oxie_config::Config;
use oxie_mint::{MintConfig, MintController, format_address};
use std::sync::Arc;
use yansi::Paint;

/// CLI arguments for `oxie watch`.
#[derive(Clone, Debug, Parser)]
pub struct WatchArgs {
    #[command(flatten)]
    wallet: WalletOpts,

    #[command(flatten)]
    contract: ContractOpts,
}

impl WatchArgs {
    pub async fn run(self) -> Result<()> {
        let config =
            Config::try_from(Config::figment().merge(&self.wallet).merge(&self.contract))?;
        let (wallets, _session) = connect(&config, &self.wallet).await?;

        let controller = Arc::new(MintController::new(
            wallets.manager().subscribe(),
            MintConfig::from_config(&config),
        ));
        let mut supply = controller.subscribe_supply();
        let poller = controller.spawn_supply_poller();

        let contract = format_address(&config.contract);
        eprintln!("Watching {contract} every {:?}", config.poll_interval());
        if let Some(url) = config.contract_explorer_url() {
            eprintln!("{}", url.dim());
        }

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut last = None;
        loop {
            tokio::select! {
                _ = &mut ctrl_c => break,
                changed = supply.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let value = *supply.borrow_and_update();
                    if last.replace(value) != Some(value) {
                        println!("Total minted: {}", value.bold());
                    } else {
                        debug!(%value, "supply unchanged");
                    }
                }
            }
        }

        drop(poller);
        wallets.manager().disconnect();
        wallets.shutdown().await
    }
}
