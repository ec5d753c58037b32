use super::connect;
use clap::Parser;
use eyre::Result;
use oxie_cli::opts::{ContractOpts, WalletOpts};
use oxie_config::Config;
use oxie_mint::contract;

/// CLI arguments for `oxie supply`.
#[derive(Clone, Debug, Parser)]
pub struct SupplyArgs {
    #[command(flatten)]
    wallet: WalletOpts,

    #[command(flatten)]
    contract: ContractOpts,
}

impl SupplyArgs {
    pub async fn run(self) -> Result<()> {
        let config =
            Config::try_from(Config::figment().merge(&self.wallet).merge(&self.contract))?;
        let (wallets, session) = connect(&config, &self.wallet).await?;

        let supply = contract::total_supply(session.provider(), config.contract).await?;
        println!("{supply}");

        wallets.shutdown().await
    }
}
