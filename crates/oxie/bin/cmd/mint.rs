use super::connect;
use clap::Parser;
use eyre::Result;
use oxie_cli::opts::{MintOpts, WalletOpts};
use oxie_config::Config;
use oxie_mint::{MintConfig, MintController, MintStatus};
use std::sync::Arc;
use yansi::Paint;

/// CLI arguments for `oxie mint`.
#[derive(Clone, Debug, Parser)]
pub struct MintArgs {
    #[command(flatten)]
    pub wallet: WalletOpts,

    #[command(flatten)]
    pub mint: MintOpts,
}

impl MintArgs {
    pub async fn run(self) -> Result<()> {
        let config = Config::try_from(Config::figment().merge(&self.wallet).merge(&self.mint))?;
        let (wallets, _session) = connect(&config, &self.wallet).await?;

        let controller = Arc::new(MintController::new(
            wallets.manager().subscribe(),
            MintConfig::from_config(&config),
        ));
        if let Some(supply) = controller.fetch_supply().await {
            eprintln!("Total minted: {supply}");
        }

        let mut states = controller.subscribe_state();
        let progress = tokio::spawn(async move {
            while states.changed().await.is_ok() {
                let state = states.borrow_and_update().clone();
                if state.status == MintStatus::Minting {
                    eprintln!("{}", state.message.dim());
                }
            }
        });

        let result = controller.mint().await;
        progress.abort();

        match result {
            Ok(Some(hash)) => {
                println!("{}", controller.state().message.green());
                match config.chain.explorer() {
                    Some(explorer) => println!("{explorer}/tx/{hash}"),
                    None => println!("{hash}"),
                }
                eprintln!("Total minted: {}", controller.supply().bold());
            }
            Ok(None) => warn!("mint was not started"),
            Err(err) => {
                wallets.shutdown().await?;
                return Err(err.into());
            }
        }

        wallets.shutdown().await
    }
}
