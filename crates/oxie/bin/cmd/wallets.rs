use super::start;
use clap::Parser;
use eyre::Result;
use oxie_cli::opts::WalletOpts;
use oxie_config::Config;
use yansi::Paint;

/// CLI arguments for `oxie wallets`.
#[derive(Clone, Debug, Parser)]
pub struct WalletsArgs {
    #[command(flatten)]
    wallet: WalletOpts,

    /// Print the announced wallets as JSON.
    #[arg(long, short)]
    json: bool,
}

impl WalletsArgs {
    pub async fn run(self) -> Result<()> {
        let config = Config::try_from(Config::figment().merge(&self.wallet))?;
        let wallets = start(&config, &self.wallet).await?;
        let detected = wallets.manager().detected_wallets();

        if self.json {
            let infos = detected.iter().map(|detail| &detail.info).collect::<Vec<_>>();
            println!("{}", serde_json::to_string_pretty(&infos)?);
        } else if detected.is_empty() && !wallets.manager().has_injected() {
            println!("{}", "No Ethereum wallet found. Please install Rabby or MetaMask.".yellow());
        } else {
            for detail in &detected {
                let info = &detail.info;
                println!("{} {} {}", info.name.bold(), info.rdns.dim(), info.uuid.dim());
            }
            if wallets.manager().has_injected() {
                println!("{}", "injected provider".bold());
            }
        }

        wallets.shutdown().await
    }
}
