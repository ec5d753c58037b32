use clap::Parser;
use oxie_config::{
    Config,
    figment::{
        self, Metadata, Profile,
        value::{Dict, Map},
    },
};

/// Options selecting the wallet to connect to.
#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Wallet options")]
pub struct WalletOpts {
    /// The wallet to connect to: the uuid, rdns or name of an announced wallet.
    ///
    /// Without it the injected provider is used: the `--rpc-url` endpoint, or the browser's
    /// `window.ethereum` with `--browser`.
    #[arg(long, short, value_name = "WALLET")]
    pub wallet: Option<String>,

    /// Connect through the wallets of a browser page served by a local bridge.
    #[arg(long)]
    pub browser: bool,

    /// Port of the browser bridge.
    #[arg(long, value_name = "PORT")]
    pub browser_port: Option<u16>,

    /// The JSON-RPC endpoint used as the injected provider.
    #[arg(long, short, visible_alias = "eth-rpc-url", env = "ETH_RPC_URL", value_name = "URL")]
    pub rpc_url: Option<String>,
}

impl WalletOpts {
    pub fn dict(&self) -> Dict {
        let mut dict = Dict::new();
        if let Some(url) = &self.rpc_url {
            dict.insert("eth_rpc_url".into(), url.clone().into());
        }
        if let Some(port) = self.browser_port {
            dict.insert("browser_port".into(), port.into());
        }
        dict
    }
}

impl figment::Provider for WalletOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("WalletOpts")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Ok(Map::from([(Config::selected_profile(), self.dict())]))
    }
}
