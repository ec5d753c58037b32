use alloy_primitives::{Address, U256};
use clap::Parser;
use oxie_config::{
    Config,
    figment::{
        self, Metadata, Profile,
        value::{Dict, Map},
    },
};

/// Options selecting the mint contract.
#[derive(Clone, Debug, Default, Parser)]
pub struct ContractOpts {
    /// Address of the mint contract.
    #[arg(long, value_name = "ADDRESS")]
    pub contract: Option<Address>,
}

impl ContractOpts {
    pub fn dict(&self) -> Dict {
        let mut dict = Dict::new();
        if let Some(contract) = self.contract {
            dict.insert("contract".into(), contract.to_string().into());
        }
        dict
    }
}

impl figment::Provider for ContractOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("ContractOpts")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Ok(Map::from([(Config::selected_profile(), self.dict())]))
    }
}

/// Options of the mint transaction.
#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Mint options")]
pub struct MintOpts {
    #[command(flatten)]
    pub contract: ContractOpts,

    /// Value in wei sent with `mint()`, decimal or `0x` prefixed hex.
    #[arg(long, value_name = "WEI")]
    pub value: Option<U256>,

    /// Gas limit of the mint transaction.
    #[arg(long, value_name = "GAS")]
    pub gas_limit: Option<u64>,

    /// Seconds to wait for the transaction to be mined.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl MintOpts {
    pub fn dict(&self) -> Dict {
        let mut dict = self.contract.dict();
        if let Some(value) = self.value {
            dict.insert("mint_price".into(), format!("{value:#x}").into());
        }
        if let Some(gas_limit) = self.gas_limit {
            dict.insert("gas_limit".into(), gas_limit.into());
        }
        if let Some(timeout) = self.timeout {
            dict.insert("transaction_timeout".into(), timeout.into());
        }
        dict
    }
}

impl figment::Provider for MintOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("MintOpts")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Ok(Map::from([(Config::selected_profile(), self.dict())]))
    }
}
