#[macro_use]
extern crate tracing;

use clap::Parser;
use eyre::Result;
use oxie_cli::{handler, utils};

pub mod args;
pub mod cmd;

use args::{Oxie, OxieSubcommand};

fn main() -> Result<()> {
    handler::install();
    utils::subscriber();
    utils::enable_paint();
    let args = Oxie::parse();
    main_args(args)
}

#[tokio::main]
async fn main_args(args: Oxie) -> Result<()> {
    match args.cmd {
        OxieSubcommand::Wallets(cmd) => cmd.run().await,
        OxieSubcommand::Supply(cmd) => cmd.run().await,
        OxieSubcommand::Watch(cmd) => cmd.run().await,
        OxieSubcommand::Mint(cmd) => cmd.run().await,
    }
}
