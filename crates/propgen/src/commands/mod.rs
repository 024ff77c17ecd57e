pub(crate) mod classify;
pub(crate) mod generate;
pub(crate) mod init;

use anyhow::Result;
use propgen_config as cli;

use crate::Outcome;

pub(crate) fn dispatch(cli: cli::Cli) -> Result<Outcome> {
    let global = &cli.global;
    match cli
        .command
        .clone()
        .unwrap_or(cli::Commands::Generate(cli.generate.clone()))
    {
        cli::Commands::Generate(args) => generate::handle(args, global),
        cli::Commands::Classify(args) => classify::handle(args),
        cli::Commands::Init(args) => init::handle(args),
    }
}
