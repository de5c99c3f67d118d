mod app;
mod cli;
mod commands;
mod config;
mod effects;
mod logging;
mod render;

use clap::Parser;

use crate::cli::Cli;
use crate::logging::LogDestination;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(
        LogDestination::for_flags(cli.verbose, cli.quiet),
        board_logging::level_from_verbosity(cli.verbose, cli.quiet),
    );
    commands::run(cli.command, &cli.config, cli.user)
}
