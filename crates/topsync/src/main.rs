//! Entry point for the `topsync` binary.

mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);
    run(cli).await?;
    Ok(())
}

/// Map `-v` counts onto a tracing filter, unless `RUST_LOG` is set.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "topsync=info,topsync_core=info,topsync_api=info",
        2 => "topsync=debug,topsync_core=debug,topsync_api=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Sync(args) => commands::sync::handle(args, &cli.global).await,
        Command::GcCables => commands::gc::handle(&cli.global).await,
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
        Command::Completions(args) => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "topsync", &mut std::io::stdout());
            Ok(())
        }
    }
}
