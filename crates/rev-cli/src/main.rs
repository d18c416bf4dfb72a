//! rev - command line client for the Vbrick Rev API.
//!
//! This is a thin wrapper over the `revclient` library, intended for manual
//! exploration and debugging against a Rev tenant.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{extend, get, login, logoff, search, verify, whoami};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let connection = cli.connection;
    match cli.command {
        Commands::Login(args) => login::run(&connection, args).await,
        Commands::Whoami(args) => whoami::run(args).await,
        Commands::Extend(args) => extend::run(&connection, args).await,
        Commands::Verify(args) => verify::run(&connection, args).await,
        Commands::Logoff(args) => logoff::run(&connection, args).await,
        Commands::Get(args) => get::run(&connection, args).await,
        Commands::Search(args) => search::run(&connection, args).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so command output on stdout stays machine readable
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
