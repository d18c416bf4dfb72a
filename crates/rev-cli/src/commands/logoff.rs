//! Logoff command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::session::{CliSession, storage};

#[derive(Args, Debug)]
pub struct LogoffArgs {}

pub async fn run(connection: &ConnectionArgs, _args: LogoffArgs) -> Result<()> {
    let session = CliSession::open(connection).await?;

    eprintln!("{}", "Logging off...".dimmed());

    session.client().logoff().await;
    session.client().close().await;

    storage::clear_session()
        .await
        .context("Failed to remove session file")?;

    output::success("Logged off");
    Ok(())
}
