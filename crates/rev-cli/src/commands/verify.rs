//! Verify command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct VerifyArgs {}

pub async fn run(connection: &ConnectionArgs, _args: VerifyArgs) -> Result<()> {
    let session = CliSession::open(connection).await?;

    let valid = session
        .client()
        .verify_session()
        .await
        .context("Failed to verify session")?;
    session.client().close().await;

    if !valid {
        bail!("Session is no longer valid. Run 'rev login' again.");
    }

    output::success("Session is valid");
    Ok(())
}
