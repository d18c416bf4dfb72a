//! Extend command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use revclient::types::format_iso;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ExtendArgs {
    /// Only extend when fewer than this many minutes remain, logging in
    /// again when the session is no longer valid
    #[arg(long)]
    pub lazy: Option<u32>,
}

pub async fn run(connection: &ConnectionArgs, args: ExtendArgs) -> Result<()> {
    let session = CliSession::open(connection).await?;
    let client = session.client();

    eprintln!("{}", "Extending session...".dimmed());

    match args.lazy {
        Some(minutes) => {
            let refreshed = client
                .lazy_extend(minutes)
                .await
                .context("Failed to refresh session")?;
            if refreshed {
                output::success("Session refreshed");
            } else {
                output::success("Session still valid, nothing to do");
            }
        }
        None => {
            client
                .extend_session()
                .await
                .context("Failed to extend session")?;
            output::success("Session extended");
        }
    }

    if let Some(expires_at) = client.session().state().await.expires_at() {
        output::field("Expires", &format_iso(&expires_at));
    }

    session.finish().await
}
