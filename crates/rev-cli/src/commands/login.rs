//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Print the full login response as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(connection: &ConnectionArgs, args: LoginArgs) -> Result<()> {
    let session = CliSession::connect(connection).await?;
    let client = session.client();

    eprintln!("{}", "Logging in...".dimmed());

    let response = client.login().await.context("Failed to login")?;
    let state = client.session().state().await;

    if args.json {
        output::json(&response)?;
    } else {
        output::success("Logged in successfully");
        println!();
        output::field("Tenant", client.base_url().as_str());
        if let Some(user_id) = state.user_id() {
            output::field("User ID", user_id);
        }
        if let Some(expires_at) = state.expires_at() {
            output::field("Expires", &revclient::types::format_iso(&expires_at));
        }
    }

    session.finish().await
}
