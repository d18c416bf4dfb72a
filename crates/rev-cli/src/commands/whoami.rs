//! Whoami command implementation.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::Args;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs) -> Result<()> {
    let stored = storage::load_session()
        .await
        .context("Failed to load session")?
        .context("No active session. Run 'rev login' first.")?;

    output::field("Tenant", &stored.base_url);
    if let Some(user_id) = stored.state.user_id() {
        output::field("User ID", user_id);
    }

    match stored.state.expires_at() {
        Some(expires_at) if !stored.state.is_expired() => {
            let minutes = stored.state.seconds_till_expires() / 60.0;
            output::field(
                "Expires",
                &format!("{} ({:.0} minutes)", local_time(expires_at), minutes),
            );
        }
        Some(expires_at) => {
            output::field("Expires", &local_time(expires_at));
            output::warning("Session has expired");
        }
        None => output::warning("Session has no expiry, log in again"),
    }

    Ok(())
}

fn local_time(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S %:z")
        .to_string()
}
