//! CLI session handling.

pub mod storage;

use anyhow::{Context, Result};

use revclient::{BaseUrl, DEFAULT_REFRESH_THRESHOLD_MINUTES, RevClient};

use crate::cli::ConnectionArgs;
use storage::StoredSession;

/// A client together with the session persisted between runs.
#[derive(Debug)]
pub struct CliSession {
    client: RevClient,
}

impl CliSession {
    /// Build a client without touching stored state.
    ///
    /// The stored session only supplies a fallback tenant, so an unreadable
    /// file is skipped rather than blocking a fresh login.
    pub async fn connect(connection: &ConnectionArgs) -> Result<Self> {
        let stored = match storage::load_session().await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable session file");
                None
            }
        };
        let config = connection.client_config(stored.as_ref().map(|s| s.base_url.as_str()))?;
        let client = RevClient::from_config(&config).context("Invalid connection settings")?;
        Ok(Self { client })
    }

    /// Build a client and restore the stored session for the same tenant.
    pub async fn open(connection: &ConnectionArgs) -> Result<Self> {
        let stored = storage::load_session()
            .await
            .context("Failed to load session")?
            .context("No active session. Run 'rev login' first.")?;

        let config = connection.client_config(Some(&stored.base_url))?;
        let client = RevClient::from_config(&config).context("Invalid connection settings")?;

        let same_tenant = BaseUrl::new(&stored.base_url)
            .map(|url| &url == client.base_url())
            .unwrap_or(false);
        if same_tenant {
            client.session().restore(stored.state).await;
        } else {
            tracing::warn!(
                stored = %stored.base_url,
                requested = %client.base_url(),
                "Stored session belongs to another tenant, ignoring it"
            );
        }

        Ok(Self { client })
    }

    /// Restore, then make sure the session is usable.
    pub async fn open_fresh(connection: &ConnectionArgs) -> Result<Self> {
        let session = Self::open(connection).await?;
        session
            .client
            .lazy_extend(DEFAULT_REFRESH_THRESHOLD_MINUTES)
            .await
            .context("Failed to refresh session")?;
        session.save().await?;
        Ok(session)
    }

    pub fn client(&self) -> &RevClient {
        &self.client
    }

    /// Persist the current session state.
    pub async fn save(&self) -> Result<()> {
        let stored = StoredSession {
            base_url: self.client.base_url().to_string(),
            state: self.client.session().state().await,
        };
        storage::save_session(&stored)
            .await
            .context("Failed to save session")
    }

    /// Persist the session and release the connection pool.
    pub async fn finish(self) -> Result<()> {
        self.save().await?;
        self.client.close().await;
        Ok(())
    }
}
