//! Session lifecycle: login, logoff, extension, and lazy refresh.

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::auth::endpoints::USER_SESSION;
use crate::auth::{AuthNegotiator, Credential, SessionState, SharedState};
use crate::error::{Error, TransportError};
use crate::http::{Reply, RequestDescriptor, RequestExecutor, ResponseMode};

/// Refresh threshold used by [`SessionManager::lazy_extend`] callers that
/// have no opinion.
pub const DEFAULT_REFRESH_THRESHOLD_MINUTES: u32 = 3;

/// Login attempts before the last error is surfaced.
const MAX_LOGIN_ATTEMPTS: u32 = 3;

const SECONDS_PER_MINUTE: f64 = 60.0;

/// Drives the authentication lifecycle for one client.
///
/// Lifecycle operations (login, logoff, extend, lazy extend) are serialized
/// by an internal mutex, so a `logoff` can never clear the state in the middle
/// of a `login`. The state itself sits behind a read/write lock shared with
/// the executor, and each response is applied under a single write.
#[derive(Debug)]
pub struct SessionManager {
    negotiator: AuthNegotiator,
    executor: RequestExecutor,
    state: SharedState,
    lifecycle: Mutex<()>,
}

impl SessionManager {
    pub(crate) fn new(
        credential: Credential,
        executor: RequestExecutor,
        state: SharedState,
    ) -> Self {
        Self {
            negotiator: AuthNegotiator::new(credential),
            executor,
            state,
            lifecycle: Mutex::new(()),
        }
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    pub fn credential(&self) -> &Credential {
        self.negotiator.credential()
    }

    /// Snapshot of the current session state.
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Replace the session state, e.g. with one persisted by a previous run.
    pub async fn restore(&self, state: SessionState) {
        let _guard = self.lifecycle.lock().await;
        *self.state.write().await = state;
    }

    /// Log in with the configured credential.
    ///
    /// The session is cleared first so the login call never carries a stale
    /// token. Up to three attempts are made; a 401 or 429 aborts at once,
    /// since retrying bad credentials can lock the account.
    ///
    /// Returns the login response body.
    #[instrument(skip(self))]
    pub async fn login(&self) -> Result<Value, Error> {
        let _guard = self.lifecycle.lock().await;
        self.login_locked().await
    }

    /// Revoke the session if there is anything to revoke, then clear it.
    ///
    /// Never fails: errors are logged and dropped so shutdown is not blocked.
    #[instrument(skip(self))]
    pub async fn logoff(&self) {
        let _guard = self.lifecycle.lock().await;

        let request = self.negotiator.build_logoff(&*self.state.read().await);
        match request {
            Some(request) => match self.executor.execute(&request).await {
                Ok(_) => info!("Logged off"),
                Err(err) => warn!(error = %err, "Error logging off, ignoring"),
            },
            None => debug!("No session to revoke"),
        }

        self.state.write().await.clear();
    }

    /// Extend the session timeout and record the new expiry.
    #[instrument(skip(self))]
    pub async fn extend_session(&self) -> Result<(), Error> {
        let _guard = self.lifecycle.lock().await;
        self.extend_locked().await
    }

    /// Ask the server whether the current token is still accepted.
    ///
    /// Only the status is inspected; the body is never read.
    #[instrument(skip(self))]
    pub async fn verify_session(&self) -> Result<bool, Error> {
        let request = RequestDescriptor::get(USER_SESSION).mode(ResponseMode::Raw);
        match self.executor.execute(&request).await? {
            Reply::Raw(response) => Ok(response.status().is_success()),
            _ => Err(Error::decode("expected a raw response")),
        }
    }

    /// Keep the session alive, doing as little as possible.
    ///
    /// - expiry unknown or past: log in
    /// - less than `refresh_threshold_minutes` left: extend, or log in if that fails
    /// - otherwise: verify, and log in if the server rejects the token
    ///
    /// Returns whether an extend or login happened. Only login failures are
    /// surfaced.
    #[instrument(skip(self))]
    pub async fn lazy_extend(&self, refresh_threshold_minutes: u32) -> Result<bool, Error> {
        let _guard = self.lifecycle.lock().await;

        let remaining = self.state.read().await.seconds_till_expires();
        let threshold = f64::from(refresh_threshold_minutes) * SECONDS_PER_MINUTE;

        let mut refreshed = false;
        let do_login = if remaining < 0.0 {
            debug!("Session expiry unknown or past");
            true
        } else if remaining < threshold {
            match self.extend_locked().await {
                Ok(()) => {
                    refreshed = true;
                    false
                }
                Err(err) => {
                    warn!(error = %err, "Error extending session, logging in again");
                    true
                }
            }
        } else {
            match self.verify_session().await {
                Ok(valid) => !valid,
                Err(err) => {
                    warn!(error = %err, "Error verifying session, logging in again");
                    true
                }
            }
        };

        if do_login {
            self.login_locked().await?;
            refreshed = true;
        }

        Ok(refreshed)
    }

    async fn login_locked(&self) -> Result<Value, Error> {
        self.state.write().await.clear();

        let request = self.negotiator.build_login();
        let mut attempt = 1;

        loop {
            match self.executor.execute(&request).await.and_then(Reply::into_json) {
                Ok(Some(body)) => {
                    let mut state = self.state.write().await;
                    AuthNegotiator::apply_response(&mut state, &body)?;
                    info!(
                        user_id = state.user_id().unwrap_or_default(),
                        expires_at = ?state.expires_at(),
                        "Logged in"
                    );
                    return Ok(body);
                }
                Ok(None) => return Err(Error::decode("login response had no content")),
                Err(err) => {
                    let retryable = match &err {
                        Error::Http(http) => !http.is_auth_rejection(),
                        Error::Transport(TransportError::Closed) => false,
                        Error::Transport(_) => true,
                        _ => false,
                    };

                    if !retryable || attempt >= MAX_LOGIN_ATTEMPTS {
                        warn!(attempt, error = %err, "Login failed");
                        return Err(err);
                    }

                    warn!(attempt, error = %err, "Login attempt failed, retrying");
                    attempt += 1;
                }
            }
        }
    }

    async fn extend_locked(&self) -> Result<(), Error> {
        let request = self.negotiator.build_extend(&*self.state.read().await);
        let body = self.executor.execute(&request).await?.into_json()?;

        if let Some(body) = body {
            AuthNegotiator::apply_response(&mut *self.state.write().await, &body)?;
        }

        debug!("Session extended");
        Ok(())
    }
}
