//! Top-level client handle.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::auth::{Credential, SessionState, Token};
use crate::error::{ConfigurationError, Error};
use crate::http::{Method, Reply, RequestDescriptor, RequestExecutor, TransportOptions};
use crate::scroll::Scroll;
use crate::session::SessionManager;
use crate::types::BaseUrl;
use crate::video::VideoClient;

/// Client configuration as read from a file or environment.
///
/// Unknown fields are rejected so typos surface at startup instead of being
/// silently ignored.
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Tenant base URL.
    pub base_url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| {
            ConfigurationError::Invalid {
                message: e.to_string(),
            }
            .into()
        })
    }

    pub fn parse_base_url(&self) -> Result<BaseUrl, Error> {
        BaseUrl::new(&self.base_url)
    }

    pub fn credential(&self) -> Result<Credential, Error> {
        Credential::from_parts(
            self.username.clone(),
            self.password.clone(),
            self.api_key.clone(),
            self.secret.clone(),
        )
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            timeout: self.timeout_secs.map(Duration::from_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("api_key", &self.api_key)
            .field("secret", &redact(&self.secret))
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// A client for one Rev tenant.
///
/// Clients are cheap to clone (they use an internal `Arc`) and every clone
/// shares the same session and connection pool.
///
/// # Example
///
/// ```no_run
/// use revclient::{BaseUrl, Credential, RevClient};
///
/// # async fn example() -> Result<(), revclient::Error> {
/// let client = RevClient::new(
///     BaseUrl::new("https://tenant.rev.vbrick.com")?,
///     Credential::password("robot", "robot-password")?,
/// )?;
///
/// client.login().await?;
/// let status = client.video().status("video-id").await?;
/// println!("{status}");
///
/// client.logoff().await;
/// client.close().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RevClient {
    inner: Arc<SessionManager>,
}

impl RevClient {
    /// Create a client with default transport options.
    pub fn new(base_url: BaseUrl, credential: Credential) -> Result<Self, Error> {
        Self::with_options(base_url, credential, TransportOptions::default())
    }

    /// Create a client with explicit transport options.
    pub fn with_options(
        base_url: BaseUrl,
        credential: Credential,
        options: TransportOptions,
    ) -> Result<Self, Error> {
        let state = Arc::new(RwLock::new(SessionState::default()));
        let executor = RequestExecutor::new(base_url, &options, state.clone())?;

        Ok(Self {
            inner: Arc::new(SessionManager::new(credential, executor, state)),
        })
    }

    /// Create a client from a configuration record.
    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        Self::with_options(
            config.parse_base_url()?,
            config.credential()?,
            config.transport_options(),
        )
    }

    pub fn base_url(&self) -> &BaseUrl {
        self.inner.executor().base_url()
    }

    /// The session manager behind this client.
    pub fn session(&self) -> &SessionManager {
        &self.inner
    }

    pub fn credential(&self) -> &Credential {
        self.inner.credential()
    }

    /// See [`SessionManager::login`].
    pub async fn login(&self) -> Result<Value, Error> {
        self.inner.login().await
    }

    /// See [`SessionManager::logoff`].
    pub async fn logoff(&self) {
        self.inner.logoff().await
    }

    /// See [`SessionManager::extend_session`].
    pub async fn extend_session(&self) -> Result<(), Error> {
        self.inner.extend_session().await
    }

    /// See [`SessionManager::verify_session`].
    pub async fn verify_session(&self) -> Result<bool, Error> {
        self.inner.verify_session().await
    }

    /// See [`SessionManager::lazy_extend`].
    pub async fn lazy_extend(&self, refresh_threshold_minutes: u32) -> Result<bool, Error> {
        self.inner.lazy_extend(refresh_threshold_minutes).await
    }

    /// The current token, if logged in.
    pub async fn token(&self) -> Option<Token> {
        self.inner.state().await.token().cloned()
    }

    /// Seconds until the session expires, `-1.0` when unknown.
    pub async fn seconds_till_expires(&self) -> f64 {
        self.inner.state().await.seconds_till_expires()
    }

    /// Execute an arbitrary request descriptor.
    pub async fn request(&self, request: &RequestDescriptor) -> Result<Reply, Error> {
        self.inner.executor().execute(request).await
    }

    /// GET with optional query parameters.
    pub async fn get(&self, endpoint: &str, query: Option<Value>) -> Result<Reply, Error> {
        self.send(Method::Get, endpoint, query).await
    }

    /// GET and deserialize the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: Option<Value>,
    ) -> Result<T, Error> {
        self.get(endpoint, query).await?.json()
    }

    pub async fn post(&self, endpoint: &str, body: Option<Value>) -> Result<Reply, Error> {
        self.send(Method::Post, endpoint, body).await
    }

    pub async fn put(&self, endpoint: &str, body: Option<Value>) -> Result<Reply, Error> {
        self.send(Method::Put, endpoint, body).await
    }

    pub async fn patch(&self, endpoint: &str, body: Option<Value>) -> Result<Reply, Error> {
        self.send(Method::Patch, endpoint, body).await
    }

    pub async fn delete(&self, endpoint: &str, body: Option<Value>) -> Result<Reply, Error> {
        self.send(Method::Delete, endpoint, body).await
    }

    /// Page through a search endpoint. See [`Scroll`].
    pub fn scroll<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        total_key: &str,
        items_key: &str,
        query: Map<String, Value>,
        max_results: Option<usize>,
    ) -> Scroll<T> {
        Scroll::new(
            self.clone(),
            endpoint,
            total_key,
            items_key,
            query,
            max_results,
        )
    }

    /// Video endpoints.
    pub fn video(&self) -> VideoClient<'_> {
        VideoClient::new(self)
    }

    /// Release the connection pool. Requests issued afterwards fail with
    /// [`TransportError::Closed`](crate::error::TransportError::Closed).
    #[instrument(skip(self), fields(base_url = %self.base_url()))]
    pub async fn close(&self) {
        self.inner.executor().close().await;
        info!("Client closed");
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<Value>,
    ) -> Result<Reply, Error> {
        let mut request = RequestDescriptor::new(method, endpoint);
        if let Some(payload) = payload {
            request = request.json(payload);
        }
        self.request(&request).await
    }
}

impl fmt::Debug for RevClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevClient")
            .field("base_url", self.base_url())
            .field("credential", self.credential())
            .field("session", &"[REDACTED]")
            .finish()
    }
}
