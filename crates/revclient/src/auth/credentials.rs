//! Login credential type.

use std::fmt;

use crate::error::{ConfigurationError, Error};

/// How the client proves its identity to Rev.
///
/// A credential is built once and never mutated. Exactly one grant is held;
/// the fallible constructors reject empty fields so an incomplete pair can
/// never reach the login request.
///
/// # Security
///
/// Passwords and secrets are never exposed in Debug output.
///
/// # Example
///
/// ```
/// use revclient::Credential;
///
/// let creds = Credential::password("robot", "robot-password").unwrap();
/// assert_eq!(creds.username(), Some("robot"));
/// ```
#[derive(Clone)]
pub enum Credential {
    /// Username and password login.
    PasswordGrant { username: String, password: String },
    /// API key and secret login.
    KeyGrant { api_key: String, secret: String },
}

impl Credential {
    /// Create a username/password credential.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingCredentials`] if either field is empty.
    pub fn password(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, Error> {
        Self::from_parts(Some(username.into()), Some(password.into()), None, None)
    }

    /// Create an API key/secret credential.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingCredentials`] if either field is empty.
    pub fn api_key(
        api_key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, Error> {
        Self::from_parts(None, None, Some(api_key.into()), Some(secret.into()))
    }

    /// Build a credential from optional parts, as read from configuration.
    ///
    /// A complete username/password pair takes precedence over a complete
    /// key/secret pair. Empty strings count as missing.
    pub fn from_parts(
        username: Option<String>,
        password: Option<String>,
        api_key: Option<String>,
        secret: Option<String>,
    ) -> Result<Self, Error> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());

        match (present(username), present(password)) {
            (Some(username), Some(password)) => {
                Ok(Credential::PasswordGrant { username, password })
            }
            _ => match (present(api_key), present(secret)) {
                (Some(api_key), Some(secret)) => Ok(Credential::KeyGrant { api_key, secret }),
                _ => Err(ConfigurationError::MissingCredentials.into()),
            },
        }
    }

    /// Returns the username for password grants.
    pub fn username(&self) -> Option<&str> {
        match self {
            Credential::PasswordGrant { username, .. } => Some(username),
            Credential::KeyGrant { .. } => None,
        }
    }

    /// Returns the API key for key grants.
    pub fn key(&self) -> Option<&str> {
        match self {
            Credential::PasswordGrant { .. } => None,
            Credential::KeyGrant { api_key, .. } => Some(api_key),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::PasswordGrant { username, .. } => f
                .debug_struct("PasswordGrant")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Credential::KeyGrant { api_key, .. } => f
                .debug_struct("KeyGrant")
                .field("api_key", api_key)
                .field("secret", &"[REDACTED]")
                .finish(),
        }
    }
}
