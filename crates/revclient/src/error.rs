//! Error types for the revclient library.
//!
//! This module provides a unified error type with explicit variants for
//! configuration, argument validation, HTTP status, transport, and decoding
//! failures.

use std::fmt;
use thiserror::Error;

/// The unified error type for revclient operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or incoherent client configuration (credentials, base URL).
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A caller-supplied argument was rejected before any request was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgumentError),

    /// The server answered with a non-2xx status.
    #[error("{0}")]
    Http(#[from] HttpError),

    /// Network transport errors (connection, timeout, closed client).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A successful response did not have the expected shape.
    #[error("decode error: {message}")]
    Decode { message: String },
}

impl Error {
    /// Returns the HTTP status code if this is an [`HttpError`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http(err) => Some(err.status),
            _ => None,
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }
}

/// Configuration errors, surfaced at construction time.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Neither a username/password pair nor an api key/secret pair is complete.
    #[error("authentication details not set: need username and password, or api key and secret")]
    MissingCredentials,

    /// The base URL could not be used.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// A configuration document could not be read.
    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

/// Argument validation errors.
#[derive(Debug, Error)]
pub enum InvalidArgumentError {
    /// HTTP method outside the supported set.
    #[error("unsupported HTTP method '{value}'")]
    Method { value: String },

    /// The payload cannot be placed on the request.
    #[error("invalid payload: {reason}")]
    Payload { reason: String },

    /// A header name or value is not valid.
    #[error("invalid header '{name}': {reason}")]
    Header { name: String, reason: String },

    /// A timestamp is not in the accepted ISO-8601 shape.
    #[error("invalid timestamp '{value}': {reason}")]
    Timestamp { value: String, reason: String },

    /// A metadata key outside the patchable set.
    #[error(transparent)]
    Field(#[from] crate::video::UnsupportedField),

    /// Generic invalid input.
    #[error("{message}")]
    Other { message: String },
}

/// A non-2xx response from the server.
#[derive(Debug)]
pub struct HttpError {
    /// HTTP status code.
    pub status: u16,
    /// Error body: parsed JSON when possible, otherwise the raw text as a
    /// JSON string. `None` when the body was empty.
    pub body: Option<serde_json::Value>,
}

impl HttpError {
    /// Create a new HTTP error.
    pub fn new(status: u16, body: Option<serde_json::Value>) -> Self {
        Self { status, body }
    }

    /// Check if this status should never be retried on login.
    pub fn is_auth_rejection(&self) -> bool {
        self.status == 401 || self.status == 429
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        match &self.body {
            Some(serde_json::Value::String(text)) => write!(f, ": {}", text),
            Some(body) => write!(f, ": {}", body),
            None => Ok(()),
        }
    }
}

impl std::error::Error for HttpError {}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// The client was closed; no further requests may be issued.
    #[error("client is closed")]
    Closed,

    /// Any other failure while sending or receiving.
    #[error("HTTP transport error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout {
                message: err.to_string(),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_error_display_includes_status_and_body() {
        let err = HttpError::new(404, Some(json!({"code": "NotFound"})));
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("NotFound"));
    }

    #[test]
    fn http_error_display_text_body_is_unquoted() {
        let err = HttpError::new(500, Some(json!("Internal Server Error")));
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
    }

    #[test]
    fn status_only_reported_for_http_errors() {
        let http: Error = HttpError::new(429, None).into();
        assert_eq!(http.status(), Some(429));

        let closed: Error = TransportError::Closed.into();
        assert_eq!(closed.status(), None);
    }

    #[test]
    fn auth_rejection_statuses() {
        assert!(HttpError::new(401, None).is_auth_rejection());
        assert!(HttpError::new(429, None).is_auth_rejection());
        assert!(!HttpError::new(500, None).is_auth_rejection());
    }
}
