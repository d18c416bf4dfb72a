//! Request descriptors.
//!
//! A [`RequestDescriptor`] says what to send; the executor decides how. It is
//! a plain value so the session layer can build login/extend/logoff calls
//! without touching the transport.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use crate::error::{Error, InvalidArgumentError};

/// HTTP methods accepted by the Rev API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Delete,
    Post,
    Put,
    Patch,
    Options,
}

impl Method {
    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Delete => "DELETE",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Options => "OPTIONS",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Delete => reqwest::Method::DELETE,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    /// Parse a method name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "HEAD" => Ok(Method::Head),
            "DELETE" => Ok(Method::Delete),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(InvalidArgumentError::Method {
                value: s.to_string(),
            }
            .into()),
        }
    }
}

/// One file in a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name, e.g. `VideoFile`.
    pub field: String,
    /// File name sent in the part's content disposition.
    pub file_name: String,
    /// MIME type of the part.
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

/// A multipart form: file parts plus string fields.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    pub files: Vec<FilePart>,
    pub data: Vec<(String, String)>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.push((name.into(), value.into()));
        self
    }
}

/// What to send with a request.
///
/// For `GET`, a [`Payload::Json`] object becomes query parameters; for every
/// other method it is the JSON body.
#[derive(Debug, Clone)]
pub enum Payload {
    Json(Value),
    Text(String),
    Bytes(Bytes),
    Multipart(MultipartBody),
}

/// What the caller wants back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseMode {
    /// Check the status and decode the body by content type.
    #[default]
    Decoded,
    /// Return the response handle untouched, without a status check.
    Raw,
    /// Check the status and return the unbuffered byte stream.
    Stream,
}

/// Description of a single HTTP call.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub endpoint: String,
    pub payload: Option<Payload>,
    pub headers: HeaderMap,
    pub mode: ResponseMode,
}

impl RequestDescriptor {
    /// Create a descriptor with no payload and default headers.
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            payload: None,
            headers: HeaderMap::new(),
            mode: ResponseMode::Decoded,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Post, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Put, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Patch, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Delete, endpoint)
    }

    /// Attach a JSON payload (query parameters for GET).
    pub fn json(self, value: Value) -> Self {
        self.payload(Payload::Json(value))
    }

    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn mode(mut self, mode: ResponseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Override a header. Caller headers always win over defaults.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self, Error> {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| InvalidArgumentError::Header {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| InvalidArgumentError::Header {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub(crate) fn is_multipart(&self) -> bool {
        matches!(self.payload, Some(Payload::Multipart(_)))
    }
}

/// Flatten a JSON object into query pairs.
///
/// Arrays repeat the key, nulls are dropped, and nested objects are sent as
/// their JSON text.
pub(crate) fn query_pairs(value: &Value) -> Result<Vec<(String, String)>, Error> {
    let object = value.as_object().ok_or_else(|| InvalidArgumentError::Payload {
        reason: "GET payload must be a JSON object of query parameters".to_string(),
    })?;

    let mut pairs = Vec::with_capacity(object.len());
    for (key, value) in object {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_text(item) {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar_text(other) {
                    pairs.push((key.clone(), text));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("Patch".parse::<Method>().unwrap(), Method::Patch);
        assert_eq!("OPTIONS".parse::<Method>().unwrap(), Method::Options);
    }

    #[test]
    fn unknown_method_is_invalid_argument() {
        for bad in ["TRACE", "CONNECT", "FETCH", ""] {
            let err = bad.parse::<Method>().unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidArgument(InvalidArgumentError::Method { .. })
            ));
        }
    }

    #[test]
    fn query_pairs_flatten_object() {
        let pairs = query_pairs(&json!({
            "q": "town hall",
            "count": 25,
            "active": true,
            "skip": null,
            "tags": ["a", "b"]
        }))
        .unwrap();

        assert!(pairs.contains(&("q".into(), "town hall".into())));
        assert!(pairs.contains(&("count".into(), "25".into())));
        assert!(pairs.contains(&("active".into(), "true".into())));
        assert!(pairs.contains(&("tags".into(), "a".into())));
        assert!(pairs.contains(&("tags".into(), "b".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "skip"));
    }

    #[test]
    fn query_pairs_reject_non_object() {
        assert!(query_pairs(&json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn invalid_header_is_rejected() {
        let result = RequestDescriptor::get("/api").header("Bad Header", "x");
        assert!(matches!(
            result,
            Err(Error::InvalidArgument(InvalidArgumentError::Header { .. }))
        ));
    }
}
