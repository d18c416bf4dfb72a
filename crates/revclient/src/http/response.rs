//! Decoded responses.

use std::fmt;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;

/// An unbuffered response body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, Error>> + Send>>;

/// The result of executing a request.
pub enum Reply {
    /// The body was empty.
    NoContent,
    /// `application/json` body.
    Json(Value),
    /// Text-family body (`text/*`, XML, JavaScript, SubRip).
    Text(String),
    /// Any other body, unconsumed as raw bytes.
    Bytes(Bytes),
    /// Open byte stream, returned in [`ResponseMode::Stream`](super::ResponseMode::Stream).
    Stream(ByteStream),
    /// Response handle, returned in [`ResponseMode::Raw`](super::ResponseMode::Raw).
    Raw(reqwest::Response),
}

impl Reply {
    /// Returns true for an empty body.
    pub fn is_no_content(&self) -> bool {
        matches!(self, Reply::NoContent)
    }

    /// The JSON body, `None` for no content.
    pub fn into_json(self) -> Result<Option<Value>, Error> {
        match self {
            Reply::NoContent => Ok(None),
            Reply::Json(value) => Ok(Some(value)),
            other => Err(Error::decode(format!(
                "expected a JSON body, got {}",
                other.kind()
            ))),
        }
    }

    /// Deserialize a JSON body into `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, Error> {
        match self.into_json()? {
            Some(value) => serde_json::from_value(value).map_err(|e| Error::decode(e.to_string())),
            None => Err(Error::decode("expected a JSON body, got no content")),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Reply::NoContent => "no content",
            Reply::Json(_) => "json",
            Reply::Text(_) => "text",
            Reply::Bytes(_) => "bytes",
            Reply::Stream(_) => "stream",
            Reply::Raw(_) => "raw response",
        }
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::NoContent => f.write_str("NoContent"),
            Reply::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Reply::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Reply::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Reply::Stream(_) => f.write_str("Stream(..)"),
            Reply::Raw(response) => f.debug_tuple("Raw").field(&response.status()).finish(),
        }
    }
}

/// How a body should be decoded, by content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BodyKind {
    Json,
    Text,
    Binary,
}

impl BodyKind {
    pub(crate) fn from_content_type(content_type: &str) -> Self {
        let content_type = content_type.trim().to_ascii_lowercase();
        if content_type.starts_with("application/json") {
            BodyKind::Json
        } else if is_text_mime(&content_type) {
            BodyKind::Text
        } else {
            BodyKind::Binary
        }
    }
}

fn is_text_mime(content_type: &str) -> bool {
    content_type.starts_with("text")
        || ["application/xml", "application/javascript", "application/x-subrip"]
            .iter()
            .any(|prefix| content_type.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_content_types() {
        assert_eq!(
            BodyKind::from_content_type("application/json; charset=utf-8"),
            BodyKind::Json
        );
        assert_eq!(BodyKind::from_content_type("text/plain"), BodyKind::Text);
        assert_eq!(BodyKind::from_content_type("text/vtt"), BodyKind::Text);
        assert_eq!(BodyKind::from_content_type("application/xml"), BodyKind::Text);
        assert_eq!(
            BodyKind::from_content_type("application/x-subrip"),
            BodyKind::Text
        );
        assert_eq!(BodyKind::from_content_type("video/mp4"), BodyKind::Binary);
        assert_eq!(
            BodyKind::from_content_type("application/octet-stream"),
            BodyKind::Binary
        );
        assert_eq!(BodyKind::from_content_type(""), BodyKind::Binary);
    }

    #[test]
    fn no_content_is_not_empty_json() {
        assert_eq!(Reply::NoContent.into_json().unwrap(), None);
        assert_eq!(
            Reply::Json(json!({})).into_json().unwrap(),
            Some(json!({}))
        );
    }

    #[test]
    fn typed_json_requires_a_body() {
        let err = Reply::NoContent.json::<Value>().unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn text_is_not_json() {
        let err = Reply::Text("hi".into()).into_json().unwrap_err();
        assert!(err.to_string().contains("text"));
    }
}
