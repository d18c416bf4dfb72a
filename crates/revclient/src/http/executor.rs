//! HTTP request execution against a Rev tenant.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

use crate::auth::{AuthNegotiator, SharedState};
use crate::error::{Error, HttpError, InvalidArgumentError, TransportError};
use crate::types::BaseUrl;

use super::request::{Method, MultipartBody, Payload, RequestDescriptor, ResponseMode, query_pairs};
use super::response::{BodyKind, Reply};

const JSON_MIME: &str = "application/json";

/// Transport settings passed through to the HTTP client.
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// User agent; defaults to `revclient/<version>`.
    pub user_agent: Option<String>,
}

/// Executes request descriptors with consistent header and content negotiation.
///
/// The executor owns the connection pool. After [`close`](Self::close) every
/// request fails with [`TransportError::Closed`].
#[derive(Debug)]
pub struct RequestExecutor {
    base_url: BaseUrl,
    transport: RwLock<Option<reqwest::Client>>,
    session: SharedState,
}

impl RequestExecutor {
    pub(crate) fn new(
        base_url: BaseUrl,
        options: &TransportOptions,
        session: SharedState,
    ) -> Result<Self, Error> {
        let user_agent = options
            .user_agent
            .clone()
            .unwrap_or_else(|| concat!("revclient/", env!("CARGO_PKG_VERSION")).to_string());

        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            base_url,
            transport: RwLock::new(Some(client)),
            session,
        })
    }

    /// Returns the base URL requests are resolved against.
    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Release the connection pool. Idempotent.
    pub async fn close(&self) {
        if self.transport.write().await.take().is_some() {
            debug!("HTTP transport closed");
        }
    }

    /// Whether [`close`](Self::close) has been called.
    pub async fn is_closed(&self) -> bool {
        self.transport.read().await.is_none()
    }

    /// Execute one request.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if the payload cannot be placed on the request
    /// - [`Error::Http`] for a non-2xx status (except in [`ResponseMode::Raw`])
    /// - [`Error::Transport`] for network failures or a closed client
    /// - [`Error::Decode`] if a JSON or text body is malformed
    #[instrument(skip(self, request), fields(method = %request.method, endpoint = %request.endpoint))]
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<Reply, Error> {
        let client = self
            .transport
            .read()
            .await
            .clone()
            .ok_or(TransportError::Closed)?;

        let url = self.base_url.join(&request.endpoint)?;
        let headers = self.negotiate_headers(request).await?;
        let accept = headers
            .get(ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        debug!(%url, "Sending request");

        let mut builder = client
            .request(request.method.to_reqwest(), url)
            .headers(headers);

        builder = match &request.payload {
            None => builder,
            Some(Payload::Json(value)) if request.method == Method::Get => {
                builder.query(&query_pairs(value)?)
            }
            Some(_) if request.method == Method::Get => {
                return Err(InvalidArgumentError::Payload {
                    reason: "GET requests only accept query parameters".to_string(),
                }
                .into());
            }
            Some(Payload::Json(value)) => builder.json(value),
            Some(Payload::Text(text)) => builder.body(text.clone()),
            Some(Payload::Bytes(bytes)) => builder.body(bytes.clone()),
            Some(Payload::Multipart(body)) => builder.multipart(build_form(body)?),
        };

        let response = builder.send().await?;
        let status = response.status();
        trace!(status = %status, "Response received");

        if request.mode == ResponseMode::Raw {
            return Ok(Reply::Raw(response));
        }

        if !status.is_success() {
            return Err(Error::Http(parse_error_response(response).await));
        }

        if request.mode == ResponseMode::Stream {
            let stream = response.bytes_stream().map(|chunk| chunk.map_err(Error::from));
            return Ok(Reply::Stream(Box::pin(stream)));
        }

        // Without a Content-Type header, fall back to what was asked for.
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or(accept)
            .unwrap_or_default();

        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(Reply::NoContent);
        }

        match BodyKind::from_content_type(&content_type) {
            BodyKind::Json => serde_json::from_slice(&body)
                .map(Reply::Json)
                .map_err(|e| Error::decode(format!("invalid JSON body: {}", e))),
            BodyKind::Text => String::from_utf8(body.to_vec())
                .map(Reply::Text)
                .map_err(|e| Error::decode(format!("invalid text body: {}", e))),
            BodyKind::Binary => Ok(Reply::Bytes(body)),
        }
    }

    /// Defaults first, then the session token, then caller overrides.
    async fn negotiate_headers(&self, request: &RequestDescriptor) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();

        if !request.is_multipart() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MIME));
        }
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MIME));

        if !request.headers.contains_key(AUTHORIZATION) {
            let authorization = AuthNegotiator::authorization(&*self.session.read().await);
            if let Some(authorization) = authorization {
                let mut value = HeaderValue::from_str(&authorization).map_err(|e| {
                    InvalidArgumentError::Header {
                        name: AUTHORIZATION.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }

        for (name, value) in request.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        Ok(headers)
    }
}

fn build_form(body: &MultipartBody) -> Result<Form, Error> {
    let mut form = Form::new();

    for (name, value) in &body.data {
        form = form.text(name.clone(), value.clone());
    }

    for file in &body.files {
        let part = Part::bytes(file.data.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| InvalidArgumentError::Payload {
                reason: format!("invalid content type '{}': {}", file.content_type, e),
            })?;
        form = form.part(file.field.clone(), part);
    }

    Ok(form)
}

/// Build an [`HttpError`], keeping whatever body the server sent.
async fn parse_error_response(response: reqwest::Response) -> HttpError {
    let status = response.status().as_u16();

    let body = match response.bytes().await {
        Ok(bytes) if bytes.is_empty() => None,
        Ok(bytes) => Some(
            serde_json::from_slice::<Value>(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned())),
        ),
        Err(_) => None,
    };

    HttpError::new(status, body)
}
