//! Translation between credentials, session state, and auth requests.

use serde_json::{Value, json};

use super::credentials::Credential;
use super::endpoints::*;
use super::state::SessionState;
use super::tokens::Token;
use crate::error::{Error, InvalidArgumentError};
use crate::http::RequestDescriptor;
use crate::types::parse_iso;

/// Builds login, extend, and logoff requests for a credential and folds
/// server responses back into [`SessionState`].
#[derive(Debug, Clone)]
pub struct AuthNegotiator {
    credential: Credential,
}

impl AuthNegotiator {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Login request for the held grant.
    pub fn build_login(&self) -> RequestDescriptor {
        match &self.credential {
            Credential::PasswordGrant { username, password } => RequestDescriptor::post(USER_LOGIN)
                .json(json!({ "username": username, "password": password })),
            Credential::KeyGrant { api_key, secret } => RequestDescriptor::post(AUTHENTICATE)
                .json(json!({ "apiKey": api_key, "secret": secret })),
        }
    }

    /// Logoff request, or `None` when there is nothing to revoke.
    pub fn build_logoff(&self, session: &SessionState) -> Option<RequestDescriptor> {
        match &self.credential {
            Credential::PasswordGrant { .. } => session.user_id().map(|user_id| {
                RequestDescriptor::post(USER_LOGOFF).json(json!({ "userId": user_id }))
            }),
            Credential::KeyGrant { api_key, .. } => {
                Some(RequestDescriptor::delete(format!("{}/{}", TOKENS, api_key)))
            }
        }
    }

    /// Session extension request.
    pub fn build_extend(&self, session: &SessionState) -> RequestDescriptor {
        match &self.credential {
            Credential::KeyGrant { api_key, .. } => {
                RequestDescriptor::post(format!("{}/{}", KEY_EXTEND_SESSION, api_key))
            }
            Credential::PasswordGrant { .. } => RequestDescriptor::post(USER_EXTEND_SESSION)
                .json(json!({ "userId": session.user_id() })),
        }
    }

    /// Apply the `token`, `id`, and `expiration` fields of a response.
    ///
    /// Fields that are absent leave the state untouched. The expiration is
    /// parsed before anything is written, so a malformed response changes
    /// nothing.
    pub fn apply_response(session: &mut SessionState, body: &Value) -> Result<(), Error> {
        let expires_at = match body.get("expiration") {
            Some(Value::String(expiration)) => Some(parse_iso(expiration)?),
            Some(Value::Null) | None => None,
            Some(other) => {
                return Err(InvalidArgumentError::Timestamp {
                    value: other.to_string(),
                    reason: "expiration must be a string".to_string(),
                }
                .into());
            }
        };

        if let Some(token) = body.get("token").and_then(Value::as_str) {
            session.set_token(Token::new(token));
        }
        if let Some(id) = body.get("id").and_then(Value::as_str) {
            session.set_user_id(id.to_string());
        }
        if let Some(expires_at) = expires_at {
            session.set_expires_at(expires_at);
        }

        Ok(())
    }

    /// `Authorization` header value for the current token.
    pub fn authorization(session: &SessionState) -> Option<String> {
        session
            .token()
            .map(|token| format!("VBrick {}", token.as_str()))
    }
}
