//! Mutable authentication state for one client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tokens::Token;
use crate::types::timestamp;

/// Current token, user id, and expiry of a session.
///
/// A fresh or cleared state has no token and no expiry, and counts as
/// expired. The state is only mutated through the session manager, which
/// holds it behind a lock so readers never observe a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<Token>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Returns the current token, if logged in.
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Returns the user id reported by the last login.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Returns the absolute expiry instant.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the session is expired right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(timestamp::now())
    }

    /// Whether the session is expired at `now`. An unknown expiry is expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now > expires_at,
            None => true,
        }
    }

    /// Seconds until expiry, or `-1.0` when no expiry is known.
    pub fn seconds_till_expires(&self) -> f64 {
        self.seconds_till_expires_at(timestamp::now())
    }

    /// Seconds from `now` until expiry, or `-1.0` when no expiry is known.
    pub fn seconds_till_expires_at(&self, now: DateTime<Utc>) -> f64 {
        match self.expires_at {
            Some(expires_at) => (expires_at - now).num_milliseconds() as f64 / 1000.0,
            None => -1.0,
        }
    }

    pub(crate) fn set_token(&mut self, token: Token) {
        self.token = Some(token);
    }

    pub(crate) fn set_user_id(&mut self, user_id: String) {
        self.user_id = Some(user_id);
    }

    pub(crate) fn set_expires_at(&mut self, expires_at: DateTime<Utc>) {
        self.expires_at = Some(expires_at);
    }

    /// Forget the token and expiry. The user id is kept so that user-scoped
    /// extend and logoff requests can still be formed.
    pub(crate) fn clear(&mut self) {
        self.token = None;
        self.expires_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn state_expiring_at(expires_at: DateTime<Utc>) -> SessionState {
        let mut state = SessionState::default();
        state.set_token(Token::new("t"));
        state.set_expires_at(expires_at);
        state
    }

    #[test]
    fn empty_state_is_expired() {
        let state = SessionState::default();
        assert!(state.is_expired());
        assert_eq!(state.seconds_till_expires(), -1.0);
    }

    #[test]
    fn expiry_compares_against_now() {
        let now = timestamp::now();
        let state = state_expiring_at(now);

        assert!(!state.is_expired_at(now));
        assert!(!state.is_expired_at(now - Duration::seconds(1)));
        assert!(state.is_expired_at(now + Duration::milliseconds(1)));
    }

    #[test]
    fn seconds_till_expires_is_signed() {
        let now = timestamp::now();
        let state = state_expiring_at(now + Duration::seconds(90));
        assert_eq!(state.seconds_till_expires_at(now), 90.0);

        let past = state_expiring_at(now - Duration::milliseconds(1500));
        assert_eq!(past.seconds_till_expires_at(now), -1.5);
    }

    #[test]
    fn clear_keeps_user_id() {
        let mut state = state_expiring_at(timestamp::now());
        state.set_user_id("user-1".into());
        state.clear();

        assert!(state.token().is_none());
        assert!(state.expires_at().is_none());
        assert!(state.is_expired());
        assert_eq!(state.user_id(), Some("user-1"));
    }

    #[test]
    fn persisted_shape_is_camel_case() {
        let mut state = SessionState::default();
        state.set_token(Token::new("abc"));
        state.set_user_id("u1".into());

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json, serde_json::json!({"token": "abc", "userId": "u1"}));

        let back: SessionState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
