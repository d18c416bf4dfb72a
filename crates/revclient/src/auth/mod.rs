//! Authentication types and request negotiation.
//!
//! This module holds the credential and session-state values plus the
//! [`AuthNegotiator`] that turns them into login, extend, and logoff calls.
//! The lifecycle itself lives in [`crate::session`].

mod credentials;
pub(crate) mod endpoints;
mod negotiator;
mod state;
mod tokens;

use std::sync::Arc;
use tokio::sync::RwLock;

pub use credentials::Credential;
pub use negotiator::AuthNegotiator;
pub use state::SessionState;
pub use tokens::Token;

/// Session state shared between the executor (reads) and the session
/// manager (writes).
pub(crate) type SharedState = Arc<RwLock<SessionState>>;
