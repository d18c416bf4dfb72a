//! revclient - Vbrick Rev API client
//!
//! This library handles the authentication lifecycle against a Rev tenant
//! (login, extension, logoff) and sends authenticated requests on top of it.
//! All operations flow through a [`RevClient`], which is cheap to clone and
//! safe to share between tasks.
//!
//! # Example
//!
//! ```no_run
//! use revclient::{BaseUrl, Credential, RevClient, DEFAULT_REFRESH_THRESHOLD_MINUTES};
//!
//! # async fn example() -> Result<(), revclient::Error> {
//! let client = RevClient::new(
//!     BaseUrl::new("https://tenant.rev.vbrick.com")?,
//!     Credential::api_key("api-key", "secret")?,
//! )?;
//! client.login().await?;
//!
//! let users: serde_json::Value = client
//!     .get_json("/api/v2/users/search", Some(serde_json::json!({ "q": "robot" })))
//!     .await?;
//! println!("{users}");
//!
//! client.lazy_extend(DEFAULT_REFRESH_THRESHOLD_MINUTES).await?;
//! client.logoff().await;
//! client.close().await;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod scroll;
pub mod session;
pub mod types;
pub mod video;

// Re-export primary types at crate root for convenience
pub use auth::{AuthNegotiator, Credential, SessionState, Token};
pub use client::{ClientConfig, RevClient};
pub use error::Error;
pub use http::{
    FilePart, Method, MultipartBody, Payload, Reply, RequestDescriptor, ResponseMode,
    TransportOptions,
};
pub use scroll::{PageResult, Scroll};
pub use session::{DEFAULT_REFRESH_THRESHOLD_MINUTES, SessionManager};
pub use types::BaseUrl;
pub use video::{MigrateOptions, PatchField, PatchOutcome, UploadFile, VideoClient};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
