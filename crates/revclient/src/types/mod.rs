//! Validated value types shared across the client.

mod base_url;
pub mod timestamp;

pub use base_url::BaseUrl;
pub use timestamp::{format_iso, parse_iso};
