//! HTTP request pipeline.
//!
//! This module provides the request descriptor types and the executor that
//! sends them to the Rev API.

mod executor;
mod request;
mod response;

pub use executor::{RequestExecutor, TransportOptions};
pub use request::{FilePart, Method, MultipartBody, Payload, RequestDescriptor, ResponseMode};
pub use response::{ByteStream, Reply};
