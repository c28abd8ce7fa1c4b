//! # Fleet Client
//!
//! Thin HTTP client for the fleet backend REST API. Attaches the stored
//! bearer token and logs every call; retries and caching are left to callers.

pub mod client;
pub mod envelope;
pub mod error;
pub mod resource;

pub use client::ApiClient;
pub use envelope::ApiEnvelope;
pub use error::ClientError;
pub use resource::Resource;
