//! Client code for jobcache.
//!
//! This crate provides the HTTP implementation of the search and tracking
//! transports defined in `jobcache-core`.

pub mod api;

pub use api::{ApiConfig, ApiError, JobsApiClient};
