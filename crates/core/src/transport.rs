//! Boundaries to the remote jobs API.
//!
//! The store never talks HTTP itself; it is handed implementations of these
//! traits at construction time.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::JobOffer;

/// Errors surfaced by a transport implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timeout")]
    Timeout,

    #[error("authentication failed: {0}")]
    Unauthorized(String),

    #[error("HTTP error: {status}")]
    Http { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

/// Remote search backend.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Keyword search, optionally narrowed to a location.
    async fn standard_search(&self, keywords: &str, location: Option<&str>) -> Result<Vec<JobOffer>, TransportError>;

    /// Profile-driven search with an optional natural-language query.
    async fn smart_search(&self, location: Option<&str>, query: Option<&str>)
    -> Result<Vec<JobOffer>, TransportError>;
}

/// Metadata sent along with a view event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewMetadata {
    pub job_id: String,
    pub job_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub status: String,
}

impl ViewMetadata {
    pub fn for_job(job: &JobOffer) -> Self {
        Self {
            job_id: job.id.clone(),
            job_title: job.title().unwrap_or_default().to_string(),
            company_name: job.company_name().map(str::to_string),
            status: "VIEWED".to_string(),
        }
    }
}

/// Best-effort view/application telemetry.
#[async_trait]
pub trait TrackingTransport: Send + Sync {
    async fn post_view(&self, item_id: &str, metadata: &ViewMetadata) -> Result<(), TransportError>;

    async fn post_application(&self, item_id: &str) -> Result<(), TransportError>;
}
