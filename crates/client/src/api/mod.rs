//! Jobs API client.
//!
//! Talks to the backend's jobs endpoints and implements the core
//! `SearchTransport` and `TrackingTransport` traits.
//!
//! ### Endpoints (relative to the configured base URL)
//!
//! - `GET jobs/search?keywords=..&location=..`
//! - `GET jobs/smart-search?location=..&query=..`
//! - `POST jobs/view` with a JSON body describing the viewed offer
//! - `POST jobs/apply/{job_id}` with an empty JSON body
//!
//! Requests carry a bearer token when one is configured. Timeouts are
//! enforced by the HTTP client and surface as [`ApiError::Timeout`].

pub mod error;
pub mod request;

pub use error::ApiError;
pub use request::{SmartSearchParams, StandardSearchParams};

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jobcache_core::{AppConfig, JobOffer, SearchTransport, TrackingTransport, TransportError, ViewMetadata};
use reqwest::{RequestBuilder, Response, header};
use serde::Serialize;
use url::Url;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "jobcache/0.1";

/// Jobs API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL including the version prefix, e.g. `http://localhost:8000/api/v1`.
    pub base_url: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: jobcache/0.x).
    pub user_agent: String,
    /// Bearer token for authenticated endpoints.
    pub auth_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1".to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            auth_token: None,
        }
    }
}

impl From<&AppConfig> for ApiConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            auth_token: config.auth_token.clone(),
        }
    }
}

/// Jobs API client.
#[derive(Debug, Clone)]
pub struct JobsApiClient {
    http: reqwest::Client,
    base: Url,
    auth_token: Option<String>,
}

impl JobsApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut base = Url::parse(&config.base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!("not a base URL: {}", config.base_url)));
        }
        // endpoints are joined relative to the version prefix
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| ApiError::Network(Arc::new(e)))?;

        Ok(Self { http, base, auth_token: config.auth_token })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base.join(path).map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    fn apply_endpoint(&self, job_id: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint("jobs/apply/")?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(job_id);
        Ok(url)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let req = req.header(header::ACCEPT, "application/json");
        match &self.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.authorize(req).send().await?;
        let status = response.status();
        tracing::debug!("jobs API response status: {}", status);

        if status == 401 || status == 403 {
            return Err(ApiError::AuthError { status: status.as_u16() });
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(ApiError::HttpError { status: status.as_u16() });
        }

        Ok(response)
    }

    async fn get_jobs(&self, path: &str, params: &impl Serialize) -> Result<Vec<JobOffer>, ApiError> {
        let start = Instant::now();
        let url = self.endpoint(path)?;

        let response = self.send(self.http.get(url).query(params)).await?;
        let bytes = response.bytes().await?;
        let jobs: Vec<JobOffer> = serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))?;

        tracing::debug!("{} completed in {:?}, {} results", path, start.elapsed(), jobs.len());
        Ok(jobs)
    }

    async fn post_json(&self, url: Url, body: &impl Serialize) -> Result<(), ApiError> {
        self.send(self.http.post(url).json(body)).await?;
        Ok(())
    }

    /// Keyword search.
    pub async fn search(&self, keywords: &str, location: Option<&str>) -> Result<Vec<JobOffer>, ApiError> {
        self.get_jobs("jobs/search", &StandardSearchParams { keywords, location })
            .await
    }

    /// Profile-driven search.
    pub async fn smart_search(&self, location: Option<&str>, query: Option<&str>) -> Result<Vec<JobOffer>, ApiError> {
        self.get_jobs("jobs/smart-search", &SmartSearchParams { location, query })
            .await
    }

    /// Record that the user opened an offer.
    pub async fn track_view(&self, metadata: &ViewMetadata) -> Result<(), ApiError> {
        self.post_json(self.endpoint("jobs/view")?, metadata).await
    }

    /// Record that the user applied to an offer.
    pub async fn track_application(&self, job_id: &str) -> Result<(), ApiError> {
        self.post_json(self.apply_endpoint(job_id)?, &serde_json::json!({}))
            .await
    }
}

#[async_trait]
impl SearchTransport for JobsApiClient {
    async fn standard_search(&self, keywords: &str, location: Option<&str>) -> Result<Vec<JobOffer>, TransportError> {
        Ok(self.search(keywords, location).await?)
    }

    async fn smart_search(
        &self, location: Option<&str>, query: Option<&str>,
    ) -> Result<Vec<JobOffer>, TransportError> {
        Ok(JobsApiClient::smart_search(self, location, query).await?)
    }
}

#[async_trait]
impl TrackingTransport for JobsApiClient {
    async fn post_view(&self, _item_id: &str, metadata: &ViewMetadata) -> Result<(), TransportError> {
        Ok(self.track_view(metadata).await?)
    }

    async fn post_application(&self, item_id: &str) -> Result<(), TransportError> {
        Ok(self.track_application(item_id).await?)
    }
}
