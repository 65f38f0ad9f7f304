//! job_search and job_smart_search tool implementations.

use jobcache_core::{Error, JobOffer, JobsStore};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for job_search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct JobSearchParams {
    /// Free-text keywords (required).
    pub keywords: String,

    /// City name or code.
    #[serde(default)]
    pub location: Option<String>,
}

/// Input parameters for job_smart_search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct JobSmartSearchParams {
    /// City name or code.
    #[serde(default)]
    pub location: Option<String>,

    /// Natural-language description of the jobs wanted.
    #[serde(default)]
    pub query: Option<String>,
}

/// Output structure for both search tools.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutput {
    pub count: usize,
    pub jobs: Vec<JobOffer>,
}

impl From<Vec<JobOffer>> for SearchOutput {
    fn from(jobs: Vec<JobOffer>) -> Self {
        Self { count: jobs.len(), jobs }
    }
}

/// Implementation of the job_search tool.
pub async fn search_impl(store: &JobsStore, params: JobSearchParams) -> Result<CallToolResult, McpError> {
    let keywords = params.keywords.trim();
    if keywords.is_empty() {
        return Err(Error::InvalidInput("keywords cannot be empty".into()).into());
    }

    let jobs = store.search(keywords, params.location.as_deref()).await?;
    json_result(&SearchOutput::from(jobs))
}

/// Implementation of the job_smart_search tool.
pub async fn smart_search_impl(store: &JobsStore, params: JobSmartSearchParams) -> Result<CallToolResult, McpError> {
    let jobs = store
        .smart_search(params.location.as_deref(), params.query.as_deref())
        .await?;
    json_result(&SearchOutput::from(jobs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fixtures::{output_json, test_store};

    #[tokio::test]
    async fn test_empty_keywords() {
        let (store, search) = test_store().await;
        let params = JobSearchParams { keywords: "  ".into(), location: None };

        let result = search_impl(&store, params).await;
        assert!(result.is_err());
        assert_eq!(search.calls(), 0);
    }

    #[tokio::test]
    async fn test_search_returns_jobs_and_caches() {
        let (store, search) = test_store().await;
        let params = JobSearchParams { keywords: "rust".into(), location: Some("Paris".into()) };

        let result = search_impl(&store, params.clone()).await.unwrap();
        let output = output_json(&result);
        assert_eq!(output["count"], 2);
        assert_eq!(output["jobs"][0]["id"], "42");

        search_impl(&store, params).await.unwrap();
        assert_eq!(search.calls(), 1);
    }

    #[tokio::test]
    async fn test_smart_search_failure_is_tool_error() {
        let (store, _search) = test_store().await;
        let params = JobSmartSearchParams { location: None, query: Some("fail".into()) };

        let err = smart_search_impl(&store, params).await.unwrap_err();
        assert_eq!(err.code.0, -32000);

        let view = store.snapshot().await;
        assert!(view.has_searched);
        assert!(view.last_error.is_some());
    }
}
