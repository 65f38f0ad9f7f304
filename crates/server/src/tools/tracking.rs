//! job_record_view and job_record_application tool implementations.

use jobcache_core::{Error, JobOffer, JobsStore};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Parameters for job_record_view.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RecordViewParams {
    /// Identifier of the offer the user opened.
    pub job_id: String,
}

/// Parameters for job_record_application.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RecordApplicationParams {
    /// Identifier of the offer the user applied to.
    pub job_id: String,
}

#[derive(Debug, Clone, Serialize)]
struct RecordOutput<'a> {
    job_id: &'a str,
    is_viewed: bool,
    is_applied: bool,
}

fn require_id(job_id: &str) -> Result<&str, McpError> {
    let job_id = job_id.trim();
    if job_id.is_empty() {
        return Err(Error::InvalidInput("job_id cannot be empty".into()).into());
    }
    Ok(job_id)
}

/// Implementation of the job_record_view tool.
///
/// Tracking metadata comes from the displayed or cached copy of the offer
/// when there is one; otherwise only the id is reported.
pub async fn record_view_impl(store: &JobsStore, params: RecordViewParams) -> Result<CallToolResult, McpError> {
    let job_id = require_id(&params.job_id)?;
    let job = store
        .find_job(job_id)
        .await
        .unwrap_or_else(|| JobOffer::new(job_id));

    store.record_view(&job).await;
    json_result(&RecordOutput { job_id, is_viewed: true, is_applied: job.is_applied })
}

/// Implementation of the job_record_application tool.
pub async fn record_application_impl(
    store: &JobsStore, params: RecordApplicationParams,
) -> Result<CallToolResult, McpError> {
    let job_id = require_id(&params.job_id)?;
    store.record_application(job_id).await;
    json_result(&RecordOutput { job_id, is_viewed: true, is_applied: true })
}
