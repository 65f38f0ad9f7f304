//! jobs_state, cache_clear, cache_clear_expired and jobs_reset tool
//! implementations.

use jobcache_core::JobsStore;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use serde::Serialize;

use super::json_result;

/// Output from the cache purge tools.
#[derive(Debug, Clone, Serialize)]
pub struct PurgeOutput {
    /// Number of entries deleted.
    pub deleted: usize,
}

/// Implementation of the jobs_state tool.
pub async fn state_impl(store: &JobsStore) -> Result<CallToolResult, McpError> {
    json_result(&store.snapshot().await)
}

/// Implementation of the cache_clear tool.
pub async fn clear_cache_impl(store: &JobsStore) -> Result<CallToolResult, McpError> {
    json_result(&PurgeOutput { deleted: store.clear_cache().await })
}

/// Implementation of the cache_clear_expired tool.
pub async fn clear_expired_impl(store: &JobsStore) -> Result<CallToolResult, McpError> {
    json_result(&PurgeOutput { deleted: store.clear_expired_cache().await })
}

/// Implementation of the jobs_reset tool.
pub async fn reset_impl(store: &JobsStore) -> Result<CallToolResult, McpError> {
    store.reset().await;
    json_result(&store.snapshot().await)
}
