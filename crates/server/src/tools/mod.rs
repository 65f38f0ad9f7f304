//! MCP tool implementations.
//!
//! This module contains all tools exposed by the jobcache server. Each tool
//! is a thin adapter over a `JobsStore` operation.

pub mod search;
pub mod store;
pub mod tracking;

#[cfg(test)]
pub(crate) mod fixtures;

use jobcache_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

pub use search::{JobSearchParams, JobSmartSearchParams};
pub use tracking::{RecordApplicationParams, RecordViewParams};

/// Render a tool output as pretty JSON text content.
pub(crate) fn json_result(output: &impl Serialize) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
