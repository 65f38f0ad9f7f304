//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{
    JobSearchParams, JobSmartSearchParams, RecordApplicationParams, RecordViewParams,
    search::{search_impl, smart_search_impl},
    store::{clear_cache_impl, clear_expired_impl, reset_impl, state_impl},
    tracking::{record_application_impl, record_view_impl},
};
use jobcache_core::JobsStore;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for jobcache.
#[derive(Clone)]
pub struct JobCacheServer {
    store: Arc<JobsStore>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
#[tool_router]
impl JobCacheServer {
    /// Create a new server handler over a shared store.
    pub fn new(store: Arc<JobsStore>) -> Self {
        Self { store, tool_router: Self::tool_router() }
    }

    /// Keyword search, served from the cache while the entry is fresh.
    #[tool(description = "Search job offers by keywords and optional location. Fresh results are served from the local cache.")]
    async fn job_search(&self, params: Parameters<JobSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.store, params.0).await
    }

    #[tool(description = "Profile-driven job search with an optional location and natural-language query. Cached like job_search.")]
    async fn job_smart_search(&self, params: Parameters<JobSmartSearchParams>) -> Result<CallToolResult, McpError> {
        smart_search_impl(&self.store, params.0).await
    }

    /// Mark an offer viewed in every cached list and report it to the backend.
    #[tool(description = "Record that a job offer was viewed. The flag is set locally even if the backend is unreachable.")]
    async fn job_record_view(&self, params: Parameters<RecordViewParams>) -> Result<CallToolResult, McpError> {
        record_view_impl(&self.store, params.0).await
    }

    #[tool(description = "Record an application to a job offer. Marks the offer applied and viewed in every cached list.")]
    async fn job_record_application(
        &self, params: Parameters<RecordApplicationParams>,
    ) -> Result<CallToolResult, McpError> {
        record_application_impl(&self.store, params.0).await
    }

    #[tool(description = "Return the current result list, loading flag, last error and last query.")]
    async fn jobs_state(&self) -> Result<CallToolResult, McpError> {
        state_impl(&self.store).await
    }

    #[tool(description = "Drop every cached search result. Returns the number of entries deleted.")]
    async fn cache_clear(&self) -> Result<CallToolResult, McpError> {
        clear_cache_impl(&self.store).await
    }

    #[tool(description = "Drop cached search results older than the TTL. Returns the number of entries deleted.")]
    async fn cache_clear_expired(&self) -> Result<CallToolResult, McpError> {
        clear_expired_impl(&self.store).await
    }

    #[tool(description = "Forget the current results and search history. Cached entries are kept.")]
    async fn jobs_reset(&self) -> Result<CallToolResult, McpError> {
        reset_impl(&self.store).await
    }
}

impl ServerHandler for JobCacheServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "jobcache-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
