//! jobcache-mcp server entry point.
//!
//! Boots the jobs store and serves it as an MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use jobcache_client::{ApiConfig, JobsApiClient};
use jobcache_core::{AppConfig, JobsStore, PersistenceAdapter, SqliteStorage};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        api_base_url = %config.api_base_url,
        db_path = %config.db_path.display(),
        "Starting jobcache-mcp server on stdio transport"
    );

    let storage = SqliteStorage::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open storage at {}", config.db_path.display()))?;
    let persistence = PersistenceAdapter::new(Arc::new(storage), config.storage_namespace.clone());

    let client = Arc::new(JobsApiClient::new(ApiConfig::from(&config))?);
    let store = JobsStore::builder(client.clone(), client, persistence)
        .ttl(config.cache_ttl())
        .open()
        .await;

    let pruned = store.clear_expired_cache().await;
    if pruned > 0 {
        tracing::info!(pruned, "dropped expired cache entries on startup");
    }

    let handler = handler::JobCacheServer::new(Arc::new(store));
    let server = serve_server(handler, stdio()).await?;
    server.waiting().await?;

    Ok(())
}
