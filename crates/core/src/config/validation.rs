//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

const MAX_TTL_SECS: u64 = 7 * 24 * 60 * 60;

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_ttl_secs` is 0 or exceeds one week
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` or `storage_namespace` is empty
    /// - `api_base_url` is not an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.cache_ttl_secs > MAX_TTL_SECS {
            return Err(ConfigError::Invalid { field: "cache_ttl_secs".into(), reason: "must not exceed one week".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.storage_namespace.is_empty() {
            return Err(ConfigError::Invalid { field: "storage_namespace".into(), reason: "must not be empty".into() });
        }

        match url::Url::parse(&self.api_base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(ConfigError::Invalid {
                    field: "api_base_url".into(),
                    reason: format!("unsupported scheme: {}", url.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::Invalid { field: "api_base_url".into(), reason: e.to_string() });
            }
        }

        if self.auth_token.is_none() {
            tracing::warn!("auth_token is not set; smart search and tracking require an authenticated session");
        }

        Ok(())
    }
}
