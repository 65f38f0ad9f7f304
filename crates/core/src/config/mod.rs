//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (JOBCACHE_*)
//! 2. TOML config file (if JOBCACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (JOBCACHE_*)
/// 2. TOML config file (if JOBCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the jobs API, including the version prefix.
    ///
    /// Set via JOBCACHE_API_BASE_URL environment variable.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer token for the jobs API.
    ///
    /// Set via JOBCACHE_AUTH_TOKEN environment variable.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Path to the SQLite database holding persisted state.
    ///
    /// Set via JOBCACHE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Storage namespace the state is written under.
    ///
    /// Set via JOBCACHE_STORAGE_NAMESPACE environment variable.
    #[serde(default = "default_storage_namespace")]
    pub storage_namespace: String,

    /// Seconds after which a cached result list is refetched.
    ///
    /// Set via JOBCACHE_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via JOBCACHE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via JOBCACHE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api/v1".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./jobcache.sqlite")
}

fn default_storage_namespace() -> String {
    "jobs-storage".into()
}

fn default_cache_ttl_secs() -> u64 {
    1_800 // 30 minutes
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_user_agent() -> String {
    "jobcache/0.1".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            auth_token: None,
            db_path: default_db_path(),
            storage_namespace: default_storage_namespace(),
            cache_ttl_secs: default_cache_ttl_secs(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache TTL as Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `JOBCACHE_`
    /// 2. TOML file from `JOBCACHE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("JOBCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("JOBCACHE_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.db_path, PathBuf::from("./jobcache.sqlite"));
        assert_eq!(config.storage_namespace, "jobs-storage");
        assert_eq!(config.cache_ttl_secs, 1_800);
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.user_agent, "jobcache/0.1");
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
        assert_eq!(config.cache_ttl(), Duration::from_secs(1_800));
    }

    #[test]
    fn test_toml_layer_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("jobcache.toml", "cache_ttl_secs = 60\nstorage_namespace = \"tests\"")?;
            jail.set_env("JOBCACHE_CONFIG_FILE", "jobcache.toml");
            jail.set_env("JOBCACHE_TIMEOUT_MS", "5000");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.cache_ttl_secs, 60);
            assert_eq!(config.storage_namespace, "tests");
            assert_eq!(config.timeout_ms, 5_000);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_ttl() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("JOBCACHE_CACHE_TTL_SECS", "0");
            assert!(matches!(AppConfig::load(), Err(ConfigError::Invalid { .. })));
            Ok(())
        });
    }
}
