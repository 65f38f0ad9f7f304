//! Durable persistence of the store's long-lived state.
//!
//! Only `PersistedState` is ever written. Its fields are the allow-list of
//! what survives a restart: the result cache, the current result list, the
//! has-searched flag and the last issued query. Loading and error flags live
//! in a separate, non-serializable structure owned by the store.

pub mod memory;
pub mod migrations;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::cache::ResultCache;
use crate::model::{JobOffer, Query};

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Version tag written alongside the state. Blobs with any other version are
/// discarded on load.
pub const STATE_VERSION: u32 = 2;

/// Durable key-value medium.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn read(&self, namespace: &str) -> Result<Option<String>, Error>;

    async fn write(&self, namespace: &str, blob: &str) -> Result<(), Error>;
}

/// The subset of store state that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub jobs_cache: ResultCache,

    #[serde(default)]
    pub current_jobs: Vec<JobOffer>,

    #[serde(default)]
    pub has_searched: bool,

    #[serde(default)]
    pub last_query: Option<Query>,
}

#[derive(Serialize, Deserialize)]
struct Envelope<S> {
    version: u32,
    state: S,
}

/// Reads and writes `PersistedState` under a fixed namespace.
#[derive(Clone)]
pub struct PersistenceAdapter {
    storage: Arc<dyn Storage>,
    namespace: String,
}

impl std::fmt::Debug for PersistenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceAdapter")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl PersistenceAdapter {
    pub fn new(storage: Arc<dyn Storage>, namespace: impl Into<String>) -> Self {
        Self { storage, namespace: namespace.into() }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Serialize state into the versioned envelope.
    pub fn encode(state: &PersistedState) -> Result<String, Error> {
        Ok(serde_json::to_string(&Envelope { version: STATE_VERSION, state })?)
    }

    /// Parse a blob produced by [`encode`](Self::encode).
    pub fn decode(blob: &str) -> Result<PersistedState, Error> {
        let envelope: Envelope<PersistedState> = serde_json::from_str(blob)?;
        if envelope.version != STATE_VERSION {
            return Err(Error::Serialization(format!(
                "unsupported state version {} (expected {STATE_VERSION})",
                envelope.version
            )));
        }
        Ok(envelope.state)
    }

    /// Rehydrate state.
    ///
    /// Absent, unreadable or malformed data yields the empty state.
    pub async fn load(&self) -> PersistedState {
        let blob = match self.storage.read(&self.namespace).await {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                tracing::debug!(namespace = %self.namespace, "no persisted state");
                return PersistedState::default();
            }
            Err(e) => {
                tracing::warn!(namespace = %self.namespace, error = %e, "failed to read persisted state");
                return PersistedState::default();
            }
        };

        match Self::decode(&blob) {
            Ok(state) => {
                tracing::debug!(
                    namespace = %self.namespace,
                    entries = state.jobs_cache.len(),
                    current = state.current_jobs.len(),
                    "rehydrated persisted state"
                );
                state
            }
            Err(e) => {
                tracing::warn!(namespace = %self.namespace, error = %e, "discarding malformed persisted state");
                PersistedState::default()
            }
        }
    }

    /// Write state. Failures are logged and otherwise ignored.
    pub async fn save(&self, state: &PersistedState) {
        let blob = match Self::encode(state) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!(namespace = %self.namespace, error = %e, "failed to encode state");
                return;
            }
        };

        if let Err(e) = self.storage.write(&self.namespace, &blob).await {
            tracing::warn!(namespace = %self.namespace, error = %e, "failed to persist state");
        }
    }
}
