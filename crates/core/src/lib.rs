//! Core types and shared functionality for jobcache.
//!
//! This crate provides:
//! - Query key derivation, expiry policy and the in-memory result cache
//! - The `JobsStore` context object (fetch orchestration and flag propagation)
//! - Durable persistence of the cache with a SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod jobs;
pub mod model;
pub mod persist;
pub mod transport;

pub use cache::{Clock, ExpiryPolicy, ManualClock, ResultCache, SystemClock, derive_key};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use jobs::{JobsStore, JobsStoreBuilder, JobsView, Phase};
pub use model::{CacheEntry, FlagsPatch, JobOffer, Query};
pub use persist::{MemoryStorage, PersistedState, PersistenceAdapter, SqliteStorage, Storage};
pub use transport::{SearchTransport, TrackingTransport, TransportError, ViewMetadata};
