//! In-memory result cache for job searches.
//!
//! This module provides the pieces the store composes:
//!
//! - Canonical cache keys derived from a `Query`
//! - TTL-based expiry with an injectable clock
//! - The `ResultCache` map with bulk prune and flag propagation

pub mod expiry;
pub mod key;
pub mod store;

pub use expiry::{Clock, ExpiryPolicy, ManualClock, SystemClock};
pub use key::{EMPTY_KEY, derive_key, key_fingerprint};
pub use store::ResultCache;
