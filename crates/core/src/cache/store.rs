//! The result cache map.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::expiry::ExpiryPolicy;
use crate::model::{CacheEntry, FlagsPatch, JobOffer};

/// Mapping from cache key to the result list fetched for it.
///
/// Serializes as a plain JSON object keyed by cache key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultCache {
    entries: HashMap<String, CacheEntry>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Get an entry only if the policy still considers it valid.
    ///
    /// Reading does not renew the entry.
    pub fn get_fresh(&self, key: &str, policy: &ExpiryPolicy, now: DateTime<Utc>) -> Option<&CacheEntry> {
        self.entries
            .get(key)
            .filter(|entry| !policy.is_expired(entry.fetched_at, now))
    }

    /// Insert or replace the entry for `key`. No merge with the prior entry.
    pub fn put(&mut self, key: impl Into<String>, entry: CacheEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// Remove every expired entry.
    ///
    /// Returns the number of removed entries.
    pub fn prune_expired(&mut self, policy: &ExpiryPolicy, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !policy.is_expired(entry.fetched_at, now));
        before - self.entries.len()
    }

    /// Merge `patch` into every copy of `item_id` across all entries.
    ///
    /// `fetched_at` is never touched. Returns the number of entries that
    /// contain the item.
    pub fn patch_item_flags(&mut self, item_id: &str, patch: FlagsPatch) -> usize {
        let mut matched = 0;
        for entry in self.entries.values_mut() {
            let mut found = false;
            for job in entry.jobs.iter_mut().filter(|job| job.id == item_id) {
                job.apply_flags(patch);
                found = true;
            }
            if found {
                matched += 1;
            }
        }
        matched
    }

    /// Copy of `item_id` from the most recently fetched entry holding it.
    pub fn find_item(&self, item_id: &str) -> Option<&JobOffer> {
        self.entries
            .values()
            .filter_map(|entry| {
                entry
                    .jobs
                    .iter()
                    .find(|job| job.id == item_id)
                    .map(|job| (entry.fetched_at, job))
            })
            .max_by_key(|(fetched_at, _)| *fetched_at)
            .map(|(_, job)| job)
    }

    /// Remove all entries, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
