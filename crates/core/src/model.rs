//! Data model shared by the cache, the orchestrator and the transports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A search request as issued by the presentation layer.
///
/// Standard searches populate `keywords` (and optionally `location`), smart
/// searches populate `location` and/or `query`. The cache only cares about
/// which fields are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Query {
    /// Free-text keywords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    /// Location (city name or code).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Natural-language query for smart search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl Query {
    /// Build a keyword search.
    pub fn standard(keywords: impl Into<String>, location: Option<String>) -> Self {
        Self { keywords: Some(keywords.into()), location, query: None }
    }

    /// Build a profile-driven smart search.
    pub fn smart(location: Option<String>, query: Option<String>) -> Self {
        Self { keywords: None, location, query }
    }

    /// Keywords, treating the empty string as absent.
    pub fn keywords(&self) -> Option<&str> {
        present(&self.keywords)
    }

    /// Location, treating the empty string as absent.
    pub fn location(&self) -> Option<&str> {
        present(&self.location)
    }

    /// Natural-language query, treating the empty string as absent.
    pub fn query(&self) -> Option<&str> {
        present(&self.query)
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// A single job offer returned by the search backend.
///
/// Only `id` and the two client-local flags are interpreted here; the rest of
/// the record is kept verbatim in `payload` and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOffer {
    pub id: String,

    #[serde(default)]
    pub is_viewed: bool,

    #[serde(default)]
    pub is_applied: bool,

    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl JobOffer {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), is_viewed: false, is_applied: false, payload: Map::new() }
    }

    /// Attach a payload field. Mostly useful when building fixtures.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(name.into(), value.into());
        self
    }

    /// Offer title (`intitule` in the backend payload).
    pub fn title(&self) -> Option<&str> {
        self.payload.get("intitule").and_then(Value::as_str)
    }

    /// Employer name (`entreprise.nom` in the backend payload).
    pub fn company_name(&self) -> Option<&str> {
        self.payload
            .get("entreprise")
            .and_then(|company| company.get("nom"))
            .and_then(Value::as_str)
    }

    /// Merge a flag patch into this offer.
    ///
    /// Returns true if any flag changed.
    pub fn apply_flags(&mut self, patch: FlagsPatch) -> bool {
        let before = (self.is_viewed, self.is_applied);
        self.is_viewed |= patch.viewed;
        self.is_applied |= patch.applied;
        before != (self.is_viewed, self.is_applied)
    }
}

/// Client-local flags to raise on a job offer.
///
/// A patch can only set flags; there is no way to clear `viewed` or `applied`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagsPatch {
    pub viewed: bool,
    pub applied: bool,
}

impl FlagsPatch {
    pub fn viewed() -> Self {
        Self { viewed: true, applied: false }
    }

    /// Applying implies viewing.
    pub fn applied() -> Self {
        Self { viewed: true, applied: true }
    }
}

/// A cached result list and the time it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub jobs: Vec<JobOffer>,
    pub fetched_at: DateTime<Utc>,
}
