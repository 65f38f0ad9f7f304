//! Search orchestration: serve from cache or fetch exactly once.

use super::{JobsStore, Phase};
use crate::Error;
use crate::cache::{derive_key, key_fingerprint};
use crate::model::{CacheEntry, JobOffer, Query};
use crate::transport::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchKind {
    Standard,
    Smart,
}

impl JobsStore {
    /// Keyword search, optionally narrowed to a location.
    pub async fn search(&self, keywords: &str, location: Option<&str>) -> Result<Vec<JobOffer>, Error> {
        self.issue(SearchKind::Standard, Query::standard(keywords, location.map(String::from)))
            .await
    }

    /// Profile-driven search with an optional natural-language query.
    pub async fn smart_search(&self, location: Option<&str>, query: Option<&str>) -> Result<Vec<JobOffer>, Error> {
        self.issue(SearchKind::Smart, Query::smart(location.map(String::from), query.map(String::from)))
            .await
    }

    /// Serve `query` from a fresh cache entry, or fetch it.
    ///
    /// A cache hit goes straight to `Ready` without publishing a loading
    /// state. Every call bumps the generation, so an older fetch that
    /// completes afterwards is dropped and its caller gets
    /// [`Error::Superseded`].
    async fn issue(&self, kind: SearchKind, query: Query) -> Result<Vec<JobOffer>, Error> {
        let key = derive_key(&query);
        let fingerprint = key_fingerprint(&key);
        let fingerprint = &fingerprint[..12];

        let generation = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            state.session.generation += 1;

            let hit = state
                .durable
                .jobs_cache
                .get_fresh(&key, &self.policy, self.clock.now())
                .map(|entry| entry.jobs.clone());

            if let Some(jobs) = hit {
                tracing::debug!(key = fingerprint, count = jobs.len(), "search served from cache");
                state.durable.current_jobs = jobs.clone();
                state.durable.has_searched = true;
                state.durable.last_query = Some(query);
                state.session.phase = Phase::Ready;
                state.session.last_error = None;
                self.commit(state).await;
                return Ok(jobs);
            }

            tracing::debug!(key = fingerprint, ?kind, "cache miss, fetching");
            state.durable.last_query = Some(query.clone());
            state.session.phase = Phase::Loading;
            state.session.last_error = None;
            self.commit(state).await;
            state.session.generation
        };

        let outcome = self.fetch_remote(kind, &query).await;

        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if state.session.generation != generation {
            tracing::debug!(key = fingerprint, "discarding superseded search result");
            return Err(Error::Superseded);
        }

        state.durable.has_searched = true;
        match outcome {
            Ok(jobs) => {
                let fetched_at = self.clock.now();
                tracing::info!(key = fingerprint, count = jobs.len(), "search completed");
                state
                    .durable
                    .jobs_cache
                    .put(key, CacheEntry { jobs: jobs.clone(), fetched_at });
                state.durable.current_jobs = jobs.clone();
                state.session.phase = Phase::Ready;
                self.commit(state).await;
                Ok(jobs)
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(key = fingerprint, error = %message, "search failed");
                state.durable.current_jobs.clear();
                state.session.phase = Phase::Failed;
                state.session.last_error = Some(message.clone());
                self.commit(state).await;
                Err(Error::SearchFailed(message))
            }
        }
    }

    async fn fetch_remote(&self, kind: SearchKind, query: &Query) -> Result<Vec<JobOffer>, TransportError> {
        match kind {
            SearchKind::Standard => {
                self.search
                    .standard_search(query.keywords().unwrap_or_default(), query.location())
                    .await
            }
            SearchKind::Smart => self.search.smart_search(query.location(), query.query()).await,
        }
    }
}
