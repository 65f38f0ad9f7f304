//! The jobs store: one context object owning the cache and its observers.
//!
//! `JobsStore` is built once at startup and shared by reference. It wires the
//! result cache, the expiry policy, the transports and the persistence adapter
//! together. Searches live in [`fetch`], flag propagation in [`mutation`].

mod fetch;
mod mutation;

#[cfg(test)]
mod testing;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, watch};

use crate::cache::{Clock, ExpiryPolicy, SystemClock, derive_key};
use crate::model::{JobOffer, Query};
use crate::persist::{PersistedState, PersistenceAdapter};
use crate::transport::{SearchTransport, TrackingTransport};

/// TTL used when the builder is not given one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Where the store is in its search cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Observable projection of the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobsView {
    pub current_jobs: Vec<JobOffer>,
    pub loading: bool,
    pub has_searched: bool,
    pub last_error: Option<String>,
    pub last_query: Option<Query>,
    pub phase: Phase,
}

/// Transient state. Deliberately not serializable.
#[derive(Debug, Default)]
struct SessionState {
    phase: Phase,
    last_error: Option<String>,
    /// Bumped by every search and by `reset`; a fetch whose generation is
    /// stale when it completes is discarded.
    generation: u64,
}

#[derive(Debug, Default)]
struct StoreState {
    durable: PersistedState,
    session: SessionState,
}

impl StoreState {
    fn view(&self) -> JobsView {
        JobsView {
            current_jobs: self.durable.current_jobs.clone(),
            loading: self.session.phase == Phase::Loading,
            has_searched: self.durable.has_searched,
            last_error: self.session.last_error.clone(),
            last_query: self.durable.last_query.clone(),
            phase: self.session.phase,
        }
    }
}

/// Client-side cache of job search results.
pub struct JobsStore {
    search: Arc<dyn SearchTransport>,
    tracking: Arc<dyn TrackingTransport>,
    persistence: PersistenceAdapter,
    policy: ExpiryPolicy,
    clock: Arc<dyn Clock>,
    state: Mutex<StoreState>,
    view: watch::Sender<JobsView>,
}

/// Builder for [`JobsStore`].
pub struct JobsStoreBuilder {
    search: Arc<dyn SearchTransport>,
    tracking: Arc<dyn TrackingTransport>,
    persistence: PersistenceAdapter,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JobsStoreBuilder {
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Rehydrate persisted state and build the store.
    pub async fn open(self) -> JobsStore {
        let durable = self.persistence.load().await;
        let state = StoreState { durable, session: SessionState::default() };
        let (view, _) = watch::channel(state.view());

        tracing::info!(
            namespace = self.persistence.namespace(),
            ttl_secs = self.ttl.as_secs(),
            cached_queries = state.durable.jobs_cache.len(),
            "jobs store ready"
        );

        JobsStore {
            search: self.search,
            tracking: self.tracking,
            persistence: self.persistence,
            policy: ExpiryPolicy::new(self.ttl),
            clock: self.clock,
            state: Mutex::new(state),
            view,
        }
    }
}

impl JobsStore {
    pub fn builder(
        search: Arc<dyn SearchTransport>, tracking: Arc<dyn TrackingTransport>, persistence: PersistenceAdapter,
    ) -> JobsStoreBuilder {
        JobsStoreBuilder { search, tracking, persistence, ttl: DEFAULT_TTL, clock: Arc::new(SystemClock) }
    }

    pub fn ttl(&self) -> Duration {
        self.policy.ttl()
    }

    /// Current observable state.
    pub async fn snapshot(&self) -> JobsView {
        self.state.lock().await.view()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<JobsView> {
        self.view.subscribe()
    }

    /// Look up a fresh cache entry without touching the network or the
    /// current result list.
    pub async fn get_cached_jobs(&self, query: &Query) -> Option<Vec<JobOffer>> {
        let state = self.state.lock().await;
        state
            .durable
            .jobs_cache
            .get_fresh(&derive_key(query), &self.policy, self.clock.now())
            .map(|entry| entry.jobs.clone())
    }

    /// Find a job by id in the current list, then in the cache.
    ///
    /// Expired entries are searched too; a stale copy still carries the
    /// offer's title and company.
    pub async fn find_job(&self, job_id: &str) -> Option<JobOffer> {
        let state = self.state.lock().await;
        state
            .durable
            .current_jobs
            .iter()
            .find(|job| job.id == job_id)
            .or_else(|| state.durable.jobs_cache.find_item(job_id))
            .cloned()
    }

    /// Drop every cache entry. Returns the number removed.
    pub async fn clear_cache(&self) -> usize {
        let mut state = self.state.lock().await;
        let removed = state.durable.jobs_cache.clear();
        tracing::info!(removed, "cleared search cache");
        self.commit(&state).await;
        removed
    }

    /// Drop expired cache entries. Returns the number removed.
    pub async fn clear_expired_cache(&self) -> usize {
        let mut state = self.state.lock().await;
        let now = self.clock.now();
        let removed = state.durable.jobs_cache.prune_expired(&self.policy, now);
        tracing::debug!(removed, remaining = state.durable.jobs_cache.len(), "pruned expired cache entries");
        self.commit(&state).await;
        removed
    }

    /// Return to the never-searched state. Cached entries are kept.
    ///
    /// Any search still in flight is discarded when it completes.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.durable.current_jobs.clear();
        state.durable.has_searched = false;
        state.durable.last_query = None;
        state.session.phase = Phase::Idle;
        state.session.last_error = None;
        state.session.generation += 1;
        self.commit(&state).await;
    }

    /// Persist the durable subset and notify observers.
    ///
    /// Called with the state lock held so writes land in order.
    async fn commit(&self, state: &StoreState) {
        self.persistence.save(&state.durable).await;
        self.view.send_replace(state.view());
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Harness, job};
    use super::*;

    #[tokio::test]
    async fn test_initial_state() {
        let h = Harness::new().await;
        let view = h.store.snapshot().await;
        assert_eq!(view.phase, Phase::Idle);
        assert!(!view.loading);
        assert!(!view.has_searched);
        assert!(view.current_jobs.is_empty());
        assert!(view.last_error.is_none());
        assert_eq!(h.store.ttl(), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_get_cached_jobs_is_read_only() {
        let h = Harness::new().await;
        let query = Query::standard("engineer", Some("Paris".into()));
        assert!(h.store.get_cached_jobs(&query).await.is_none());

        h.search.respond(&query, vec![job("1")]);
        h.store.search("engineer", Some("Paris")).await.unwrap();
        h.store.reset().await;

        let cached = h.store.get_cached_jobs(&query).await.unwrap();
        assert_eq!(cached.len(), 1);
        assert!(h.store.snapshot().await.current_jobs.is_empty());

        h.clock.advance(Duration::from_secs(61));
        assert!(h.store.get_cached_jobs(&query).await.is_none());
        assert_eq!(h.search.calls(), 1);
    }

    #[tokio::test]
    async fn test_find_job_falls_back_to_cache() {
        let h = Harness::new().await;
        h.search.respond(&Query::standard("rust", None), vec![job("1")]);
        h.search.respond(&Query::standard("go", None), vec![job("2")]);

        h.store.search("rust", None).await.unwrap();
        h.store.search("go", None).await.unwrap();

        let current = h.store.find_job("2").await.unwrap();
        assert_eq!(current.title(), Some("Job 2"));

        let cached = h.store.find_job("1").await.unwrap();
        assert_eq!(cached.title(), Some("Job 1"));

        assert!(h.store.find_job("3").await.is_none());
        assert_eq!(h.search.calls(), 2);
    }

    #[tokio::test]
    async fn test_clear_cache_keeps_current_jobs() {
        let h = Harness::new().await;
        let query = Query::standard("engineer", None);
        h.search.respond(&query, vec![job("1")]);
        h.store.search("engineer", None).await.unwrap();

        assert_eq!(h.store.clear_cache().await, 1);
        assert!(h.store.get_cached_jobs(&query).await.is_none());
        assert_eq!(h.store.snapshot().await.current_jobs.len(), 1);

        h.store.search("engineer", None).await.unwrap();
        assert_eq!(h.search.calls(), 2);
    }

    #[tokio::test]
    async fn test_clear_expired_cache() {
        let h = Harness::new().await;
        let old = Query::standard("old", None);
        let fresh = Query::standard("fresh", None);
        h.search.respond(&old, vec![job("1")]);
        h.search.respond(&fresh, vec![job("2")]);

        h.store.search("old", None).await.unwrap();
        h.clock.advance(Duration::from_secs(45));
        h.store.search("fresh", None).await.unwrap();
        h.clock.advance(Duration::from_secs(30));

        assert_eq!(h.store.clear_expired_cache().await, 1);
        assert!(h.store.get_cached_jobs(&old).await.is_none());
        assert!(h.store.get_cached_jobs(&fresh).await.is_some());

        let persisted = h.persisted().await;
        assert_eq!(persisted.jobs_cache.len(), 1);
    }

    #[tokio::test]
    async fn test_reset_clears_transient_keeps_cache() {
        let h = Harness::new().await;
        let query = Query::smart(None, Some("remote".into()));
        h.search.fail(&query);
        let _ = h.store.smart_search(None, Some("remote")).await;

        h.store.reset().await;
        let view = h.store.snapshot().await;
        assert_eq!(view.phase, Phase::Idle);
        assert!(!view.has_searched);
        assert!(view.last_error.is_none());
        assert!(view.last_query.is_none());

        let ok = Query::standard("rust", None);
        h.search.respond(&ok, vec![job("1")]);
        h.store.search("rust", None).await.unwrap();
        h.store.reset().await;
        assert!(h.store.get_cached_jobs(&ok).await.is_some());
        assert!(!h.persisted().await.has_searched);
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let h = Harness::new().await;
        let mut rx = h.store.subscribe();
        let query = Query::standard("rust", None);
        h.search.respond(&query, vec![job("1"), job("2")]);

        h.store.search("rust", None).await.unwrap();

        let view = rx.borrow_and_update().clone();
        assert_eq!(view.phase, Phase::Ready);
        assert_eq!(view.current_jobs.len(), 2);
    }
}
