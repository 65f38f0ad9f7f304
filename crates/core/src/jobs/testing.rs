//! Scripted transports and a store harness for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::oneshot;

use super::JobsStore;
use crate::cache::{ManualClock, derive_key};
use crate::model::{JobOffer, Query};
use crate::persist::{MemoryStorage, PersistedState, PersistenceAdapter};
use crate::transport::{SearchTransport, TrackingTransport, TransportError, ViewMetadata};

pub const NAMESPACE: &str = "jobs-storage";

pub fn job(id: &str) -> JobOffer {
    JobOffer::new(id).with_field("intitule", format!("Job {id}"))
}

type Scripted = Result<Vec<JobOffer>, TransportError>;

/// Answers searches from a per-key script. The last scripted answer for a
/// key repeats; earlier ones are consumed in order.
#[derive(Default)]
pub struct FakeSearch {
    responses: StdMutex<HashMap<String, VecDeque<Scripted>>>,
    gates: StdMutex<HashMap<String, oneshot::Receiver<()>>>,
    log: StdMutex<Vec<String>>,
    calls: AtomicUsize,
}

impl FakeSearch {
    pub fn respond(&self, query: &Query, jobs: Vec<JobOffer>) {
        self.script(query, Ok(jobs));
    }

    pub fn fail(&self, query: &Query) {
        self.script(query, Err(TransportError::Http { status: 502 }));
    }

    /// Hold the next call for `query` until the returned sender fires.
    pub fn gate(&self, query: &Query) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(derive_key(query), rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn script(&self, query: &Query, answer: Scripted) {
        self.responses
            .lock()
            .unwrap()
            .entry(derive_key(query))
            .or_default()
            .push_back(answer);
    }

    async fn answer(&self, kind: &str, query: Query) -> Scripted {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = derive_key(&query);
        self.log.lock().unwrap().push(format!("{kind} {key}"));

        let gate = self.gates.lock().unwrap().remove(&key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap(),
            None => Err(TransportError::Http { status: 404 }),
        }
    }
}

#[async_trait]
impl SearchTransport for FakeSearch {
    async fn standard_search(&self, keywords: &str, location: Option<&str>) -> Result<Vec<JobOffer>, TransportError> {
        self.answer("standard", Query::standard(keywords, location.map(String::from)))
            .await
    }

    async fn smart_search(
        &self, location: Option<&str>, query: Option<&str>,
    ) -> Result<Vec<JobOffer>, TransportError> {
        self.answer("smart", Query::smart(location.map(String::from), query.map(String::from)))
            .await
    }
}

#[derive(Default)]
pub struct FakeTracking {
    pub failing: AtomicBool,
    pub views: StdMutex<Vec<ViewMetadata>>,
    pub applications: StdMutex<Vec<String>>,
}

#[async_trait]
impl TrackingTransport for FakeTracking {
    async fn post_view(&self, _item_id: &str, metadata: &ViewMetadata) -> Result<(), TransportError> {
        self.views.lock().unwrap().push(metadata.clone());
        if self.failing.load(Ordering::SeqCst) { Err(TransportError::Timeout) } else { Ok(()) }
    }

    async fn post_application(&self, item_id: &str) -> Result<(), TransportError> {
        self.applications.lock().unwrap().push(item_id.to_string());
        if self.failing.load(Ordering::SeqCst) { Err(TransportError::Http { status: 500 }) } else { Ok(()) }
    }
}

pub struct Harness {
    pub store: Arc<JobsStore>,
    pub search: Arc<FakeSearch>,
    pub tracking: Arc<FakeTracking>,
    pub clock: Arc<ManualClock>,
    pub storage: Arc<MemoryStorage>,
}

impl Harness {
    /// Store with a 60 second TTL and a clock frozen at 2025-01-01T00:00:00Z.
    pub async fn new() -> Self {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
        Self::build(Arc::new(MemoryStorage::new()), clock).await
    }

    /// A fresh store over the same storage and clock, as after a restart.
    pub async fn reopen(&self) -> Self {
        Self::build(self.storage.clone(), self.clock.clone()).await
    }

    pub async fn persisted(&self) -> PersistedState {
        PersistenceAdapter::new(self.storage.clone(), NAMESPACE).load().await
    }

    async fn build(storage: Arc<MemoryStorage>, clock: Arc<ManualClock>) -> Self {
        let search = Arc::new(FakeSearch::default());
        let tracking = Arc::new(FakeTracking::default());
        let store = JobsStore::builder(
            search.clone(),
            tracking.clone(),
            PersistenceAdapter::new(storage.clone(), NAMESPACE),
        )
        .ttl(Duration::from_secs(60))
        .clock(clock.clone())
        .open()
        .await;

        Self { store: Arc::new(store), search, tracking, clock, storage }
    }
}
