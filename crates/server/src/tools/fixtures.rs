//! Store fixtures shared by the tool tests.

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use jobcache_core::{
    JobOffer, JobsStore, MemoryStorage, PersistenceAdapter, SearchTransport, TrackingTransport, TransportError,
    ViewMetadata,
};
use rmcp::model::CallToolResult;

/// A standard search for "rust" returns offers 42 and 43; any other keywords
/// return offer 7. A smart search whose query is "fail" gets a 502.
#[derive(Default)]
pub struct StubSearch {
    calls: AtomicUsize,
}

impl StubSearch {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn offers(ids: &[&str]) -> Vec<JobOffer> {
        ids.iter()
            .map(|id| JobOffer::new(*id).with_field("intitule", format!("Offer {id}")))
            .collect()
    }
}

#[async_trait]
impl SearchTransport for StubSearch {
    async fn standard_search(&self, keywords: &str, _location: Option<&str>) -> Result<Vec<JobOffer>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match keywords {
            "rust" => Ok(Self::offers(&["42", "43"])),
            _ => Ok(Self::offers(&["7"])),
        }
    }

    async fn smart_search(
        &self, _location: Option<&str>, query: Option<&str>,
    ) -> Result<Vec<JobOffer>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match query {
            Some("fail") => Err(TransportError::Http { status: 502 }),
            _ => Ok(Self::offers(&["42", "43"])),
        }
    }
}

/// Tracking endpoint that is always down. Remembers what it was sent.
#[derive(Default)]
pub struct DownTracking {
    pub views: StdMutex<Vec<ViewMetadata>>,
}

#[async_trait]
impl TrackingTransport for DownTracking {
    async fn post_view(&self, _item_id: &str, metadata: &ViewMetadata) -> Result<(), TransportError> {
        self.views.lock().unwrap().push(metadata.clone());
        Err(TransportError::Network("connection refused".into()))
    }

    async fn post_application(&self, _item_id: &str) -> Result<(), TransportError> {
        Err(TransportError::Network("connection refused".into()))
    }
}

pub async fn test_store() -> (JobsStore, Arc<StubSearch>) {
    let (store, search, _tracking) = test_store_with_tracking().await;
    (store, search)
}

pub async fn test_store_with_tracking() -> (JobsStore, Arc<StubSearch>, Arc<DownTracking>) {
    let search = Arc::new(StubSearch::default());
    let tracking = Arc::new(DownTracking::default());
    let persistence = PersistenceAdapter::new(Arc::new(MemoryStorage::new()), "jobs-storage");
    let store = JobsStore::builder(search.clone(), tracking.clone(), persistence)
        .open()
        .await;
    (store, search, tracking)
}

/// Parse the JSON text of the first content block.
pub fn output_json(result: &CallToolResult) -> serde_json::Value {
    let content = serde_json::to_value(&result.content[0]).unwrap();
    let text = content
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content");
    serde_json::from_str(text).unwrap()
}
