//! Process-local storage that forgets everything on exit.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::Storage;
use crate::Error;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a namespace with a raw blob.
    pub fn with_blob(namespace: impl Into<String>, blob: impl Into<String>) -> Self {
        Self { blobs: Mutex::new(HashMap::from([(namespace.into(), blob.into())])) }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, namespace: &str) -> Result<Option<String>, Error> {
        Ok(self.blobs.lock().await.get(namespace).cloned())
    }

    async fn write(&self, namespace: &str, blob: &str) -> Result<(), Error> {
        self.blobs
            .lock()
            .await
            .insert(namespace.to_string(), blob.to_string());
        Ok(())
    }
}
