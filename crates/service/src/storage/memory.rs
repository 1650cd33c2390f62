use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use configs::DocumentStoreConfig;
use tokio::sync::RwLock;

use crate::document::Document;
use crate::errors::StoreError;
use crate::storage::DocumentStore;

/// Most basic document store: keeps documents in memory, nothing survives a
/// restart. Fetches share the lock, stores take it exclusively.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, Arc<Document>>>,
}

impl MemoryStore {
    /// The config only selects this backend; there is nothing else to read.
    pub fn new(_config: &DocumentStoreConfig) -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn store(&self, id: &str, doc: Arc<Document>) -> Result<(), StoreError> {
        let mut map = self.documents.write().await;
        map.insert(id.to_string(), doc);
        Ok(())
    }

    async fn fetch(&self, id: &str) -> Result<Arc<Document>, StoreError> {
        let map = self.documents.read().await;
        map.get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
