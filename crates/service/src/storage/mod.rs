//! Document storage abstractions.
//!
//! [`DocumentStore`] is the contract every backend satisfies; callers only see
//! `Arc<dyn DocumentStore>` handed out by [`document_store_factory`].

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use configs::DocumentStoreConfig;

use crate::document::Document;
use crate::errors::StoreError;

pub mod memory;

pub use memory::MemoryStore;

/// Implemented by types able to persist and retrieve documents by key.
/// Implementations must be safe to share between tasks.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert or overwrite the document stored under `id`.
    async fn store(&self, id: &str, doc: Arc<Document>) -> Result<(), StoreError>;

    /// Return the document most recently stored under `id`.
    async fn fetch(&self, id: &str) -> Result<Arc<Document>, StoreError>;
}

/// Known store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
}

impl FromStr for StoreBackend {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            other => Err(StoreError::UnrecognizedBackend(other.to_string())),
        }
    }
}

/// Build the store selected by `config`.
pub fn document_store_factory(config: &DocumentStoreConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match config.backend_type.parse::<StoreBackend>()? {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new(config))),
    }
}
