//! The curator owns the live documents of a leaps instance.
//!
//! This is the thin registry the rest of the process talks to through
//! [`DocumentLocator`]; it hands documents to and from the configured
//! [`DocumentStore`] and tracks whether the instance has been closed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use common::Stats;
use configs::CuratorConfig;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::document::{Document, NewDocument};
use crate::errors::{ServiceError, StoreError};
use crate::locator::DocumentLocator;
use crate::storage::{document_store_factory, DocumentStore};

pub struct Curator {
    config: CuratorConfig,
    store: Arc<dyn DocumentStore>,
    stats: Arc<Stats>,
    closed: CancellationToken,
    closing: AtomicBool,
}

impl Curator {
    /// Build a curator and the document store its config selects.
    pub fn new(config: CuratorConfig, stats: Arc<Stats>) -> Result<Self, StoreError> {
        let store = document_store_factory(&config.document_store)?;
        info!(
            event = "curator_init",
            store = %config.document_store.backend_type,
            "curator constructed"
        );
        Ok(Self::with_store(config, store, stats))
    }

    /// Build a curator over an existing store.
    pub fn with_store(config: CuratorConfig, store: Arc<dyn DocumentStore>, stats: Arc<Stats>) -> Self {
        Self {
            config,
            store,
            stats,
            closed: CancellationToken::new(),
            closing: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Flip the curator to closed. Only the first caller gets `true`.
    fn mark_closed(&self) -> bool {
        if self.closing.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.closed.cancel();
        true
    }

    fn ensure_open(&self) -> Result<(), ServiceError> {
        if self.is_closed() {
            return Err(ServiceError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentLocator for Curator {
    async fn create_document(&self, input: NewDocument) -> Result<Arc<Document>, ServiceError> {
        self.ensure_open()?;
        if input.content.len() > self.config.max_document_size {
            return Err(ServiceError::Validation(format!(
                "document content of {} bytes exceeds limit of {} bytes",
                input.content.len(),
                self.config.max_document_size
            )));
        }

        let doc = Arc::new(Document::new(input));
        self.store.store(&doc.id, doc.clone()).await?;
        self.stats.documents_created.inc();
        debug!(doc_id = %doc.id, "document created");
        Ok(doc)
    }

    async fn find_document(&self, id: &str) -> Result<Arc<Document>, ServiceError> {
        self.ensure_open()?;
        match self.store.fetch(id).await {
            Ok(doc) => {
                self.stats.documents_fetched.inc();
                Ok(doc)
            }
            Err(e) => {
                self.stats.document_misses.inc();
                Err(e.into())
            }
        }
    }

    async fn close(&self) {
        if self.mark_closed() {
            info!(event = "curator_close", "curator closed");
        }
    }

    async fn closed(&self) {
        self.closed.cancelled().await
    }
}
