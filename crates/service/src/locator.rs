use std::sync::Arc;

use async_trait::async_trait;

use crate::document::{Document, NewDocument};
use crate::errors::ServiceError;

/// Trait abstraction for whatever owns the live documents of this process.
/// The HTTP server and the process lifecycle only talk to this seam.
#[async_trait]
pub trait DocumentLocator: Send + Sync {
    async fn create_document(&self, input: NewDocument) -> Result<Arc<Document>, ServiceError>;
    async fn find_document(&self, id: &str) -> Result<Arc<Document>, ServiceError>;

    /// Release held resources. Calling it again is a no-op.
    async fn close(&self);

    /// Resolves once `close` has been called.
    async fn closed(&self);
}
