//! Document layer of a leaps instance.
//! - `storage` defines the pluggable [`storage::DocumentStore`] contract and its backends.
//! - `curator` owns live documents and is the [`locator::DocumentLocator`] the servers use.

pub mod errors;
pub mod document;
pub mod storage;
pub mod locator;
pub mod curator;

pub use curator::Curator;
pub use document::{Document, NewDocument};
pub use errors::{ServiceError, StoreError};
pub use locator::DocumentLocator;
pub use storage::{document_store_factory, DocumentStore, MemoryStore, StoreBackend};
