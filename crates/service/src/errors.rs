use thiserror::Error;

/// Errors raised by document store backends and the store factory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("attempting to fetch document {0:?} from a store that has not been initialized for it")]
    NotFound(String),
    #[error("configuration provided invalid document store type: {0:?}")]
    UnrecognizedBackend(String),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("curator is closed")]
    Closed,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::NotFound(_)))
    }
}
