//! Error types for store and entity operations.

use thiserror::Error;

/// Errors raised while navigating, mutating or reconciling a store.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// An argument does not have an acceptable shape
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The entity is not bound to a live store
    #[error("State '{id}' is not attached to a live store")]
    Detached { id: String },

    /// A collection did not follow the offset-indexed element format
    #[error("Invalid collection at '{id}': {reason}")]
    InvalidCollectionShape { id: String, reason: String },
}

impl StoreError {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        StoreError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Check if this error is an invalid argument error
    ///
    /// Malformed collection input counts as an invalid argument too.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidArgument { .. } | StoreError::InvalidCollectionShape { .. }
        )
    }

    /// Check if this error comes from an unbound or orphaned entity
    pub fn is_detached(&self) -> bool {
        matches!(self, StoreError::Detached { .. })
    }

    /// Check if this error is related to the collection format
    pub fn is_collection_error(&self) -> bool {
        matches!(self, StoreError::InvalidCollectionShape { .. })
    }

    /// Get the node id associated with this error, if any
    pub fn id(&self) -> Option<&str> {
        match self {
            StoreError::Detached { id } | StoreError::InvalidCollectionShape { id, .. } => Some(id),
            StoreError::InvalidArgument { .. } => None,
        }
    }
}

// Conversion from StoreError to the main Error type
impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
