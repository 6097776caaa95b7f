//! electrum-store: an in-memory, hierarchical, immutable state store.
//!
//! Nodes ([`Entity`]) live in a flat map keyed by dot-delimited path
//! identifiers and are never changed in place. Every write produces a new
//! node, re-registers it together with all of its ancestors and stamps them
//! with a fresh store generation, so a holder of an old node can tell it is
//! stale with a single integer comparison.
//!
//! On top of the store, the [`reconcile`] module merges plain JSON data into
//! the tree, including an offset-indexed collection format for incremental
//! list updates.
//!
//! ```rust
//! use electrum_store::Store;
//! use serde_json::json;
//!
//! let store = Store::create("app");
//! store.apply("todos", &json!([{ "title": "write docs" }]))?;
//!
//! let todo = store.find("todos.0").unwrap();
//! assert_eq!(todo.get("title").unwrap(), "write docs");
//! assert_eq!(store.get_index_keys("todos"), vec!["0"]);
//! # Ok::<(), electrum_store::Error>(())
//! ```

pub mod constants;
pub mod entity;
pub mod path;
pub mod reconcile;
pub mod store;
pub mod value;

pub use constants::DEFAULT_KEY;
pub use entity::{Entity, Mutation, Values};
pub use path::{Part, PathError};
pub use store::{Props, Store, StoreError, WeakStore};
pub use value::{Data, MutableData, Value, freeze, freeze_top};

/// Result type used throughout the electrum-store library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the electrum-store library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured path errors from the path module
    #[error(transparent)]
    Path(path::PathError),

    /// Structured store errors from the store module
    #[error(transparent)]
    Store(store::StoreError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Path(_) => "path",
            Error::Store(_) => "store",
        }
    }

    /// Check if this error was caused by a malformed argument.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Error::Path(path_err) => path_err.is_invalid_argument(),
            Error::Store(store_err) => store_err.is_invalid_argument(),
        }
    }

    /// Check if this error was caused by malformed collection data.
    pub fn is_collection_error(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_collection_error(),
            _ => false,
        }
    }

    /// Check if this error comes from an entity without a live store.
    pub fn is_detached(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_detached(),
            _ => false,
        }
    }
}

// Conversion from PathError to the main Error type
impl From<path::PathError> for Error {
    fn from(err: path::PathError) -> Self {
        Error::Path(err)
    }
}
