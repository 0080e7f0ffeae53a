//! Session-scoped key-value storage.
//!
//! Selection state lives in a store that outlives a single controller but not
//! the browsing session. The backend is injected so hosts can supply real
//! session storage and tests can use [`MemoryStore`].

mod memory;

pub use memory::MemoryStore;

use crate::error::StoreError;

/// Default prefix for list selection keys.
pub const DEFAULT_PREFIX: &str = "listkit_selection";

/// Default prefix for dropdown value keys.
pub const DROPDOWN_PREFIX: &str = "listkit_dropdown";

/// Backend trait for session storage.
///
/// Implementations handle raw string storage/retrieval; the persisted
/// selection codec lives in [`crate::selection`].
pub trait SessionStore: Send + Sync {
    /// Get the value for a key.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Set the value for a key.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Storage key for one list view: prefix plus the path with `/` replaced by `_`.
///
/// Query strings must already be stripped; `/items/?page=2` and `/items/`
/// are the same view.
pub fn scope_key(prefix: &str, path: &str) -> String {
    format!("{}{}", prefix, path.replace('/', "_"))
}

/// Storage key for one dropdown on a page: the path scope plus the element ID.
pub fn dropdown_key(prefix: &str, path: &str, element_id: &str) -> String {
    format!("{}__{}", scope_key(prefix, path), element_id)
}
