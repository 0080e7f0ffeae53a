//! Error types

/// Errors raised while attaching a selection controller to a list.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ListError {
    /// A required element is not in the document.
    #[error("Element '{id}' not found in page")]
    MissingElement { id: String },

    /// The page location could not be parsed as a URL path.
    #[error("Invalid page location '{location}': {source}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },

    /// The list configuration could not be parsed.
    #[error("Invalid list configuration: {0}")]
    Config(String),
}

impl ListError {
    /// Creates a new missing element error.
    pub fn missing(id: impl Into<String>) -> Self {
        Self::MissingElement { id: id.into() }
    }
}

/// Errors raised while mounting a multi-value dropdown.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DropdownError {
    #[error("Dropdown root '{id}' not found in page")]
    MissingRoot { id: String },

    #[error("Dropdown '{id}' has no menu element '{menu}'")]
    MissingMenu { id: String, menu: String },

    #[error("Invalid page location '{location}': {source}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors from a session store backend.
///
/// [`MemoryStore`](crate::store::MemoryStore) never fails. Host backends
/// report these, and callers in this crate log them and carry on with an
/// empty selection.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Storage is disabled or could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// A write did not fit in the backend's quota.
    #[error("quota exceeded writing '{key}'")]
    QuotaExceeded { key: String },
}
