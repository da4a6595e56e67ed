//! Backend Error Types

use thiserror::Error;

/// Result type alias for backend operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Object store, record store and session failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Key or unique column already taken
    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A single-row query matched nothing
    #[error("No rows returned")]
    NoRows,

    /// A single-row query matched more than one row
    #[error("Expected one row, got {0}")]
    MultipleRows(usize),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl StoreError {
    /// Transport-level failures worth retrying as-is
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Network(_) | StoreError::Backend(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Backend(format!("serialization: {err}"))
    }
}
