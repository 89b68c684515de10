use thiserror::Error;

/// Result type for cache storage operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Storage failures. Never surfaced past [`crate::Cache`].
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache entry is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cache store lock poisoned")]
    Poisoned,
}
