use thiserror::Error;

/// A remote API call that did not produce a usable response.
///
/// The `Display` text is what the user sees; the detailed chain stays in
/// `source()` for logging.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Failed to search location")]
    Search(#[source] anyhow::Error),

    #[error("Failed to fetch weather")]
    Weather(#[source] anyhow::Error),
}

/// Failure inside a [`KeyValueStore`](crate::storage::KeyValueStore).
///
/// Never surfaced past [`Cache`](crate::cache::Cache).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage quota exceeded ({limit} entries)")]
    QuotaExceeded { limit: usize },
}
