//! Error types shared across the crate.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KaiseiError>;

/// Errors surfaced by the reconciliation engine and the source layer.
///
/// The merge policy itself is total and has no error paths; failures here
/// come from the I/O boundary (store persistence, feed bytes) only.
#[derive(Debug, Error)]
pub enum KaiseiError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json encode/decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[cfg(feature = "fetch")]
    #[error("fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
