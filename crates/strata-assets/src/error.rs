//! Asset loading error types.

/// Errors that can occur when loading variant tables from disk.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Failed to read an asset file or list an asset directory.
    #[error("failed to read asset {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse an asset file as JSON.
    #[error("failed to parse asset {path}: {source}")]
    ParseError {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
