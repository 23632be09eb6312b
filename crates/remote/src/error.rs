//! Error types for remote layer loading.

use thiserror::Error;

/// Errors produced while fetching a remote layer.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    #[error("{url} did not return a GeoJSON FeatureCollection")]
    NotFeatureCollection { url: String },

    #[error("core error: {0}")]
    Core(#[from] geoview_core::Error),
}

/// Result alias for remote operations.
pub type Result<T> = std::result::Result<T, RemoteError>;
