//! Error types for the viewer crate.

use thiserror::Error;

/// Errors raised while building or configuring a viewer.
///
/// Runtime failures of user actions never surface here; the controller turns
/// them into notices.
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("core error: {0}")]
    Core(#[from] geoview_core::Error),
}

/// Result alias for viewer operations.
pub type Result<T> = std::result::Result<T, ViewerError>;
