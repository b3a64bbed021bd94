//! UI error types

use thiserror::Error;

/// Errors that can occur in grid or alert operations
#[derive(Debug, Error)]
pub enum UiError {
    /// The presenting surface was torn down mid-operation
    #[error("Presentation surface is no longer live")]
    SurfaceGone,

    /// Invalid configuration for a UI component
    #[error("Invalid UI configuration: {0}")]
    InvalidConfig(String),

    /// IO error during UI operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for UI operations
pub type Result<T> = std::result::Result<T, UiError>;
