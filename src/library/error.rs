//! Library-specific error types
//!
//! Errors crossing the photo-library collaborator boundary. None of
//! these ever reach the host callback contract; the session either
//! absorbs them (stale references, dead queries) or surfaces them as
//! alerts (authorization).

use thiserror::Error;

/// Errors reported by the platform photo library
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Library access has not been granted
    #[error("Photo library access is not authorized")]
    Unauthorized,

    /// No album exists for the given handle
    #[error("Unknown album: {0}")]
    UnknownAlbum(String),

    /// No asset exists for the given identifier
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    /// The observed query died (its album was deleted)
    #[error("Library query was invalidated")]
    QueryInvalidated,

    /// Camera capture failed to produce an asset
    #[error("Camera capture failed: {0}")]
    CaptureFailed(String),

    /// IO error while loading asset data
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for library operations
pub type Result<T> = std::result::Result<T, LibraryError>;
