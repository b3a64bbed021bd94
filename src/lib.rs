//! Photopick - an embeddable, UI-agnostic photo picker engine
//!
//! This library models a photo picker session: a user's albums and
//! camera roll, bounded multi-selection over a live library query,
//! optional camera capture, and delivery of the chosen assets to the
//! host through callback handles. The platform photo library and the
//! grid surface are consumed through narrow traits ([`library::PhotoLibrary`],
//! [`ui::PhotoGrid`]); mock implementations of both ship with the crate.
//!
//! The heart of the crate is [`session::PickerSession`], which keeps the
//! selectable collection, the on-screen grid, and the host's view of the
//! selection consistent across user taps, asynchronous library change
//! reports, album switches, and camera-capture insertions.

use thiserror::Error;

pub mod config;
pub mod library;
pub mod select;
pub mod session;
pub mod ui;

#[cfg(test)]
pub mod testing;

pub use config::{ColumnProvider, PickerConfig};
pub use library::{
    Album, AlbumHandle, Asset, AssetId, Authorization, MediaFilter, MediaKind, MockLibrary,
    PhotoLibrary, SortKey, ensure_authorized,
};
pub use select::{IndexTranslation, PendingChange, SelectionMode};
pub use session::{HostCallbacks, PickerSession, SessionError, TapOutcome};
pub use ui::{AlertPresenter, MockAlerts, MockGrid, PhotoGrid};

/// Error enum, contains all failure states of the library
#[derive(Debug, Error)]
pub enum PhotopickError {
    /// Library collaborator error
    #[error("Library error: {0}")]
    LibraryError(#[from] library::LibraryError),
    /// Session error
    #[error("Session error: {0}")]
    SessionError(#[from] session::SessionError),
    /// UI surface error
    #[error("UI error: {0}")]
    UiError(#[from] ui::UiError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
