//! Platform photo-library abstraction
//!
//! The picker never talks to a concrete photo framework; it consumes
//! this narrow trait. A host binds it to the platform library, tests
//! use [`MockLibrary`].
//!
//! # Threading contract
//!
//! Change observers registered through [`PhotoLibrary::register_change_observer`]
//! may be invoked on **any** thread, including concurrently with fetches.
//! Observer closures therefore must be `Send + Sync` and must not touch
//! UI or collection state directly; the session's observer only forwards
//! the details over a channel back to the UI thread.

pub mod auth;
pub mod error;
pub mod mock;
pub mod types;

pub use auth::ensure_authorized;
pub use error::{LibraryError, Result};
pub use mock::MockLibrary;
pub use types::{
    Album, AlbumHandle, Asset, AssetId, Authorization, ChangeDetails, MediaFilter, MediaKind,
    SortKey,
};

/// Observer closure receiving change reports for a registered query
pub type ChangeObserverFn = Box<dyn Fn(ChangeDetails) + Send + Sync>;

/// Token identifying one registered change observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverToken(pub(crate) u64);

/// The platform photo library, seen through the picker's keyhole
///
/// `Send + Sync` because the library outlives any one presentation and
/// is shared with background capture/change machinery.
pub trait PhotoLibrary: Send + Sync {
    /// Current access authorization state
    fn authorization(&self) -> Authorization;

    /// Ask the user for access; the response arrives via `respond`,
    /// possibly on another thread
    fn request_authorization(&self, respond: Box<dyn FnOnce(bool) + Send>);

    /// All album-like groupings, camera roll first
    fn albums(&self) -> Result<Vec<Album>>;

    /// Fetch a sorted, filtered snapshot of an album's assets
    fn fetch(&self, album: &AlbumHandle, sort: SortKey, filter: MediaFilter) -> Result<Vec<Asset>>;

    /// Resolve an identifier back to its asset (camera-capture path)
    fn resolve(&self, id: &AssetId) -> Result<Asset>;

    /// Synchronously load preview-sized image data for an asset
    fn load_preview(&self, id: &AssetId) -> Result<Vec<u8>>;

    /// Start observing changes to an album's assets
    fn register_change_observer(
        &self,
        album: &AlbumHandle,
        observer: ChangeObserverFn,
    ) -> Result<ObserverToken>;

    /// Stop observing; unknown tokens are ignored
    fn unregister_change_observer(&self, token: ObserverToken);
}
