//! Data types shared with the platform photo library
//!
//! These are pure data structures; all behavior lives in the query
//! source and session layers. Identity of an asset is its stable
//! library identifier, never its position in any snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a library asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(String);

impl AssetId {
    /// Wrap a library-provided identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Media kind of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

/// Opaque handle to a library asset
///
/// Immutable once fetched. `created` drives the library sort order;
/// ordering of equal timestamps falls back to the identifier so
/// snapshots are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Stable library identifier
    pub id: AssetId,
    /// Image or video
    pub kind: MediaKind,
    /// Creation timestamp, used for snapshot ordering
    pub created: DateTime<Utc>,
}

impl Asset {
    /// Create an image asset
    #[must_use]
    pub fn image(id: impl Into<AssetId>, created: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            kind: MediaKind::Image,
            created,
        }
    }
}

/// Handle identifying an album-like grouping in the library
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlbumHandle(String);

impl AlbumHandle {
    /// Wrap a library-provided collection identifier
    #[must_use]
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// The smart "all photos" collection
    #[must_use]
    pub fn camera_roll() -> Self {
        Self("camera-roll".to_string())
    }

    /// The raw handle string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlbumHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An album-like grouping of assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    /// Handle used to fetch the album's assets
    pub handle: AlbumHandle,
    /// User-visible title
    pub title: String,
    /// Number of assets the album currently reports
    pub asset_count: usize,
}

/// Snapshot sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Newest first (the picker default)
    #[default]
    CreatedDesc,
    /// Oldest first
    CreatedAsc,
}

/// Media-kind filter applied when fetching a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaFilter {
    /// No filtering
    Any,
    /// Still images only (the picker default)
    #[default]
    Images,
    /// Videos only
    Videos,
}

impl MediaFilter {
    /// Whether an asset passes this filter
    #[must_use]
    pub fn matches(&self, kind: MediaKind) -> bool {
        match self {
            Self::Any => true,
            Self::Images => kind == MediaKind::Image,
            Self::Videos => kind == MediaKind::Video,
        }
    }
}

/// Library access authorization state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    /// The user has not been asked yet
    NotDetermined,
    /// Access is blocked by policy (parental controls etc.)
    Restricted,
    /// The user explicitly denied access
    Denied,
    /// Full access granted
    Authorized,
}

/// What the library reports about one change to an observed query
///
/// Arrives on an arbitrary thread. Index sets are logical indices:
/// `removed` and `changed` refer to the snapshot before the change,
/// `inserted` to the snapshot after it. A report that is not
/// `incremental`, or whose index sets do not reconcile with the
/// observer's previous snapshot, is handled as a full reload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeDetails {
    /// Whether the change is expressible as index sets
    pub incremental: bool,
    /// Logical indices gaining assets (post-change coordinates)
    pub inserted: Vec<usize>,
    /// Logical indices losing assets (pre-change coordinates)
    pub removed: Vec<usize>,
    /// Logical indices whose asset changed in place (pre-change coordinates)
    pub changed: Vec<usize>,
    /// The observed query itself died (album deleted)
    pub invalidated: bool,
}

impl ChangeDetails {
    /// A change that can only be handled by a full reload
    #[must_use]
    pub fn reload() -> Self {
        Self::default()
    }

    /// The observed query became invalid
    #[must_use]
    pub fn invalidated() -> Self {
        Self {
            invalidated: true,
            ..Self::default()
        }
    }

    /// An incremental diff against the previous snapshot
    #[must_use]
    pub fn incremental(inserted: Vec<usize>, removed: Vec<usize>, changed: Vec<usize>) -> Self {
        Self {
            incremental: true,
            inserted,
            removed,
            changed,
            invalidated: false,
        }
    }
}
