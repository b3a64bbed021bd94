//! Album list with single selection
//!
//! The table of albums shown next to the grid. Single-select with the
//! first album picked automatically at construction, matching how the
//! picker opens on the camera roll.

use crate::library::types::Album;

/// Ordered albums with one current selection
#[derive(Debug, Clone)]
pub struct AlbumCollection {
    albums: Vec<Album>,
    current: usize,
}

impl AlbumCollection {
    /// Wrap an album list; the first album starts selected
    #[must_use]
    pub fn new(albums: Vec<Album>) -> Self {
        Self { albums, current: 0 }
    }

    /// All albums, in library order
    #[must_use]
    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    /// Number of albums
    #[must_use]
    pub fn len(&self) -> usize {
        self.albums.len()
    }

    /// True when the library reported no albums
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    /// The currently selected album, if any exist
    #[must_use]
    pub fn current(&self) -> Option<&Album> {
        self.albums.get(self.current)
    }

    /// Index of the current selection
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Select an album by index
    ///
    /// Returns the newly selected album, or `None` if the index is out
    /// of range (selection unchanged).
    pub fn select(&mut self, index: usize) -> Option<&Album> {
        if index < self.albums.len() {
            self.current = index;
            self.albums.get(index)
        } else {
            None
        }
    }
}
