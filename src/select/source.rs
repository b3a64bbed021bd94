//! Library query source
//!
//! Adapter between a live library query and a [`SelectableCollection`].
//! Change reports (already marshalled to the UI thread by the session)
//! are applied here: the snapshot is refetched, selections that stopped
//! resolving are evicted, and the change is republished to grid-side
//! observers as a [`PendingChange`] — incremental when the report's
//! index sets reconcile with the previous snapshot, full reload
//! otherwise. A dead query (deleted album) degrades to an empty
//! collection and a reload; it never panics the observer chain.

use std::sync::Arc;

use log::{debug, warn};

use super::collection::{SelectableCollection, SelectionMode};
use super::notify::{ChangeNotifier, ObserverId, PendingChange};
use crate::library::error::LibraryError;
use crate::library::types::{AlbumHandle, AssetId, ChangeDetails, MediaFilter, SortKey};
use crate::library::PhotoLibrary;

/// Result of applying one library change report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChange {
    /// What the grid must do
    pub pending: PendingChange,
    /// Selections evicted because their assets vanished
    pub evicted: Vec<AssetId>,
}

/// A live query over one album, feeding a selectable collection
pub struct LibraryQuerySource {
    library: Arc<dyn PhotoLibrary>,
    album: AlbumHandle,
    sort: SortKey,
    filter: MediaFilter,
    collection: SelectableCollection,
    notifier: ChangeNotifier<PendingChange>,
    invalidated: bool,
}

impl LibraryQuerySource {
    /// Fetch the initial snapshot and wrap it in a fresh collection
    pub fn new(
        library: Arc<dyn PhotoLibrary>,
        album: AlbumHandle,
        sort: SortKey,
        filter: MediaFilter,
        mode: SelectionMode,
    ) -> Result<Self, LibraryError> {
        let items = library.fetch(&album, sort, filter)?;
        Ok(Self {
            library,
            album,
            sort,
            filter,
            collection: SelectableCollection::new(items, mode),
            notifier: ChangeNotifier::new(),
            invalidated: false,
        })
    }

    /// The album this source queries
    #[must_use]
    pub fn album(&self) -> &AlbumHandle {
        &self.album
    }

    /// Whether the underlying query has died
    #[must_use]
    pub const fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    /// The owned selectable collection
    #[must_use]
    pub fn collection(&self) -> &SelectableCollection {
        &self.collection
    }

    /// Mutable access for gesture-driven selection changes
    pub fn collection_mut(&mut self) -> &mut SelectableCollection {
        &mut self.collection
    }

    /// Register a grid-side observer for published changes
    pub fn register_observer(
        &mut self,
        observer: impl Fn(&PendingChange) + Send + 'static,
    ) -> ObserverId {
        self.notifier.register(observer)
    }

    /// Remove a previously registered observer
    pub fn unregister_observer(&mut self, id: ObserverId) {
        self.notifier.unregister(id);
    }

    /// Apply one change report from the library
    ///
    /// Eviction happens before observers are notified, so the selection
    /// subset invariant holds at notification time.
    pub fn apply_change(&mut self, details: &ChangeDetails) -> AppliedChange {
        if details.invalidated || self.invalidated {
            warn!("library query for {} invalidated, dropping to empty", self.album);
            return self.invalidate();
        }

        let previous_len = self.collection.len();
        let snapshot = match self.library.fetch(&self.album, self.sort, self.filter) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("refetch for {} failed ({err}), treating query as dead", self.album);
                return self.invalidate();
            }
        };

        let pending = if details.incremental && coherent(details, previous_len, snapshot.len()) {
            let mut inserted = details.inserted.clone();
            let mut removed = details.removed.clone();
            let mut changed = details.changed.clone();
            inserted.sort_unstable();
            removed.sort_unstable();
            changed.sort_unstable();
            PendingChange::Incremental {
                inserted,
                removed,
                changed,
            }
        } else {
            if details.incremental {
                warn!(
                    "incoherent diff for {} ({previous_len} -> {} items), falling back to reload",
                    self.album,
                    snapshot.len()
                );
            }
            PendingChange::Reload
        };

        self.collection.replace_items(snapshot);
        let evicted = self.collection.retain_present();
        debug!(
            "applied change to {}: {pending:?}, {} selection(s) evicted",
            self.album,
            evicted.len()
        );
        self.notifier.notify(&pending);
        AppliedChange { pending, evicted }
    }

    /// Force a fresh full fetch, publishing a reload
    ///
    /// Host-driven resync path (returning from background, pull to
    /// refresh). Equivalent to applying an opaque change report.
    pub fn refetch(&mut self) -> AppliedChange {
        self.apply_change(&ChangeDetails::reload())
    }

    fn invalidate(&mut self) -> AppliedChange {
        self.invalidated = true;
        self.collection.replace_items(Vec::new());
        let evicted = self.collection.retain_present();
        let pending = PendingChange::Reload;
        self.notifier.notify(&pending);
        AppliedChange { pending, evicted }
    }
}

impl std::fmt::Debug for LibraryQuerySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryQuerySource")
            .field("album", &self.album)
            .field("collection", &self.collection)
            .field("invalidated", &self.invalidated)
            .finish()
    }
}

/// Whether a reported diff reconciles with the observed snapshot sizes
fn coherent(details: &ChangeDetails, previous_len: usize, new_len: usize) -> bool {
    let balanced = previous_len
        .checked_sub(details.removed.len())
        .is_some_and(|kept| kept + details.inserted.len() == new_len);
    balanced
        && details.removed.iter().all(|&i| i < previous_len)
        && details.changed.iter().all(|&i| i < previous_len)
        && details.inserted.iter().all(|&i| i < new_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::mock::MockLibrary;
    use crate::library::types::Asset;
    use chrono::{TimeZone, Utc};

    fn asset(id: &str, secs: i64) -> Asset {
        Asset::image(AssetId::new(id), Utc.timestamp_opt(secs, 0).unwrap())
    }

    fn source_over(
        library: &MockLibrary,
        album: &AlbumHandle,
        max: usize,
    ) -> LibraryQuerySource {
        LibraryQuerySource::new(
            Arc::new(library.clone()),
            album.clone(),
            SortKey::CreatedDesc,
            MediaFilter::Images,
            SelectionMode::Multiple { max },
        )
        .unwrap()
    }

    #[test]
    fn test_incremental_removal_evicts_selected() {
        let library = MockLibrary::new();
        let album = library.add_album(
            "Trip",
            vec![asset("a", 400), asset("b", 300), asset("c", 200)],
        );
        let mut source = source_over(&library, &album, 3);
        source.collection_mut().select_at(1);

        library.remove_asset(&album, 1);
        let applied = source.apply_change(&ChangeDetails::incremental(vec![], vec![1], vec![]));

        assert_eq!(
            applied.pending,
            PendingChange::Incremental {
                inserted: vec![],
                removed: vec![1],
                changed: vec![]
            }
        );
        assert_eq!(applied.evicted, vec![AssetId::new("b")]);
        assert_eq!(source.collection().selection_count(), 0);
        assert_eq!(source.collection().len(), 2);
    }

    #[test]
    fn test_incoherent_diff_falls_back_to_reload() {
        let library = MockLibrary::new();
        let album = library.add_album("Trip", vec![asset("a", 400), asset("b", 300)]);
        let mut source = source_over(&library, &album, 3);

        library.remove_asset(&album, 0);
        // Report claims an in-range removal but the arithmetic cannot
        // reconcile two removals against one missing item.
        let applied =
            source.apply_change(&ChangeDetails::incremental(vec![], vec![0, 1], vec![]));

        assert_eq!(applied.pending, PendingChange::Reload);
        assert_eq!(source.collection().len(), 1);
    }

    #[test]
    fn test_opaque_change_reloads() {
        let library = MockLibrary::new();
        let album = library.add_album("Trip", vec![asset("a", 400)]);
        let mut source = source_over(&library, &album, 3);

        let applied = source.apply_change(&ChangeDetails::reload());
        assert_eq!(applied.pending, PendingChange::Reload);

        // Host-driven resync behaves the same way.
        assert_eq!(source.refetch().pending, PendingChange::Reload);
    }

    #[test]
    fn test_invalidation_empties_collection_and_selection() {
        let library = MockLibrary::new();
        let album = library.add_album("Trip", vec![asset("a", 400), asset("b", 300)]);
        let mut source = source_over(&library, &album, 3);
        source.collection_mut().select_at(0);

        library.invalidate_album(&album);
        let applied = source.apply_change(&ChangeDetails::invalidated());

        assert_eq!(applied.pending, PendingChange::Reload);
        assert_eq!(applied.evicted, vec![AssetId::new("a")]);
        assert!(source.is_invalidated());
        assert!(source.collection().is_empty());

        // Further reports on a dead query stay absorbed.
        let again = source.apply_change(&ChangeDetails::reload());
        assert_eq!(again.pending, PendingChange::Reload);
        assert!(again.evicted.is_empty());
    }

    #[test]
    fn test_observers_hear_published_change() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc as StdArc;

        let library = MockLibrary::new();
        let album = library.add_album("Trip", vec![asset("a", 400)]);
        let mut source = source_over(&library, &album, 3);
        let reloads = StdArc::new(AtomicUsize::new(0));
        let id = {
            let reloads = StdArc::clone(&reloads);
            source.register_observer(move |pending| {
                if *pending == PendingChange::Reload {
                    reloads.fetch_add(1, Ordering::SeqCst);
                }
            })
        };

        source.apply_change(&ChangeDetails::reload());
        assert_eq!(reloads.load(Ordering::SeqCst), 1);

        source.unregister_observer(id);
        source.apply_change(&ChangeDetails::reload());
        assert_eq!(reloads.load(Ordering::SeqCst), 1);
    }
}
