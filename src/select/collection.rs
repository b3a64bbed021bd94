//! Selectable collection
//!
//! An ordered snapshot of assets with a bounded, order-preserving
//! selection on top. Item order comes from the library sort and only
//! matters for positional mapping; selection order is the order the
//! user picked things in, and is what ordinal badges and the final
//! result list are built from.
//!
//! Invariant: every selected identifier resolves to an asset, either
//! one present in `items` or one retained in the external side map
//! (camera captures that are not in the current snapshot page). When
//! the snapshot changes, [`SelectableCollection::retain_present`]
//! evicts anything that stopped resolving, atomically with the change
//! notification the query source publishes.

use std::collections::{HashMap, HashSet};

use super::notify::{ChangeNotifier, ObserverId, SelectionEvent};
use crate::library::types::{Asset, AssetId};

/// Selection policy for a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// At most one selection; selecting again replaces it
    Single,
    /// Up to `max` selections; selecting at the cap is refused
    Multiple { max: usize },
}

impl SelectionMode {
    /// Maximum number of simultaneous selections
    #[must_use]
    pub const fn cap(&self) -> usize {
        match self {
            Self::Single => 1,
            Self::Multiple { max } => *max,
        }
    }
}

/// Outcome of a selection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Newly selected; `ordinal` is its 1-based position in selection order
    Selected { ordinal: usize },
    /// Single-select replaced the previous selection
    Replaced { previous: AssetId },
    /// Already at the selection cap; nothing changed
    AtCapacity,
    /// The asset was already selected; nothing changed
    AlreadySelected,
    /// No asset at that logical index
    OutOfBounds,
}

/// Outcome of a deselection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeselectOutcome {
    /// Removed; `ordinal` is the 1-based position it held in selection order
    Deselected { ordinal: usize },
    /// The asset was not selected; nothing changed
    NotSelected,
    /// No asset at that logical index
    OutOfBounds,
}

/// Ordered items plus an order-preserving bounded selection
pub struct SelectableCollection {
    items: Vec<Asset>,
    order: Vec<AssetId>,
    selected: HashSet<AssetId>,
    external: HashMap<AssetId, Asset>,
    mode: SelectionMode,
    notifier: ChangeNotifier<SelectionEvent>,
}

impl SelectableCollection {
    /// Fresh collection over a snapshot, nothing selected
    #[must_use]
    pub fn new(items: Vec<Asset>, mode: SelectionMode) -> Self {
        Self {
            items,
            order: Vec::new(),
            selected: HashSet::new(),
            external: HashMap::new(),
            mode,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Current snapshot, in library order
    #[must_use]
    pub fn items(&self) -> &[Asset] {
        &self.items
    }

    /// Number of items in the snapshot
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the snapshot is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Selection policy
    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Asset at a logical index
    #[must_use]
    pub fn asset_at(&self, logical: usize) -> Option<&Asset> {
        self.items.get(logical)
    }

    /// Logical index of an asset in the snapshot
    #[must_use]
    pub fn index_of(&self, id: &AssetId) -> Option<usize> {
        self.items.iter().position(|asset| &asset.id == id)
    }

    /// Whether the asset at a logical index is selected
    #[must_use]
    pub fn is_selected_at(&self, logical: usize) -> bool {
        self.items
            .get(logical)
            .is_some_and(|asset| self.selected.contains(&asset.id))
    }

    /// Number of current selections
    #[must_use]
    pub fn selection_count(&self) -> usize {
        self.order.len()
    }

    /// 1-based position of an asset in selection order
    #[must_use]
    pub fn ordinal_of(&self, id: &AssetId) -> Option<usize> {
        self.order.iter().position(|sel| sel == id).map(|i| i + 1)
    }

    /// Select the asset at a logical index
    ///
    /// Refused (no-op) at the cap in multi-select; replaces the
    /// existing selection in single-select. Successful mutations notify
    /// selection observers synchronously before returning.
    pub fn select_at(&mut self, logical: usize) -> SelectOutcome {
        let Some(asset) = self.items.get(logical) else {
            return SelectOutcome::OutOfBounds;
        };
        self.push_selection(asset.id.clone(), None)
    }

    /// Append an asset to the selection that need not be in the snapshot
    ///
    /// Camera-capture path: the new asset joins at the end of selection
    /// order regardless of library order, and its full value is retained
    /// so it stays resolvable until it shows up in a snapshot.
    pub fn append_external(&mut self, asset: Asset) -> SelectOutcome {
        let id = asset.id.clone();
        let retained = if self.index_of(&id).is_none() {
            Some(asset)
        } else {
            None
        };
        self.push_selection(id, retained)
    }

    fn push_selection(&mut self, id: AssetId, external: Option<Asset>) -> SelectOutcome {
        if self.selected.contains(&id) {
            return SelectOutcome::AlreadySelected;
        }
        let replaced = match self.mode {
            SelectionMode::Single => {
                let previous = self.order.first().cloned();
                if let Some(prev) = &previous {
                    self.selected.remove(prev);
                    self.external.remove(prev);
                    self.order.clear();
                    self.notifier.notify(&SelectionEvent::Deselected(prev.clone()));
                }
                previous
            }
            SelectionMode::Multiple { max } => {
                if self.order.len() >= max {
                    return SelectOutcome::AtCapacity;
                }
                None
            }
        };
        if let Some(asset) = external {
            self.external.insert(id.clone(), asset);
        }
        self.selected.insert(id.clone());
        self.order.push(id.clone());
        self.notifier.notify(&SelectionEvent::Selected(id));
        match replaced {
            Some(previous) => SelectOutcome::Replaced { previous },
            None => SelectOutcome::Selected {
                ordinal: self.order.len(),
            },
        }
    }

    /// Deselect the asset at a logical index
    pub fn deselect_at(&mut self, logical: usize) -> DeselectOutcome {
        let Some(asset) = self.items.get(logical) else {
            return DeselectOutcome::OutOfBounds;
        };
        let id = asset.id.clone();
        let Some(position) = self.order.iter().position(|sel| sel == &id) else {
            return DeselectOutcome::NotSelected;
        };
        self.order.remove(position);
        self.selected.remove(&id);
        self.external.remove(&id);
        self.notifier.notify(&SelectionEvent::Deselected(id));
        DeselectOutcome::Deselected {
            ordinal: position + 1,
        }
    }

    /// Selected assets in the order the user picked them
    #[must_use]
    pub fn ordered_selections(&self) -> Vec<Asset> {
        self.order
            .iter()
            .filter_map(|id| {
                self.items
                    .iter()
                    .find(|asset| &asset.id == id)
                    .or_else(|| self.external.get(id))
                    .cloned()
            })
            .collect()
    }

    /// Logical index and 1-based ordinal of each selection present in
    /// the snapshot, in selection order
    ///
    /// External selections not in the snapshot have no logical index
    /// and are skipped; their ordinal positions are still counted.
    #[must_use]
    pub fn selected_logical_indices(&self) -> Vec<(usize, usize)> {
        self.order
            .iter()
            .enumerate()
            .filter_map(|(position, id)| self.index_of(id).map(|logical| (logical, position + 1)))
            .collect()
    }

    /// Replace the snapshot; selection is reconciled separately via
    /// [`SelectableCollection::retain_present`]
    pub fn replace_items(&mut self, items: Vec<Asset>) {
        self.items = items;
    }

    /// Evict selections that no longer resolve to any asset
    ///
    /// External (camera-captured) selections are exempt: they carry
    /// their own asset value. Returns the evicted identifiers; evictions
    /// notify observers as one [`SelectionEvent::Evicted`] batch.
    pub fn retain_present(&mut self) -> Vec<AssetId> {
        let evicted: Vec<AssetId> = self
            .order
            .iter()
            .filter(|id| self.index_of(id).is_none() && !self.external.contains_key(*id))
            .cloned()
            .collect();
        if !evicted.is_empty() {
            self.order.retain(|id| !evicted.contains(id));
            for id in &evicted {
                self.selected.remove(id);
            }
            self.notifier.notify(&SelectionEvent::Evicted(evicted.clone()));
        }
        evicted
    }

    /// Seed the selection from a prior collection's ordered selections
    ///
    /// Keeps those whose identifier exists in this snapshot, preserving
    /// their relative order; the rest are dropped. Seeding does not
    /// notify observers — it is construction, not mutation.
    pub fn seed_from(&mut self, prior: &[Asset]) {
        self.order.clear();
        self.selected.clear();
        self.external.clear();
        let cap = self.mode.cap();
        for asset in prior {
            if self.order.len() >= cap {
                break;
            }
            if self.index_of(&asset.id).is_some() && !self.selected.contains(&asset.id) {
                self.selected.insert(asset.id.clone());
                self.order.push(asset.id.clone());
            }
        }
    }

    /// Register a selection observer
    pub fn observe(&mut self, observer: impl Fn(&SelectionEvent) + Send + 'static) -> ObserverId {
        self.notifier.register(observer)
    }

    /// Remove a selection observer
    pub fn unobserve(&mut self, id: ObserverId) {
        self.notifier.unregister(id);
    }
}

impl std::fmt::Debug for SelectableCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectableCollection")
            .field("items", &self.items.len())
            .field("selected", &self.order)
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn asset(id: &str, secs: i64) -> Asset {
        Asset::image(AssetId::new(id), Utc.timestamp_opt(secs, 0).unwrap())
    }

    fn four_assets() -> Vec<Asset> {
        vec![
            asset("a", 400),
            asset("b", 300),
            asset("c", 200),
            asset("d", 100),
        ]
    }

    #[test]
    fn test_select_up_to_cap_then_refuse() {
        let mut collection =
            SelectableCollection::new(four_assets(), SelectionMode::Multiple { max: 2 });

        assert_eq!(collection.select_at(0), SelectOutcome::Selected { ordinal: 1 });
        assert_eq!(collection.select_at(1), SelectOutcome::Selected { ordinal: 2 });
        assert_eq!(collection.select_at(2), SelectOutcome::AtCapacity);
        assert_eq!(collection.selection_count(), 2);
    }

    #[test]
    fn test_single_select_replaces() {
        let mut collection = SelectableCollection::new(four_assets(), SelectionMode::Single);

        assert_eq!(collection.select_at(0), SelectOutcome::Selected { ordinal: 1 });
        assert_eq!(
            collection.select_at(2),
            SelectOutcome::Replaced {
                previous: AssetId::new("a")
            }
        );
        assert_eq!(collection.selection_count(), 1);
        assert!(collection.is_selected_at(2));
        assert!(!collection.is_selected_at(0));
    }

    #[test]
    fn test_deselect_reports_vacated_ordinal() {
        let mut collection =
            SelectableCollection::new(four_assets(), SelectionMode::Multiple { max: 3 });
        collection.select_at(0);
        collection.select_at(1);
        collection.select_at(2);

        assert_eq!(
            collection.deselect_at(0),
            DeselectOutcome::Deselected { ordinal: 1 }
        );
        // b and c shift down one ordinal each
        assert_eq!(collection.ordinal_of(&AssetId::new("b")), Some(1));
        assert_eq!(collection.ordinal_of(&AssetId::new("c")), Some(2));
        assert_eq!(collection.deselect_at(0), DeselectOutcome::NotSelected);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut collection =
            SelectableCollection::new(four_assets(), SelectionMode::Multiple { max: 2 });
        assert_eq!(collection.select_at(10), SelectOutcome::OutOfBounds);
        assert_eq!(collection.deselect_at(10), DeselectOutcome::OutOfBounds);
    }

    #[test]
    fn test_eviction_keeps_externals() {
        let mut collection =
            SelectableCollection::new(four_assets(), SelectionMode::Multiple { max: 3 });
        collection.select_at(1);
        collection.append_external(asset("captured", 999));

        // b disappears from the next snapshot
        collection.replace_items(vec![asset("a", 400), asset("c", 200)]);
        let evicted = collection.retain_present();

        assert_eq!(evicted, vec![AssetId::new("b")]);
        assert_eq!(collection.selection_count(), 1);
        assert_eq!(
            collection.ordered_selections()[0].id,
            AssetId::new("captured")
        );
    }

    #[test]
    fn test_eviction_notifies_observers_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let mut collection =
            SelectableCollection::new(four_assets(), SelectionMode::Multiple { max: 3 });
        collection.select_at(0);
        collection.select_at(1);
        let batches = Arc::new(AtomicUsize::new(0));
        {
            let batches = Arc::clone(&batches);
            collection.observe(move |event| {
                if matches!(event, SelectionEvent::Evicted(_)) {
                    batches.fetch_add(1, Ordering::SeqCst);
                }
            });
        }

        collection.replace_items(Vec::new());
        let evicted = collection.retain_present();

        assert_eq!(evicted.len(), 2);
        assert_eq!(batches.load(Ordering::SeqCst), 1);
        // Nothing left, nothing further to evict
        assert!(collection.retain_present().is_empty());
    }

    #[test]
    fn test_seed_from_preserves_relative_order() {
        let prior = vec![asset("d", 100), asset("x", 50), asset("b", 300)];
        let mut collection =
            SelectableCollection::new(four_assets(), SelectionMode::Multiple { max: 5 });

        collection.seed_from(&prior);

        let ids: Vec<String> = collection
            .ordered_selections()
            .iter()
            .map(|a| a.id.to_string())
            .collect();
        assert_eq!(ids, vec!["d".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_append_external_respects_cap() {
        let mut collection =
            SelectableCollection::new(four_assets(), SelectionMode::Multiple { max: 1 });
        collection.select_at(0);
        assert_eq!(
            collection.append_external(asset("captured", 999)),
            SelectOutcome::AtCapacity
        );
    }

    #[test]
    fn test_selected_logical_indices_in_selection_order() {
        let mut collection =
            SelectableCollection::new(four_assets(), SelectionMode::Multiple { max: 3 });
        collection.select_at(2);
        collection.select_at(0);

        assert_eq!(collection.selected_logical_indices(), vec![(2, 1), (0, 2)]);
    }

    proptest! {
        /// Selection stays a subset of resolvable assets through arbitrary
        /// select/deselect/evict interleavings.
        #[test]
        fn prop_selection_subset_invariant(ops in proptest::collection::vec((0usize..6, 0usize..3), 0..40)) {
            let mut collection =
                SelectableCollection::new(four_assets(), SelectionMode::Multiple { max: 3 });
            for (index, op) in ops {
                match op {
                    0 => { collection.select_at(index); }
                    1 => { collection.deselect_at(index); }
                    _ => {
                        let keep: Vec<Asset> = four_assets().into_iter().skip(index % 4).collect();
                        collection.replace_items(keep);
                        collection.retain_present();
                    }
                }
                prop_assert!(collection.selection_count() <= 3);
                prop_assert_eq!(
                    collection.ordered_selections().len(),
                    collection.selection_count()
                );
            }
        }
    }
}
