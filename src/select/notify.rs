//! Change notification channel
//!
//! A one-to-many synchronous event channel. The query source publishes
//! [`PendingChange`] through one of these; the selectable collection
//! publishes [`SelectionEvent`]. Observers run on the notifying thread,
//! in registration order; cross-thread marshalling (when needed) is the
//! observer's job, typically by forwarding into an mpsc channel.

use crate::library::types::AssetId;

/// Identifier of one registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// A collection mutation, as published to the grid side
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChange {
    /// Diff against the previous snapshot, in logical indices
    Incremental {
        /// Post-change positions gaining items
        inserted: Vec<usize>,
        /// Pre-change positions losing items
        removed: Vec<usize>,
        /// Pre-change positions updated in place
        changed: Vec<usize>,
    },
    /// Discard everything, reload, scroll to top
    Reload,
}

/// A selection mutation on the selectable collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// An asset entered the selection
    Selected(AssetId),
    /// An asset left the selection by user action
    Deselected(AssetId),
    /// Assets were evicted because they vanished from the snapshot
    Evicted(Vec<AssetId>),
}

/// One-to-many synchronous event fan-out
pub struct ChangeNotifier<E> {
    observers: Vec<(ObserverId, Box<dyn Fn(&E) + Send>)>,
    next_id: u64,
}

impl<E> ChangeNotifier<E> {
    /// Empty notifier
    #[must_use]
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 1,
        }
    }

    /// Register an observer; returns its id for later removal
    pub fn register(&mut self, observer: impl Fn(&E) + Send + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer; unknown ids are ignored
    pub fn unregister(&mut self, id: ObserverId) {
        self.observers.retain(|(observer_id, _)| *observer_id != id);
    }

    /// Deliver an event to every observer, in registration order
    pub fn notify(&self, event: &E) {
        for (_, observer) in &self.observers {
            observer(event);
        }
    }

    /// Number of registered observers
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// True when nobody is listening
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<E> Default for ChangeNotifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for ChangeNotifier<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observers.len())
            .finish()
    }
}
