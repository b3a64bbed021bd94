//! Core traits for the UI abstraction layer

use super::types::{AlertChoice, Badge, CommitControl, GridUpdate};

/// Trait for the scrollable photo grid surface
///
/// This trait abstracts away the concrete grid widget, allowing the
/// synchronizer to drive any toolkit's collection view (or a mock in
/// tests) without knowing how cells are rendered. All indices are
/// presentation indices: the synthetic camera cell, when enabled,
/// occupies position 0 and callers have already applied the offset.
///
/// Every method must tolerate being called after the backing surface
/// has been torn down; implementations report that state through
/// [`PhotoGrid::is_live`] and the synchronizer checks it before each
/// mutation, so a dead grid only ever sees no-ops.
pub trait PhotoGrid {
    /// Whether the backing surface still exists
    fn is_live(&self) -> bool;

    /// Discard all cells and re-query the data source
    fn reload(&mut self);

    /// Scroll to the first cell
    fn scroll_to_top(&mut self);

    /// Apply an incremental batch of cell mutations
    fn apply(&mut self, update: GridUpdate);

    /// Set or clear the selection badge on a cell
    fn set_badge(&mut self, presentation: usize, badge: Option<Badge>);

    /// Update the commit ("done") control
    fn set_commit_control(&mut self, control: CommitControl);

    /// Enable or disable gesture recognition on the grid
    ///
    /// Used to bracket the synchronous long-press preview load so the
    /// gesture cannot re-trigger while the load is in flight.
    fn set_gestures_enabled(&mut self, enabled: bool);
}

/// Trait for presenting blocking authorization alerts
///
/// Implementations show a modal with Cancel / Open-Settings choices and
/// return which one the user picked.
pub trait AlertPresenter {
    /// Present the library-access-denied alert and block for a choice
    fn present_denied_alert(&mut self) -> AlertChoice;

    /// Open the system settings pane for this application
    fn open_settings(&mut self);
}
