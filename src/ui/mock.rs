//! Mock grid and alert presenter for testing

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{AlertPresenter, PhotoGrid};
use super::types::{AlertChoice, Badge, CommitControl, GridUpdate};

/// One recorded grid operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridOp {
    Reload,
    ScrollToTop,
    Apply(GridUpdate),
    Badge(usize, Option<Badge>),
    Commit(CommitControl),
    Gestures(bool),
}

#[derive(Debug, Default)]
struct GridState {
    ops: Vec<GridOp>,
    badges: HashMap<usize, Badge>,
    commit: CommitControl,
    live: bool,
}

/// Mock grid that records every operation
///
/// Clones share state, so a test can hand one handle to the session and
/// keep another for assertions. [`MockGrid::tear_down`] flips `is_live`
/// to exercise the post-dismissal no-op guards.
#[derive(Debug, Clone)]
pub struct MockGrid {
    state: Arc<Mutex<GridState>>,
}

impl MockGrid {
    /// Create a live mock grid
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(GridState {
                live: true,
                ..GridState::default()
            })),
        }
    }

    /// Simulate the presenting surface being dismissed
    pub fn tear_down(&self) {
        self.state.lock().unwrap().live = false;
    }

    /// All operations recorded so far, in order
    #[must_use]
    pub fn ops(&self) -> Vec<GridOp> {
        self.state.lock().unwrap().ops.clone()
    }

    /// Number of full reloads performed
    #[must_use]
    pub fn reload_count(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .ops
            .iter()
            .filter(|op| matches!(op, GridOp::Reload))
            .count()
    }

    /// Currently visible badge for a presentation index
    #[must_use]
    pub fn badge_at(&self, presentation: usize) -> Option<Badge> {
        self.state.lock().unwrap().badges.get(&presentation).cloned()
    }

    /// Number of cells currently carrying a badge
    #[must_use]
    pub fn badge_count(&self) -> usize {
        self.state.lock().unwrap().badges.len()
    }

    /// Last commit-control state pushed to the grid
    #[must_use]
    pub fn commit_control(&self) -> CommitControl {
        self.state.lock().unwrap().commit
    }
}

impl Default for MockGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotoGrid for MockGrid {
    fn is_live(&self) -> bool {
        self.state.lock().unwrap().live
    }

    fn reload(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.badges.clear();
        state.ops.push(GridOp::Reload);
    }

    fn scroll_to_top(&mut self) {
        self.state.lock().unwrap().ops.push(GridOp::ScrollToTop);
    }

    fn apply(&mut self, update: GridUpdate) {
        self.state.lock().unwrap().ops.push(GridOp::Apply(update));
    }

    fn set_badge(&mut self, presentation: usize, badge: Option<Badge>) {
        let mut state = self.state.lock().unwrap();
        match &badge {
            Some(b) => {
                state.badges.insert(presentation, b.clone());
            }
            None => {
                state.badges.remove(&presentation);
            }
        }
        state.ops.push(GridOp::Badge(presentation, badge));
    }

    fn set_commit_control(&mut self, control: CommitControl) {
        let mut state = self.state.lock().unwrap();
        state.commit = control;
        state.ops.push(GridOp::Commit(control));
    }

    fn set_gestures_enabled(&mut self, enabled: bool) {
        self.state.lock().unwrap().ops.push(GridOp::Gestures(enabled));
    }
}

/// Mock alert presenter with a predetermined choice
#[derive(Debug, Clone)]
pub struct MockAlerts {
    state: Arc<Mutex<AlertState>>,
}

#[derive(Debug)]
struct AlertState {
    choice: AlertChoice,
    presented: usize,
    settings_opened: usize,
}

impl MockAlerts {
    /// Mock that answers every alert with the given choice
    #[must_use]
    pub fn answering(choice: AlertChoice) -> Self {
        Self {
            state: Arc::new(Mutex::new(AlertState {
                choice,
                presented: 0,
                settings_opened: 0,
            })),
        }
    }

    /// How many alerts were presented
    #[must_use]
    pub fn presented(&self) -> usize {
        self.state.lock().unwrap().presented
    }

    /// How many times settings were opened
    #[must_use]
    pub fn settings_opened(&self) -> usize {
        self.state.lock().unwrap().settings_opened
    }
}

impl AlertPresenter for MockAlerts {
    fn present_denied_alert(&mut self) -> AlertChoice {
        let mut state = self.state.lock().unwrap();
        state.presented += 1;
        state.choice
    }

    fn open_settings(&mut self) {
        self.state.lock().unwrap().settings_opened += 1;
    }
}
