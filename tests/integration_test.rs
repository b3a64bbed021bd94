//! Integration tests for the photopick engine
//!
//! These tests drive complete picker sessions against the mock library
//! and mock grid: tap gestures, live library changes crossing a thread
//! boundary, album switches, camera capture, and the session-end
//! callback contract.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, TimeZone, Utc};
use photopick::library::types::ChangeDetails;
use photopick::ui::{Badge, GridOp};
use photopick::{
    Asset, AssetId, HostCallbacks, MockGrid, MockLibrary, PickerConfig, PickerSession, TapOutcome,
};

/// Newest-first assets, reproducible timestamps
fn assets(ids: &[&str]) -> Vec<Asset> {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    ids.iter()
        .enumerate()
        .map(|(i, id)| Asset::image(AssetId::new(*id), base - Duration::seconds(i as i64)))
        .collect()
}

fn open_session(
    library: &MockLibrary,
    grid: &MockGrid,
    config: PickerConfig,
    callbacks: HostCallbacks,
) -> PickerSession {
    PickerSession::new(
        Arc::new(library.clone()),
        Box::new(grid.clone()),
        config,
        callbacks,
    )
    .unwrap()
}

/// The walkthrough from the selection design: [a,b,c,d], cap of 2, with
/// the camera cell occupying presentation index 0.
#[test]
fn test_bounded_selection_walkthrough() {
    let library = MockLibrary::new();
    library.add_album("Camera Roll", assets(&["a", "b", "c", "d"]));
    let grid = MockGrid::new();
    let selects = Arc::new(AtomicUsize::new(0));
    let deselects = Arc::new(AtomicUsize::new(0));
    let callbacks = {
        let selects = Arc::clone(&selects);
        let deselects = Arc::clone(&deselects);
        HostCallbacks::new()
            .with_on_select(move |_| {
                selects.fetch_add(1, Ordering::SeqCst);
            })
            .with_on_deselect(move |_| {
                deselects.fetch_add(1, Ordering::SeqCst);
            })
    };
    let mut session = open_session(
        &library,
        &grid,
        PickerConfig::default().with_max_selections(2),
        callbacks,
    );

    // Select a, then b
    assert_eq!(session.tap(1), TapOutcome::Selected { ordinal: 1 });
    assert_eq!(session.tap(2), TapOutcome::Selected { ordinal: 2 });
    assert_eq!(session.selection_count(), 2);
    assert_eq!(grid.badge_at(1), Some(Badge::ordinal(1)));
    assert_eq!(grid.badge_at(2), Some(Badge::ordinal(2)));
    assert!(grid.commit_control().enabled);
    assert_eq!(grid.commit_control().count, 2);

    // c is refused at the cap, at the predicate stage first
    assert!(!session.can_select(3));
    assert_eq!(session.tap(3), TapOutcome::Rejected);
    assert_eq!(session.selection_count(), 2);

    // Deselecting a shifts b's ordinal down to 1
    assert_eq!(session.tap(1), TapOutcome::Deselected);
    assert_eq!(session.selection_count(), 1);
    assert!(grid.badge_at(1).is_none());
    assert_eq!(grid.badge_at(2), Some(Badge::ordinal(1)));

    session.flush_callbacks();
    assert_eq!(selects.load(Ordering::SeqCst), 2);
    assert_eq!(deselects.load(Ordering::SeqCst), 1);
}

/// An incremental deletion of a selected asset narrows the selection
/// silently: no callback, no full reload, one fewer badge.
#[test]
fn test_incremental_deletion_evicts_silently() {
    let library = MockLibrary::new();
    let album = library.add_album("Camera Roll", assets(&["a", "b", "c"]));
    let grid = MockGrid::new();
    let deselects = Arc::new(AtomicUsize::new(0));
    let callbacks = {
        let deselects = Arc::clone(&deselects);
        HostCallbacks::new().with_on_deselect(move |_| {
            deselects.fetch_add(1, Ordering::SeqCst);
        })
    };
    let mut session = open_session(
        &library,
        &grid,
        PickerConfig::default().with_max_selections(3),
        callbacks,
    );
    session.tap(1);
    session.tap(2);
    let reloads_before = grid.reload_count();
    let badges_before = grid.badge_count();
    assert_eq!(badges_before, 2);

    // b (logical index 1) disappears, reported incrementally from
    // another thread the way the platform library would.
    let worker = std::thread::spawn({
        let library = library.clone();
        let album = album.clone();
        move || library.remove_asset(&album, 1)
    });
    worker.join().unwrap();
    assert_eq!(session.pump(), 1);

    assert_eq!(session.selection_count(), 1);
    assert_eq!(grid.reload_count(), reloads_before);
    assert_eq!(grid.badge_count(), 1);
    assert!(grid
        .ops()
        .iter()
        .any(|op| matches!(op, GridOp::Apply(update) if update.removed == vec![2])));
    assert_eq!(grid.commit_control().count, 1);

    session.flush_callbacks();
    assert_eq!(deselects.load(Ordering::SeqCst), 0);
}

/// A structurally ambiguous change falls back to reload-and-scroll-to-top.
#[test]
fn test_opaque_change_forces_reload() {
    let library = MockLibrary::new();
    let album = library.add_album("Camera Roll", assets(&["a", "b"]));
    let grid = MockGrid::new();
    let mut session = open_session(
        &library,
        &grid,
        PickerConfig::default().with_max_selections(2),
        HostCallbacks::new(),
    );
    session.tap(1);
    let reloads_before = grid.reload_count();

    library.notify_opaque(&album);
    session.pump();

    assert_eq!(grid.reload_count(), reloads_before + 1);
    let ops = grid.ops();
    let reload_at = ops.iter().rposition(|op| *op == GridOp::Reload).unwrap();
    assert_eq!(ops[reload_at + 1], GridOp::ScrollToTop);
    // Selection survives (a is still present) and its badge is re-applied.
    assert_eq!(session.selection_count(), 1);
    assert_eq!(grid.badge_at(1), Some(Badge::ordinal(1)));
}

/// Deleting the observed album degrades to an empty collection without
/// crashing anything.
#[test]
fn test_album_invalidation_empties_picker() {
    let library = MockLibrary::new();
    let album = library.add_album("Doomed", assets(&["a", "b"]));
    let grid = MockGrid::new();
    let mut session = open_session(
        &library,
        &grid,
        PickerConfig::default().with_max_selections(2),
        HostCallbacks::new(),
    );
    session.tap(1);

    library.invalidate_album(&album);
    session.pump();

    assert_eq!(session.selection_count(), 0);
    assert_eq!(grid.badge_count(), 0);
    assert!(!grid.commit_control().enabled);
}

/// Switching albums carries the selection forward by identifier match,
/// preserving relative order and dropping the rest.
#[test]
fn test_album_switch_carries_selection_by_id() {
    let library = MockLibrary::new();
    library.add_album("First", assets(&["a", "b", "c"]));
    library.add_album("Second", assets(&["c", "x", "a"]));
    let grid = MockGrid::new();
    let mut session = open_session(
        &library,
        &grid,
        PickerConfig::default().with_max_selections(3),
        HostCallbacks::new(),
    );
    // Select b, then c, then a: selection order [b, c, a]
    session.tap(2);
    session.tap(3);
    session.tap(1);
    assert_eq!(session.selection_count(), 3);

    session.switch_album(1).unwrap();

    // b is not in Second; c and a survive in original relative order
    let ids: Vec<String> = session
        .ordered_selections()
        .iter()
        .map(|asset| asset.id.to_string())
        .collect();
    assert_eq!(ids, vec!["c".to_string(), "a".to_string()]);
    assert_eq!(session.albums().current().unwrap().title, "Second");
    // One live observer on the new album, none leaked on the old
    assert_eq!(library.observer_count(), 1);
}

/// Camera capture appends to the selection even before the grid has
/// seen the new asset, and the insertion then flows through pump.
#[test]
fn test_camera_capture_appends_then_materializes() {
    let library = MockLibrary::new();
    let album = library.add_album("Camera Roll", assets(&["a", "b"]));
    let grid = MockGrid::new();
    let mut session = open_session(
        &library,
        &grid,
        PickerConfig::default().with_max_selections(3),
        HostCallbacks::new(),
    );
    session.tap(1);

    let base = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();
    let id = library.capture(&album, Asset::image(AssetId::new("shot"), base));
    session.camera_capture_completed(&id).unwrap();

    // Appended at the end of selection order regardless of library order
    let ids: Vec<String> = session
        .ordered_selections()
        .iter()
        .map(|asset| asset.id.to_string())
        .collect();
    assert_eq!(ids, vec!["a".to_string(), "shot".to_string()]);
    assert_eq!(grid.commit_control().count, 2);

    // The library reported the insertion; pumping materializes it in the
    // grid and badges the now-visible cell (logical 0 -> presentation 1).
    session.pump();
    assert!(grid
        .ops()
        .iter()
        .any(|op| matches!(op, GridOp::Apply(update) if update.inserted == vec![1])));
    assert_eq!(grid.badge_at(1), Some(Badge::ordinal(2)));
}

/// Finish and cancel are mutually exclusive and deliver the right lists.
#[test]
fn test_finish_and_cancel_contract() {
    let library = MockLibrary::new();
    library.add_album("Camera Roll", assets(&["a", "b"]));
    let seed = assets(&["a"]);

    let finished: Arc<Mutex<Vec<Vec<Asset>>>> = Arc::new(Mutex::new(Vec::new()));
    let cancelled: Arc<Mutex<Vec<Vec<Asset>>>> = Arc::new(Mutex::new(Vec::new()));
    let callbacks = {
        let finished = Arc::clone(&finished);
        let cancelled = Arc::clone(&cancelled);
        HostCallbacks::new()
            .with_on_finish(move |result| finished.lock().unwrap().push(result))
            .with_on_cancel(move |result| cancelled.lock().unwrap().push(result))
    };
    let grid = MockGrid::new();
    let mut session = open_session(
        &library,
        &grid,
        PickerConfig::default()
            .with_max_selections(2)
            .with_initial_selection(seed.clone()),
        callbacks,
    );
    // The seed pre-selects a
    assert_eq!(session.selection_count(), 1);
    session.tap(2);

    let result = session.finish();
    assert_eq!(result.len(), 2);
    assert_eq!(library.observer_count(), 0);

    // A late cancel must not fire its callback
    let cancel_result = session.cancel();
    assert_eq!(cancel_result.len(), 1);

    session.flush_callbacks();
    assert_eq!(finished.lock().unwrap().len(), 1);
    assert_eq!(finished.lock().unwrap()[0].len(), 2);
    assert!(cancelled.lock().unwrap().is_empty());
}

/// Cancel returns the original seed untouched by in-session churn.
#[test]
fn test_cancel_returns_original_seed() {
    let library = MockLibrary::new();
    library.add_album("Camera Roll", assets(&["a", "b", "c"]));
    let seed = assets(&["b"]);
    let grid = MockGrid::new();
    let mut session = open_session(
        &library,
        &grid,
        PickerConfig::default()
            .with_max_selections(3)
            .with_initial_selection(seed),
        HostCallbacks::new(),
    );
    session.tap(1);
    session.tap(3);
    assert_eq!(session.selection_count(), 3);

    let result = session.cancel();
    let ids: Vec<String> = result.iter().map(|asset| asset.id.to_string()).collect();
    assert_eq!(ids, vec!["b".to_string()]);
}

/// Events that arrive after dismissal are drained and dropped; the grid
/// is never touched again.
#[test]
fn test_late_events_after_dismissal_are_dropped() {
    let library = MockLibrary::new();
    let album = library.add_album("Camera Roll", assets(&["a", "b"]));
    let grid = MockGrid::new();
    let mut session = open_session(
        &library,
        &grid,
        PickerConfig::default(),
        HostCallbacks::new(),
    );

    // Queue a change, then dismiss before pumping. The observer is gone
    // by the time of the second mutation; the first report is drained
    // without touching the grid.
    library.notify(&album, ChangeDetails::reload());
    session.finish();
    library.remove_asset(&album, 0);

    let ops_before = grid.ops().len();
    assert_eq!(session.pump(), 1);
    assert_eq!(grid.ops().len(), ops_before);
}
