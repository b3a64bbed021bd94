//! Picker session — the selection synchronizer
//!
//! This module implements the core state machine of the picker: one
//! [`PickerSession`] owns the current album's query source, the album
//! list, and the grid handle, and reconciles three input streams into
//! one consistent selection state:
//!
//! - user taps (select / deselect / camera cell), arriving on the UI thread
//! - library change reports, arriving on arbitrary threads and marshalled
//!   to the UI thread through an mpsc channel drained by [`PickerSession::pump`]
//! - camera-capture completions, appending assets that may not be visible
//!   in the current snapshot
//!
//! # Threading
//!
//! The UI thread owns every grid and collection mutation. The change
//! observer registered with the library only forwards reports into the
//! session's channel; the channel send is the sole synchronization
//! boundary. Host callbacks run on the [`CallbackDispatcher`] worker so
//! host latency never blocks gesture handling.
//!
//! # Teardown
//!
//! `finish`/`cancel` detach from change notifications before delivering
//! results, and at most one of the two ever fires its callback. After
//! detachment every grid mutation is a no-op; events still in the
//! channel are drained and dropped.

pub mod callbacks;
pub mod dispatch;

pub use callbacks::HostCallbacks;
pub use dispatch::CallbackDispatcher;

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::debug;
use moka::sync::Cache;
use thiserror::Error;

use crate::config::PickerConfig;
use crate::library::error::LibraryError;
use crate::library::types::{AlbumHandle, Asset, AssetId, ChangeDetails};
use crate::library::{ObserverToken, PhotoLibrary};
use crate::select::albums::AlbumCollection;
use crate::select::collection::{DeselectOutcome, SelectOutcome, SelectionMode};
use crate::select::notify::PendingChange;
use crate::select::source::LibraryQuerySource;
use crate::select::translate::IndexTranslation;
use crate::ui::traits::PhotoGrid;
use crate::ui::types::{Badge, CommitControl, GridUpdate};

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session has been detached (finished, cancelled, or dropped)
    #[error("Session is detached from its presentation surface")]
    Detached,

    /// The reserved camera cell was used where an asset was expected
    #[error("The camera cell has no asset")]
    ReservedIndex,

    /// No cell exists at the given presentation index
    #[error("No cell at presentation index {0}")]
    OutOfBounds(usize),

    /// The library reported no albums to present
    #[error("The library reported no albums")]
    NoAlbums,

    /// Invalid picker configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Library collaborator failure
    #[error("Library error: {0}")]
    Library(#[from] LibraryError),
}

/// What a tap on the grid amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapOutcome {
    /// The cell became selected with this 1-based ordinal
    Selected { ordinal: usize },
    /// The cell's selection was removed
    Deselected,
    /// The tap hit the camera cell; the host should present capture UI
    CameraRequested,
    /// The tap was refused (cap reached, out of range, or detached)
    Rejected,
}

/// One picker presentation: albums, grid, selection, callbacks
pub struct PickerSession {
    library: Arc<dyn PhotoLibrary>,
    grid: Box<dyn PhotoGrid>,
    config: PickerConfig,
    callbacks: HostCallbacks,
    albums: AlbumCollection,
    source: LibraryQuerySource,
    translation: IndexTranslation,
    dispatcher: CallbackDispatcher,
    events_tx: Sender<ChangeDetails>,
    events_rx: Receiver<ChangeDetails>,
    observer_token: Option<ObserverToken>,
    previews: Cache<AssetId, Arc<Vec<u8>>>,
    seed: Vec<Asset>,
    badged: Vec<usize>,
    detached: bool,
    completed: bool,
}

impl PickerSession {
    /// Open a session over the library's first album
    ///
    /// Fetches the album list, builds the query source, seeds any
    /// initial selection by identifier match, registers the change
    /// observer, and performs the first full grid reload.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, an empty album list, or a failed
    /// initial fetch.
    pub fn new(
        library: Arc<dyn PhotoLibrary>,
        grid: Box<dyn PhotoGrid>,
        config: PickerConfig,
        callbacks: HostCallbacks,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let albums = AlbumCollection::new(library.albums()?);
        let album = albums
            .current()
            .ok_or(SessionError::NoAlbums)?
            .handle
            .clone();
        let mut source = LibraryQuerySource::new(
            Arc::clone(&library),
            album.clone(),
            config.sort,
            config.media,
            selection_mode(&config),
        )?;
        source.collection_mut().seed_from(&config.initial_selection);

        let (events_tx, events_rx) = mpsc::channel();
        let translation = IndexTranslation::new(config.camera_cell);
        let seed = config.initial_selection.clone();
        let previews = Cache::builder()
            .max_capacity(64)
            .time_to_live(Duration::from_secs(60))
            .build();

        let mut session = Self {
            library,
            grid,
            config,
            callbacks,
            albums,
            source,
            translation,
            dispatcher: CallbackDispatcher::new(),
            events_tx,
            events_rx,
            observer_token: None,
            previews,
            seed,
            badged: Vec::new(),
            detached: false,
            completed: false,
        };
        session.observer_token = Some(session.register_library_observer(&album)?);
        session.with_grid(|grid| grid.reload());
        session.refresh_badges();
        session.update_commit();
        Ok(session)
    }

    /// The album list backing the picker's album table
    #[must_use]
    pub fn albums(&self) -> &AlbumCollection {
        &self.albums
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// The index translation for the current camera-cell setting
    #[must_use]
    pub const fn translation(&self) -> IndexTranslation {
        self.translation
    }

    /// Number of current selections
    #[must_use]
    pub fn selection_count(&self) -> usize {
        self.source.collection().selection_count()
    }

    /// Selected assets in the order the user picked them
    #[must_use]
    pub fn ordered_selections(&self) -> Vec<Asset> {
        self.source.collection().ordered_selections()
    }

    /// Whether the session has been detached
    #[must_use]
    pub const fn is_detached(&self) -> bool {
        self.detached
    }

    /// UI predicate: may the cell at this presentation index be tapped
    /// into (or out of) the selection?
    ///
    /// The camera cell is never selectable, and at the cap unselected
    /// cells report false so the grid refuses the tap before any visual
    /// selection occurs.
    #[must_use]
    pub fn can_select(&self, presentation: usize) -> bool {
        if self.detached || self.translation.is_reserved(presentation) {
            return false;
        }
        let Some(logical) = self.translation.to_logical(presentation) else {
            return false;
        };
        let collection = self.source.collection();
        if logical >= collection.len() {
            return false;
        }
        match collection.mode() {
            // Single-select replaces, so any cell is tappable.
            SelectionMode::Single => true,
            SelectionMode::Multiple { max } => {
                collection.is_selected_at(logical) || collection.selection_count() < max
            }
        }
    }

    /// Handle a tap on a grid cell
    ///
    /// Toggles selection for asset cells; reports `CameraRequested` for
    /// the reserved cell so the host can present its capture UI. Badges,
    /// the commit control, and the host callbacks are all driven from
    /// here; callbacks fire asynchronously and never block the gesture.
    pub fn tap(&mut self, presentation: usize) -> TapOutcome {
        if self.detached {
            return TapOutcome::Rejected;
        }
        if self.translation.is_reserved(presentation) {
            return TapOutcome::CameraRequested;
        }
        let Some(logical) = self.translation.to_logical(presentation) else {
            return TapOutcome::Rejected;
        };
        if self.source.collection().is_selected_at(logical) {
            self.tap_deselect(presentation, logical)
        } else {
            self.tap_select(presentation, logical)
        }
    }

    fn tap_select(&mut self, presentation: usize, logical: usize) -> TapOutcome {
        let Some(asset) = self.source.collection().asset_at(logical).cloned() else {
            return TapOutcome::Rejected;
        };
        match self.source.collection_mut().select_at(logical) {
            SelectOutcome::Selected { ordinal } => {
                let badge = self.badge_for(ordinal);
                self.with_grid(|grid| grid.set_badge(presentation, Some(badge)));
                self.badged.push(presentation);
                self.update_commit();
                self.dispatch_select(asset);
                TapOutcome::Selected { ordinal }
            }
            SelectOutcome::Replaced { previous } => {
                // Single-select: the old badge goes away with its selection.
                if let Some(prev_logical) = self.source.collection().index_of(&previous) {
                    let prev_presentation = self.translation.to_presentation(prev_logical);
                    self.with_grid(|grid| grid.set_badge(prev_presentation, None));
                    self.badged.retain(|&p| p != prev_presentation);
                    if let Some(prev_asset) =
                        self.source.collection().asset_at(prev_logical).cloned()
                    {
                        self.dispatch_deselect(prev_asset);
                    }
                }
                let badge = self.badge_for(1);
                self.with_grid(|grid| grid.set_badge(presentation, Some(badge)));
                self.badged.push(presentation);
                self.update_commit();
                self.dispatch_select(asset);
                TapOutcome::Selected { ordinal: 1 }
            }
            SelectOutcome::AtCapacity
            | SelectOutcome::AlreadySelected
            | SelectOutcome::OutOfBounds => TapOutcome::Rejected,
        }
    }

    fn tap_deselect(&mut self, presentation: usize, logical: usize) -> TapOutcome {
        let Some(asset) = self.source.collection().asset_at(logical).cloned() else {
            return TapOutcome::Rejected;
        };
        match self.source.collection_mut().deselect_at(logical) {
            DeselectOutcome::Deselected { .. } => {
                self.with_grid(|grid| grid.set_badge(presentation, None));
                self.badged.retain(|&p| p != presentation);
                // Removing one selection shifts every later ordinal down.
                self.refresh_badges();
                self.update_commit();
                self.dispatch_deselect(asset);
                TapOutcome::Deselected
            }
            DeselectOutcome::NotSelected | DeselectOutcome::OutOfBounds => TapOutcome::Rejected,
        }
    }

    /// Drain and apply pending library change reports
    ///
    /// Call from the UI thread (the host's main loop or equivalent).
    /// Returns the number of reports processed. Incremental changes are
    /// translated to presentation indices and applied without a full
    /// reload; everything else reloads and scrolls to top. Implicit
    /// eviction of selections never fires a host callback.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(details) = self.events_rx.try_recv() {
            processed += 1;
            if self.detached {
                // Late arrivals after dismissal are dropped.
                continue;
            }
            let applied = self.source.apply_change(&details);
            debug!(
                "pump: {:?} ({} evicted)",
                applied.pending,
                applied.evicted.len()
            );
            match applied.pending {
                PendingChange::Incremental {
                    inserted,
                    removed,
                    changed,
                } => {
                    let update = GridUpdate {
                        inserted: self.translation.to_presentation_all(&inserted),
                        removed: self.translation.to_presentation_all(&removed),
                        changed: self.translation.to_presentation_all(&changed),
                    };
                    self.with_grid(|grid| grid.apply(update));
                }
                PendingChange::Reload => {
                    self.badged.clear();
                    self.with_grid(|grid| {
                        grid.reload();
                        grid.scroll_to_top();
                    });
                }
            }
            self.refresh_badges();
            self.update_commit();
        }
        processed
    }

    /// Record a successful camera capture
    ///
    /// Resolves the new identifier and appends the asset directly to
    /// the ordered selection, bypassing the tap path — the asset may
    /// not be visible in the current snapshot yet. The commit control
    /// is refreshed either way.
    ///
    /// # Errors
    ///
    /// Fails if the session is detached or the identifier does not
    /// resolve.
    pub fn camera_capture_completed(
        &mut self,
        id: &AssetId,
    ) -> Result<SelectOutcome, SessionError> {
        if self.detached {
            return Err(SessionError::Detached);
        }
        let asset = self.library.resolve(id)?;
        let outcome = self.source.collection_mut().append_external(asset);
        if matches!(
            outcome,
            SelectOutcome::Selected { .. } | SelectOutcome::Replaced { .. }
        ) {
            self.refresh_badges();
        }
        self.update_commit();
        Ok(outcome)
    }

    /// Switch to another album
    ///
    /// Builds a fresh collection for the new album, carries the current
    /// selection forward by identifier match, re-registers the change
    /// observer, and fully reloads the grid.
    ///
    /// # Errors
    ///
    /// Fails if the session is detached, the index is out of range, or
    /// the new album cannot be fetched (in which case the current album
    /// stays active).
    pub fn switch_album(&mut self, index: usize) -> Result<(), SessionError> {
        if self.detached {
            return Err(SessionError::Detached);
        }
        let album = self
            .albums
            .albums()
            .get(index)
            .ok_or(SessionError::OutOfBounds(index))?
            .handle
            .clone();
        let mut source = LibraryQuerySource::new(
            Arc::clone(&self.library),
            album.clone(),
            self.config.sort,
            self.config.media,
            selection_mode(&self.config),
        )?;
        let prior = self.source.collection().ordered_selections();
        source.collection_mut().seed_from(&prior);
        let token = self.register_library_observer(&album)?;

        // Only now that the new query is live, tear the old one down.
        if let Some(old) = self.observer_token.take() {
            self.library.unregister_change_observer(old);
        }
        self.albums.select(index);
        self.source = source;
        self.observer_token = Some(token);

        self.badged.clear();
        self.with_grid(|grid| {
            grid.reload();
            grid.scroll_to_top();
        });
        self.refresh_badges();
        self.update_commit();
        Ok(())
    }

    /// Synchronously load preview bytes for a long-press
    ///
    /// Gestures are disabled on the grid for the duration of the load so
    /// the long-press cannot re-trigger; results are cached briefly.
    ///
    /// # Errors
    ///
    /// Fails for the reserved cell, out-of-range indices, or a library
    /// load failure.
    pub fn preview(&mut self, presentation: usize) -> Result<Arc<Vec<u8>>, SessionError> {
        if self.translation.is_reserved(presentation) {
            return Err(SessionError::ReservedIndex);
        }
        let logical = self
            .translation
            .to_logical(presentation)
            .ok_or(SessionError::OutOfBounds(presentation))?;
        let id = self
            .source
            .collection()
            .asset_at(logical)
            .ok_or(SessionError::OutOfBounds(presentation))?
            .id
            .clone();
        if let Some(bytes) = self.previews.get(&id) {
            return Ok(bytes);
        }
        self.with_grid(|grid| grid.set_gestures_enabled(false));
        let loaded = self.library.load_preview(&id);
        self.with_grid(|grid| grid.set_gestures_enabled(true));
        let bytes = Arc::new(loaded?);
        self.previews.insert(id, Arc::clone(&bytes));
        Ok(bytes)
    }

    /// Commit the session, delivering the ordered selections
    ///
    /// Detaches from change notifications first, then fires `on_finish`
    /// asynchronously (unless the session already completed) and returns
    /// the same list directly.
    pub fn finish(&mut self) -> Vec<Asset> {
        let result = self.ordered_selections();
        if !self.completed {
            self.detach();
            self.completed = true;
            if let Some(on_finish) = self.callbacks.on_finish.clone() {
                let payload = result.clone();
                self.dispatcher.dispatch(move || on_finish(payload));
            }
        }
        result
    }

    /// Cancel the session, delivering the original seed
    ///
    /// Mirror of [`PickerSession::finish`]; at most one of the two ever
    /// fires its callback.
    pub fn cancel(&mut self) -> Vec<Asset> {
        let result = self.seed.clone();
        if !self.completed {
            self.detach();
            self.completed = true;
            if let Some(on_cancel) = self.callbacks.on_cancel.clone() {
                let payload = result.clone();
                self.dispatcher.dispatch(move || on_cancel(payload));
            }
        }
        result
    }

    /// Block until all callbacks dispatched so far have run
    pub fn flush_callbacks(&self) {
        self.dispatcher.flush();
    }

    fn register_library_observer(
        &self,
        album: &AlbumHandle,
    ) -> Result<ObserverToken, LibraryError> {
        // Sender is !Sync; the Mutex makes the closure shareable across
        // whatever threads the library notifies from.
        let sender = Mutex::new(self.events_tx.clone());
        self.library.register_change_observer(
            album,
            Box::new(move |details| {
                if let Ok(sender) = sender.lock() {
                    let _ = sender.send(details);
                }
            }),
        )
    }

    fn dispatch_select(&self, asset: Asset) {
        if let Some(on_select) = self.callbacks.on_select.clone() {
            self.dispatcher.dispatch(move || on_select(asset));
        }
    }

    fn dispatch_deselect(&self, asset: Asset) {
        if let Some(on_deselect) = self.callbacks.on_deselect.clone() {
            self.dispatcher.dispatch(move || on_deselect(asset));
        }
    }

    fn detach(&mut self) {
        if let Some(token) = self.observer_token.take() {
            self.library.unregister_change_observer(token);
        }
        self.detached = true;
    }

    fn with_grid(&mut self, f: impl FnOnce(&mut dyn PhotoGrid)) {
        if !self.detached && self.grid.is_live() {
            f(self.grid.as_mut());
        }
    }

    fn badge_for(&self, ordinal: usize) -> Badge {
        match self.config.selection_marker {
            Some(marker) => Badge::marker(marker),
            None => Badge::ordinal(ordinal),
        }
    }

    fn refresh_badges(&mut self) {
        let entries = self.source.collection().selected_logical_indices();
        let mut stale = std::mem::take(&mut self.badged);
        let mut current = Vec::with_capacity(entries.len());
        for (logical, ordinal) in entries {
            let presentation = self.translation.to_presentation(logical);
            let badge = self.badge_for(ordinal);
            self.with_grid(|grid| grid.set_badge(presentation, Some(badge)));
            stale.retain(|&p| p != presentation);
            current.push(presentation);
        }
        for presentation in stale {
            self.with_grid(|grid| grid.set_badge(presentation, None));
        }
        self.badged = current;
    }

    fn update_commit(&mut self) {
        let count = self.source.collection().selection_count();
        let control = CommitControl {
            enabled: count > 0,
            count,
        };
        self.with_grid(|grid| grid.set_commit_control(control));
    }
}

impl Drop for PickerSession {
    fn drop(&mut self) {
        if !self.detached {
            self.detach();
        }
    }
}

impl std::fmt::Debug for PickerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickerSession")
            .field("album", &self.source.album())
            .field("selection_count", &self.selection_count())
            .field("detached", &self.detached)
            .finish()
    }
}

const fn selection_mode(config: &PickerConfig) -> SelectionMode {
    if config.max_selections == 1 {
        SelectionMode::Single
    } else {
        SelectionMode::Multiple {
            max: config.max_selections,
        }
    }
}
