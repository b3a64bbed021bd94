//! Mock photo library for testing
//!
//! An in-memory library whose albums can be mutated while observed,
//! emitting [`ChangeDetails`] to registered observers the way the
//! platform library would. Clones share state, so a test can hand one
//! handle to the session and keep another to mutate the "library" from
//! the outside (or from another thread, to exercise the redispatch
//! boundary).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::error::{LibraryError, Result};
use super::types::{
    Album, AlbumHandle, Asset, AssetId, Authorization, ChangeDetails, MediaFilter, SortKey,
};
use super::{ChangeObserverFn, ObserverToken, PhotoLibrary};

struct Inner {
    authorization: Authorization,
    grant_on_request: bool,
    albums: Vec<Album>,
    assets: HashMap<AlbumHandle, Vec<Asset>>,
    observers: HashMap<u64, (AlbumHandle, Arc<ChangeObserverFn>)>,
    next_token: u64,
}

/// In-memory mutable photo library
#[derive(Clone)]
pub struct MockLibrary {
    inner: Arc<Mutex<Inner>>,
}

impl MockLibrary {
    /// Empty, authorized library
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                authorization: Authorization::Authorized,
                grant_on_request: false,
                albums: Vec::new(),
                assets: HashMap::new(),
                observers: HashMap::new(),
                next_token: 1,
            })),
        }
    }

    /// Set the reported authorization state
    pub fn set_authorization(&self, authorization: Authorization) {
        self.inner.lock().unwrap().authorization = authorization;
    }

    /// Whether a future `request_authorization` call should grant access
    pub fn grant_on_request(&self, grant: bool) {
        self.inner.lock().unwrap().grant_on_request = grant;
    }

    /// Add an album seeded with assets; returns its handle
    ///
    /// Assets should be given in fetch order (newest first for the
    /// default sort) so that the indices reported by the mutation
    /// helpers line up with snapshot coordinates.
    pub fn add_album(&self, title: &str, assets: Vec<Asset>) -> AlbumHandle {
        let mut inner = self.inner.lock().unwrap();
        let handle = AlbumHandle::new(format!("album-{}", inner.albums.len()));
        inner.albums.push(Album {
            handle: handle.clone(),
            title: title.to_string(),
            asset_count: assets.len(),
        });
        inner.assets.insert(handle.clone(), assets);
        handle
    }

    /// Insert an asset at a position, notifying observers incrementally
    pub fn insert_asset(&self, album: &AlbumHandle, index: usize, asset: Asset) {
        let index = {
            let mut inner = self.inner.lock().unwrap();
            let index = match inner.assets.get_mut(album) {
                Some(assets) => {
                    let index = index.min(assets.len());
                    assets.insert(index, asset);
                    index
                }
                None => return,
            };
            Self::sync_counts(&mut inner);
            index
        };
        self.notify(album, ChangeDetails::incremental(vec![index], vec![], vec![]));
    }

    /// Remove the asset at a position, notifying observers incrementally
    pub fn remove_asset(&self, album: &AlbumHandle, index: usize) {
        let removed = {
            let mut inner = self.inner.lock().unwrap();
            let removed = match inner.assets.get_mut(album) {
                Some(assets) if index < assets.len() => {
                    assets.remove(index);
                    true
                }
                _ => false,
            };
            Self::sync_counts(&mut inner);
            removed
        };
        if removed {
            self.notify(album, ChangeDetails::incremental(vec![], vec![index], vec![]));
        }
    }

    /// Replace the asset at a position in place (edited metadata)
    pub fn update_asset(&self, album: &AlbumHandle, index: usize, asset: Asset) {
        let updated = {
            let mut inner = self.inner.lock().unwrap();
            match inner.assets.get_mut(album) {
                Some(assets) if index < assets.len() => {
                    assets[index] = asset;
                    true
                }
                _ => false,
            }
        };
        if updated {
            self.notify(album, ChangeDetails::incremental(vec![], vec![], vec![index]));
        }
    }

    /// Simulate a camera capture landing in an album as its newest asset
    ///
    /// Returns the new asset's identifier, the way the capture UI hands
    /// one back to the host on success.
    pub fn capture(&self, album: &AlbumHandle, asset: Asset) -> AssetId {
        let id = asset.id.clone();
        self.insert_asset(album, 0, asset);
        id
    }

    /// Delete an album entirely; its observers see an invalidation
    pub fn invalidate_album(&self, album: &AlbumHandle) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.albums.retain(|a| &a.handle != album);
            inner.assets.remove(album);
        }
        self.notify(album, ChangeDetails::invalidated());
    }

    /// Report a structurally ambiguous change (no index sets)
    pub fn notify_opaque(&self, album: &AlbumHandle) {
        self.notify(album, ChangeDetails::reload());
    }

    /// Send an arbitrary change report to an album's observers
    pub fn notify(&self, album: &AlbumHandle, details: ChangeDetails) {
        let observers: Vec<Arc<ChangeObserverFn>> = {
            let inner = self.inner.lock().unwrap();
            inner
                .observers
                .values()
                .filter(|(observed, _)| observed == album)
                .map(|(_, observer)| Arc::clone(observer))
                .collect()
        };
        // Called outside the lock: observers may re-enter the library.
        for observer in observers {
            observer(details.clone());
        }
    }

    /// Number of currently registered observers
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.lock().unwrap().observers.len()
    }

    fn sync_counts(inner: &mut Inner) {
        let counts: HashMap<AlbumHandle, usize> = inner
            .assets
            .iter()
            .map(|(handle, assets)| (handle.clone(), assets.len()))
            .collect();
        for album in &mut inner.albums {
            if let Some(count) = counts.get(&album.handle) {
                album.asset_count = *count;
            }
        }
    }
}

impl Default for MockLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotoLibrary for MockLibrary {
    fn authorization(&self) -> Authorization {
        self.inner.lock().unwrap().authorization
    }

    fn request_authorization(&self, respond: Box<dyn FnOnce(bool) + Send>) {
        let granted = {
            let mut inner = self.inner.lock().unwrap();
            if inner.grant_on_request {
                inner.authorization = Authorization::Authorized;
                true
            } else {
                inner.authorization = Authorization::Denied;
                false
            }
        };
        respond(granted);
    }

    fn albums(&self) -> Result<Vec<Album>> {
        Ok(self.inner.lock().unwrap().albums.clone())
    }

    fn fetch(&self, album: &AlbumHandle, sort: SortKey, filter: MediaFilter) -> Result<Vec<Asset>> {
        let inner = self.inner.lock().unwrap();
        let assets = inner
            .assets
            .get(album)
            .ok_or_else(|| LibraryError::UnknownAlbum(album.to_string()))?;
        let mut snapshot: Vec<Asset> = assets
            .iter()
            .filter(|asset| filter.matches(asset.kind))
            .cloned()
            .collect();
        match sort {
            SortKey::CreatedDesc => {
                snapshot.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| a.id.cmp(&b.id)));
            }
            SortKey::CreatedAsc => {
                snapshot.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.id.cmp(&b.id)));
            }
        }
        Ok(snapshot)
    }

    fn resolve(&self, id: &AssetId) -> Result<Asset> {
        let inner = self.inner.lock().unwrap();
        inner
            .assets
            .values()
            .flatten()
            .find(|asset| &asset.id == id)
            .cloned()
            .ok_or_else(|| LibraryError::UnknownAsset(id.to_string()))
    }

    fn load_preview(&self, id: &AssetId) -> Result<Vec<u8>> {
        // Deterministic stand-in bytes derived from the identifier.
        self.resolve(id)
            .map(|asset| asset.id.as_str().as_bytes().to_vec())
    }

    fn register_change_observer(
        &self,
        album: &AlbumHandle,
        observer: ChangeObserverFn,
    ) -> Result<ObserverToken> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.assets.contains_key(album) {
            return Err(LibraryError::UnknownAlbum(album.to_string()));
        }
        let token = inner.next_token;
        inner.next_token += 1;
        inner
            .observers
            .insert(token, (album.clone(), Arc::new(observer)));
        Ok(ObserverToken(token))
    }

    fn unregister_change_observer(&self, token: ObserverToken) {
        self.inner.lock().unwrap().observers.remove(&token.0);
    }
}
