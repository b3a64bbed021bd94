//! Host callback handles
//!
//! The four optional closures the host hands the picker at construction.
//! They live here, on the session facade, not scattered across view
//! objects. Every handle is optional; an absent handle is silently
//! skipped. Select/deselect fire at most once per gesture; cancel and
//! finish once per session, never both.

use std::fmt;
use std::sync::Arc;

use crate::library::types::Asset;

type AssetHandler = Arc<dyn Fn(Asset) + Send + Sync>;
type ResultHandler = Arc<dyn Fn(Vec<Asset>) + Send + Sync>;

/// Optional host callbacks, built fluently
#[derive(Clone, Default)]
pub struct HostCallbacks {
    pub(crate) on_select: Option<AssetHandler>,
    pub(crate) on_deselect: Option<AssetHandler>,
    pub(crate) on_cancel: Option<ResultHandler>,
    pub(crate) on_finish: Option<ResultHandler>,
}

impl HostCallbacks {
    /// No callbacks at all
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after each user-driven selection
    #[must_use]
    pub fn with_on_select(mut self, handler: impl Fn(Asset) + Send + Sync + 'static) -> Self {
        self.on_select = Some(Arc::new(handler));
        self
    }

    /// Called after each user-driven deselection
    #[must_use]
    pub fn with_on_deselect(mut self, handler: impl Fn(Asset) + Send + Sync + 'static) -> Self {
        self.on_deselect = Some(Arc::new(handler));
        self
    }

    /// Called once if the session is cancelled, with the original seed
    #[must_use]
    pub fn with_on_cancel(mut self, handler: impl Fn(Vec<Asset>) + Send + Sync + 'static) -> Self {
        self.on_cancel = Some(Arc::new(handler));
        self
    }

    /// Called once if the session finishes, with the ordered selections
    #[must_use]
    pub fn with_on_finish(mut self, handler: impl Fn(Vec<Asset>) + Send + Sync + 'static) -> Self {
        self.on_finish = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for HostCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCallbacks")
            .field("on_select", &self.on_select.is_some())
            .field("on_deselect", &self.on_deselect.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .field("on_finish", &self.on_finish.is_some())
            .finish()
    }
}
