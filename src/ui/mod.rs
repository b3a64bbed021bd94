//! UI abstraction layer
//!
//! This module provides a backend-agnostic interface for the photo grid
//! and for blocking authorization alerts. The abstraction keeps the
//! synchronizer free of any concrete toolkit: a host binds [`PhotoGrid`]
//! to its collection view, while tests use the recording mocks.
//!
//! # Core Traits
//!
//! - **`PhotoGrid`** - the scrollable grid of photo cells (plus the
//!   synthetic camera cell at presentation index 0 when enabled)
//! - **`AlertPresenter`** - blocking modal for authorization recovery
//!
//! All grid indices crossing this boundary are presentation indices;
//! translation from logical indices happens in the synchronizer before
//! any call lands here.

pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

pub use error::{Result, UiError};
pub use mock::{GridOp, MockAlerts, MockGrid};
pub use traits::{AlertPresenter, PhotoGrid};
pub use types::{
    AlertChoice, Badge, CommitControl, GridUpdate, HighlightStyle, LabelStyle, Rgba, SizeClass,
};
