//! Selection core
//!
//! The data side of the picker: selectable collections, the album list,
//! index translation for the synthetic camera cell, change notification,
//! and the live query source. Everything here is UI-free; the session
//! layer wires these to a [`crate::ui::PhotoGrid`].

pub mod albums;
pub mod collection;
pub mod notify;
pub mod source;
pub mod translate;

pub use albums::AlbumCollection;
pub use collection::{DeselectOutcome, SelectOutcome, SelectableCollection, SelectionMode};
pub use notify::{ChangeNotifier, ObserverId, PendingChange, SelectionEvent};
pub use source::{AppliedChange, LibraryQuerySource};
pub use translate::IndexTranslation;
