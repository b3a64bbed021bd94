//! Logical <-> presentation index translation
//!
//! The grid may show a synthetic camera-capture cell at presentation
//! index 0. Everything below the synchronizer thinks in logical indices
//! (positions in the library snapshot); everything at the grid boundary
//! thinks in presentation indices. This mapping is the single place the
//! offset lives, instead of ad hoc arithmetic at call sites.

/// Pure, stateless index mapping parameterized by the camera-cell flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexTranslation {
    camera_cell: bool,
}

impl IndexTranslation {
    /// Mapping for a grid with or without the leading camera cell
    #[must_use]
    pub const fn new(camera_cell: bool) -> Self {
        Self { camera_cell }
    }

    /// Whether a presentation index is the reserved camera cell
    ///
    /// The reserved position never translates to a logical index;
    /// selection is refused there and taps route to camera capture.
    #[must_use]
    pub const fn is_reserved(&self, presentation: usize) -> bool {
        self.camera_cell && presentation == 0
    }

    /// Map a presentation index to its logical index
    ///
    /// Returns `None` for the reserved camera cell.
    #[must_use]
    pub const fn to_logical(&self, presentation: usize) -> Option<usize> {
        if self.camera_cell {
            match presentation.checked_sub(1) {
                Some(logical) => Some(logical),
                None => None,
            }
        } else {
            Some(presentation)
        }
    }

    /// Map a logical index to its presentation index
    #[must_use]
    pub const fn to_presentation(&self, logical: usize) -> usize {
        if self.camera_cell { logical + 1 } else { logical }
    }

    /// Translate a batch of logical indices for the grid
    #[must_use]
    pub fn to_presentation_all(&self, logical: &[usize]) -> Vec<usize> {
        logical.iter().map(|&i| self.to_presentation(i)).collect()
    }
}
