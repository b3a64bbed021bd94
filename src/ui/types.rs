//! Common types for the grid abstraction layer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size class of one axis of the presenting surface
///
/// Mirrors the compact/regular split mobile toolkits use to describe
/// available space. The column provider maps a (vertical, horizontal)
/// pair of these to a column count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    /// Constrained axis (phone width, split-screen pane)
    #[default]
    Compact,
    /// Unconstrained axis (tablet, full-screen landscape)
    Regular,
}

/// A batch of presentation-index mutations to apply to the grid
///
/// Indices are presentation indices (camera-cell offset already applied).
/// Removals refer to positions before the change, insertions to positions
/// after it, matching the contract of batch-update APIs on grid views.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridUpdate {
    /// Positions gaining a new cell
    pub inserted: Vec<usize>,
    /// Positions losing their cell
    pub removed: Vec<usize>,
    /// Positions whose cell content changed in place
    pub changed: Vec<usize>,
}

impl GridUpdate {
    /// True when the update would not touch any cell
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Selection badge shown on a selected cell
///
/// Carries either the ordinal position in selection order ("1", "2", ...)
/// or the configured marker character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    /// Text rendered inside the badge
    pub label: String,
}

impl Badge {
    /// Badge showing a 1-based ordinal
    #[must_use]
    pub fn ordinal(n: usize) -> Self {
        Self {
            label: n.to_string(),
        }
    }

    /// Badge showing a fixed marker character
    #[must_use]
    pub fn marker(c: char) -> Self {
        Self {
            label: c.to_string(),
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// State of the commit ("done") control
///
/// The host renders the button text itself; the engine only reports
/// whether committing is currently possible and how many assets it
/// would deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitControl {
    /// Whether the control accepts activation
    pub enabled: bool,
    /// Number of assets a commit would deliver
    pub count: usize,
}

/// Choice made on the authorization-denied alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertChoice {
    /// Dismiss without granting access
    Cancel,
    /// Jump to the system settings pane for this app
    OpenSettings,
}

/// 8-bit RGBA color for selection chrome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a color from channel values
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const CLEAR: Self = Self::new(0, 0, 0, 0);
}

/// Colors used to highlight a selected cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightStyle {
    /// Fill behind the badge
    pub fill: Rgba,
    /// Stroke around the selected cell
    pub stroke: Rgba,
    /// Drop shadow under the badge
    pub shadow: Rgba,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            // System-blue fill with a white ring, matching the stock pickers.
            fill: Rgba::new(0, 122, 255, 255),
            stroke: Rgba::WHITE,
            shadow: Rgba::new(0, 0, 0, 96),
        }
    }
}

/// Text attributes for the badge label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    /// Label text color
    pub color: Rgba,
    /// Point size of the label font
    pub size_pt: f32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            size_pt: 14.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_ordinal_renders_number() {
        assert_eq!(Badge::ordinal(3).label, "3");
        assert_eq!(Badge::ordinal(3).to_string(), "3");
    }

    #[test]
    fn test_badge_marker_renders_character() {
        assert_eq!(Badge::marker('✓').label, "✓");
    }

    #[test]
    fn test_empty_grid_update() {
        assert!(GridUpdate::default().is_empty());
        let update = GridUpdate {
            inserted: vec![2],
            ..GridUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
