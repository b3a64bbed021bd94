//! Configuration module for photopick
//!
//! The recognized picker options: selection cap, marker character,
//! selection chrome colors, the camera cell, and the size-class to
//! column-count mapping. Scalar options can be loaded from a TOML file
//! in the user's config directory; the column provider and the initial
//! selection seed are programmatic only.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::library::types::{Asset, MediaFilter, SortKey};
use crate::ui::types::{HighlightStyle, LabelStyle, SizeClass};

/// Maps the presenting surface's size classes to a grid column count
#[derive(Clone)]
pub struct ColumnProvider(Arc<dyn Fn(SizeClass, SizeClass) -> usize + Send + Sync>);

impl ColumnProvider {
    /// Wrap a custom mapping function
    #[must_use]
    pub fn new(f: impl Fn(SizeClass, SizeClass) -> usize + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Column count for a (vertical, horizontal) size-class pair
    #[must_use]
    pub fn columns(&self, vertical: SizeClass, horizontal: SizeClass) -> usize {
        (self.0)(vertical, horizontal)
    }
}

impl Default for ColumnProvider {
    fn default() -> Self {
        Self::new(|_, horizontal| match horizontal {
            SizeClass::Compact => 4,
            SizeClass::Regular => 7,
        })
    }
}

impl fmt::Debug for ColumnProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColumnProvider(..)")
    }
}

const fn default_max_selections() -> usize {
    1
}

const fn default_camera_cell() -> bool {
    true
}

/// Picker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Maximum number of simultaneous selections (must be positive)
    #[serde(default = "default_max_selections")]
    pub max_selections: usize,

    /// Marker character shown on selected cells instead of ordinals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_marker: Option<char>,

    /// Whether the grid leads with the synthetic camera-capture cell
    #[serde(default = "default_camera_cell")]
    pub camera_cell: bool,

    /// Snapshot sort order
    #[serde(default)]
    pub sort: SortKey,

    /// Media-kind filter for snapshots
    #[serde(default)]
    pub media: MediaFilter,

    /// Selection highlight colors
    #[serde(default)]
    pub highlight: HighlightStyle,

    /// Badge label text attributes
    #[serde(default)]
    pub label: LabelStyle,

    /// Size-class to column-count mapping
    #[serde(skip)]
    pub columns: ColumnProvider,

    /// Assets pre-selected when the session opens (and returned verbatim
    /// on cancel)
    #[serde(skip)]
    pub initial_selection: Vec<Asset>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            max_selections: default_max_selections(),
            selection_marker: None,
            camera_cell: default_camera_cell(),
            sort: SortKey::default(),
            media: MediaFilter::default(),
            highlight: HighlightStyle::default(),
            label: LabelStyle::default(),
            columns: ColumnProvider::default(),
            initial_selection: Vec::new(),
        }
    }
}

impl PickerConfig {
    /// Set the selection cap
    #[must_use]
    pub const fn with_max_selections(mut self, max: usize) -> Self {
        self.max_selections = max;
        self
    }

    /// Replace ordinal numbering with a fixed marker character
    #[must_use]
    pub const fn with_selection_marker(mut self, marker: char) -> Self {
        self.selection_marker = Some(marker);
        self
    }

    /// Enable or disable the synthetic camera cell
    #[must_use]
    pub const fn with_camera_cell(mut self, enabled: bool) -> Self {
        self.camera_cell = enabled;
        self
    }

    /// Set a custom column mapping
    #[must_use]
    pub fn with_columns(mut self, f: impl Fn(SizeClass, SizeClass) -> usize + Send + Sync + 'static) -> Self {
        self.columns = ColumnProvider::new(f);
        self
    }

    /// Pre-select assets when the session opens
    #[must_use]
    pub fn with_initial_selection(mut self, assets: Vec<Asset>) -> Self {
        self.initial_selection = assets;
        self
    }

    /// Set the selection highlight colors
    #[must_use]
    pub const fn with_highlight(mut self, highlight: HighlightStyle) -> Self {
        self.highlight = highlight;
        self
    }

    /// Set the badge label attributes
    #[must_use]
    pub const fn with_label(mut self, label: LabelStyle) -> Self {
        self.label = label;
        self
    }

    /// Validate option combinations
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `max_selections` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_selections == 0 {
            return Err(ConfigError::Message(
                "max_selections must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("photopick").join("config.toml"))
    }

    /// Load configuration from file, creating defaults if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific TOML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed, or if
    /// the loaded options fail validation.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Toml))
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the
    /// configuration cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(&config_path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}
