//! Engine configuration file support.
//!
//! This module reads the zoom table, row sizes, header and tooltip settings
//! from a TOML file. Every section is optional; a missing section or key takes
//! the built-in default.
//!
//! ```toml
//! [zoom]
//! default_level = "week"
//! min_day_width = 0.5
//!
//! [[zoom.levels]]
//! id = "week"
//! base_day_width = 12.0
//! primary = "month"
//! secondary = "week"
//!
//! [header]
//! week_start = "sunday"
//! language = "en"
//!
//! [tooltip]
//! threshold = 0.5
//! tier = "primary"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Weekday;

use crate::core::{LayoutError, LayoutResult, Tier, DEFAULT_HIDDEN_THRESHOLD};
use crate::models::{builtin_levels, ZoomLevelConfig, DEFAULT_LEVEL_ID, MIN_DAY_WIDTH};
use crate::services::bars::DEFAULT_MIN_BAR_WIDTH;
use crate::services::row_alignment::{DEFAULT_HEADER_HEIGHT, DEFAULT_ROW_HEIGHT};
use crate::services::tooltip::{DEFAULT_LEFT_ARROW, DEFAULT_RIGHT_ARROW};
use crate::services::ZoomLevelRegistry;

/// Engine configuration from file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub zoom: ZoomSettings,
    #[serde(default)]
    pub rows: RowSettings,
    #[serde(default)]
    pub header: HeaderSettings,
    #[serde(default)]
    pub tooltip: TooltipSettings,
    #[serde(default)]
    pub bars: BarSettings,
}

/// Zoom table settings. An empty `levels` list selects the built-in table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomSettings {
    #[serde(default = "default_level")]
    pub default_level: String,
    #[serde(default = "default_min_day_width")]
    pub min_day_width: f64,
    #[serde(default)]
    pub levels: Vec<ZoomLevelConfig>,
}

/// Row geometry settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSettings {
    #[serde(default = "default_header_height")]
    pub header_height: f64,
    #[serde(default = "default_row_height")]
    pub default_row_height: f64,
}

/// Header label settings.
///
/// `formats` maps semantic keys (`date.month-year`, ...) to patterns that
/// override the English defaults for `language`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderSettings {
    #[serde(default = "default_week_start")]
    pub week_start: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub formats: BTreeMap<String, String>,
}

/// Edge tooltip settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipSettings {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_left_arrow")]
    pub left_arrow: String,
    #[serde(default = "default_right_arrow")]
    pub right_arrow: String,
    #[serde(default = "default_tier")]
    pub tier: Tier,
}

/// Task bar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSettings {
    #[serde(default = "default_min_bar_width")]
    pub min_bar_width: f64,
}

fn default_level() -> String {
    DEFAULT_LEVEL_ID.to_string()
}

fn default_min_day_width() -> f64 {
    MIN_DAY_WIDTH
}

fn default_header_height() -> f64 {
    DEFAULT_HEADER_HEIGHT
}

fn default_row_height() -> f64 {
    DEFAULT_ROW_HEIGHT
}

fn default_week_start() -> String {
    "monday".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_threshold() -> f64 {
    DEFAULT_HIDDEN_THRESHOLD
}

fn default_left_arrow() -> String {
    DEFAULT_LEFT_ARROW.to_string()
}

fn default_right_arrow() -> String {
    DEFAULT_RIGHT_ARROW.to_string()
}

fn default_tier() -> Tier {
    Tier::Primary
}

fn default_min_bar_width() -> f64 {
    DEFAULT_MIN_BAR_WIDTH
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            default_level: default_level(),
            min_day_width: default_min_day_width(),
            levels: Vec::new(),
        }
    }
}

impl Default for RowSettings {
    fn default() -> Self {
        Self {
            header_height: default_header_height(),
            default_row_height: default_row_height(),
        }
    }
}

impl Default for HeaderSettings {
    fn default() -> Self {
        Self {
            week_start: default_week_start(),
            language: default_language(),
            formats: BTreeMap::new(),
        }
    }
}

impl Default for TooltipSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            left_arrow: default_left_arrow(),
            right_arrow: default_right_arrow(),
            tier: default_tier(),
        }
    }
}

impl Default for BarSettings {
    fn default() -> Self {
        Self {
            min_bar_width: default_min_bar_width(),
        }
    }
}

impl EngineConfig {
    /// Load engine configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(EngineConfig)` if successful
    /// * `Err(LayoutError)` if the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> LayoutResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content).map_err(|e| {
            LayoutError::Configuration(format!("{}: {}", path.display(), e))
        })?;
        log::info!("Loaded engine configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// Parse errors name the offending key path (e.g. `zoom.levels[1].primary`).
    pub fn from_toml_str(content: &str) -> LayoutResult<Self> {
        let deserializer = toml::Deserializer::new(content);
        let config: EngineConfig = serde_path_to_error::deserialize(deserializer).map_err(|e| {
            LayoutError::Configuration(format!(
                "Failed to parse config at '{}': {}",
                e.path(),
                e.inner().message()
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load engine configuration from the default location.
    ///
    /// Searches for `gantt.toml` in:
    /// 1. Current directory
    /// 2. `gantt_engine/` directory
    /// 3. Parent directory
    ///
    /// # Returns
    /// * `Ok(EngineConfig)` if found and parsed successfully
    /// * `Err(LayoutError)` if no config file found or parse error
    pub fn from_default_location() -> LayoutResult<Self> {
        let search_paths = vec![
            PathBuf::from("gantt.toml"),
            PathBuf::from("gantt_engine/gantt.toml"),
            PathBuf::from("../gantt.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(LayoutError::Configuration(
            "No gantt.toml found in standard locations".to_string(),
        ))
    }

    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> LayoutResult<()> {
        self.week_start()?;
        self.registry()?;

        let rows = &self.rows;
        if !(rows.header_height.is_finite() && rows.header_height >= 0.0) {
            return Err(LayoutError::Configuration(format!(
                "rows.header_height must be non-negative, got {}",
                rows.header_height
            )));
        }
        if !(rows.default_row_height.is_finite() && rows.default_row_height > 0.0) {
            return Err(LayoutError::Configuration(format!(
                "rows.default_row_height must be positive, got {}",
                rows.default_row_height
            )));
        }
        if self.header.language != default_language() && self.header.formats.is_empty() {
            return Err(LayoutError::Configuration(format!(
                "header.language '{}' has no [header.formats] patterns",
                self.header.language
            )));
        }
        if !(0.0..=1.0).contains(&self.tooltip.threshold) {
            return Err(LayoutError::Configuration(format!(
                "tooltip.threshold must be within [0, 1], got {}",
                self.tooltip.threshold
            )));
        }
        if !(self.bars.min_bar_width.is_finite() && self.bars.min_bar_width >= 0.0) {
            return Err(LayoutError::Configuration(format!(
                "bars.min_bar_width must be non-negative, got {}",
                self.bars.min_bar_width
            )));
        }
        Ok(())
    }

    /// First day of the week for week rows and week numbers.
    pub fn week_start(&self) -> LayoutResult<Weekday> {
        Weekday::from_str(self.header.week_start.trim()).map_err(|_| {
            LayoutError::Configuration(format!(
                "Unknown header.week_start: {}",
                self.header.week_start
            ))
        })
    }

    /// Zoom table from `[[zoom.levels]]`, or the built-in table when empty.
    pub fn registry(&self) -> LayoutResult<ZoomLevelRegistry> {
        let levels = if self.zoom.levels.is_empty() {
            builtin_levels()
        } else {
            self.zoom.levels.clone()
        };
        ZoomLevelRegistry::new(levels, &self.zoom.default_level, self.zoom.min_day_width)
    }
}
