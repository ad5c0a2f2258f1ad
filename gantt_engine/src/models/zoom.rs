//! Zoom level records.
//!
//! A zoom level is plain data: an id, a base day width and the pair of calendar
//! units used for the two header rows. The built-in table below is what the
//! registry uses when no configuration file overrides it.

use serde::{Deserialize, Serialize};

use crate::time::TimeUnit;

/// Level used when a caller asks for an id the registry does not know.
pub const DEFAULT_LEVEL_ID: &str = "month";

/// Global floor for effective day widths, in pixels per day.
pub const MIN_DAY_WIDTH: f64 = 0.1;

pub const DEFAULT_MIN_FACTOR: f64 = 0.5;
pub const DEFAULT_MAX_FACTOR: f64 = 3.0;

/// Primary/secondary unit pairing for the two header rows.
///
/// `min_primary_width` is the average primary cell width (pixels) below which
/// the primary row is suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaderPattern {
    pub primary: TimeUnit,
    pub secondary: TimeUnit,
    #[serde(default = "default_min_primary_width")]
    pub min_primary_width: f64,
}

fn default_min_primary_width() -> f64 {
    40.0
}

impl HeaderPattern {
    pub fn new(primary: TimeUnit, secondary: TimeUnit) -> Self {
        Self {
            primary,
            secondary,
            min_primary_width: default_min_primary_width(),
        }
    }

    pub fn with_min_primary_width(mut self, width: f64) -> Self {
        self.min_primary_width = width;
        self
    }
}

/// One entry of the zoom table. Immutable once the registry is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomLevelConfig {
    pub id: String,
    pub base_day_width: f64,
    #[serde(flatten)]
    pub pattern: HeaderPattern,
    #[serde(default = "default_min_factor")]
    pub min_factor: f64,
    #[serde(default = "default_max_factor")]
    pub max_factor: f64,
    #[serde(default)]
    pub description: String,
}

fn default_min_factor() -> f64 {
    DEFAULT_MIN_FACTOR
}

fn default_max_factor() -> f64 {
    DEFAULT_MAX_FACTOR
}

impl ZoomLevelConfig {
    pub fn new(id: impl Into<String>, base_day_width: f64, pattern: HeaderPattern) -> Self {
        Self {
            id: id.into(),
            base_day_width,
            pattern,
            min_factor: DEFAULT_MIN_FACTOR,
            max_factor: DEFAULT_MAX_FACTOR,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_factor_bounds(mut self, min_factor: f64, max_factor: f64) -> Self {
        self.min_factor = min_factor;
        self.max_factor = max_factor;
        self
    }

    /// Checks the record on its own (the registry checks the table as a whole).
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Zoom level id must not be empty".to_string());
        }
        if !(self.base_day_width.is_finite() && self.base_day_width > 0.0) {
            return Err(format!(
                "Zoom level '{}' has invalid base_day_width {}",
                self.id, self.base_day_width
            ));
        }
        if !(self.min_factor.is_finite() && self.max_factor.is_finite())
            || self.min_factor <= 0.0
            || self.min_factor > self.max_factor
        {
            return Err(format!(
                "Zoom level '{}' has invalid factor bounds [{}, {}]",
                self.id, self.min_factor, self.max_factor
            ));
        }
        if self.pattern.primary < self.pattern.secondary {
            return Err(format!(
                "Zoom level '{}' has primary unit {} finer than secondary unit {}",
                self.id, self.pattern.primary, self.pattern.secondary
            ));
        }
        Ok(())
    }
}

/// The built-in zoom table, finest first.
pub fn builtin_levels() -> Vec<ZoomLevelConfig> {
    vec![
        ZoomLevelConfig::new(
            "day-detail",
            40.0,
            HeaderPattern::new(TimeUnit::Week, TimeUnit::Day).with_min_primary_width(60.0),
        )
        .with_description("Days grouped by week"),
        ZoomLevelConfig::new("day", 25.0, HeaderPattern::new(TimeUnit::Month, TimeUnit::Day))
            .with_description("Days grouped by month"),
        ZoomLevelConfig::new("week", 12.0, HeaderPattern::new(TimeUnit::Month, TimeUnit::Week))
            .with_description("Weeks grouped by month"),
        ZoomLevelConfig::new(
            "month",
            5.0,
            HeaderPattern::new(TimeUnit::Quarter, TimeUnit::Month),
        )
        .with_description("Months grouped by quarter"),
        ZoomLevelConfig::new(
            "quarter",
            3.0,
            HeaderPattern::new(TimeUnit::Year, TimeUnit::Quarter),
        )
        .with_description("Quarters grouped by year"),
        ZoomLevelConfig::new("year", 1.0, HeaderPattern::new(TimeUnit::Year, TimeUnit::Month))
            .with_description("Months grouped by year"),
        ZoomLevelConfig::new(
            "decade",
            0.33,
            HeaderPattern::new(TimeUnit::Decade, TimeUnit::Year).with_min_primary_width(80.0),
        )
        .with_description("Years grouped by decade"),
    ]
}
