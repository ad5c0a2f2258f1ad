//! Zoom level lookup and effective day width computation.
//!
//! The registry is built once from a table of [`ZoomLevelConfig`] records and
//! handed to consumers by reference. It never changes after construction, so
//! tests can build alternate tables without touching shared state.

use std::collections::HashMap;

use serde::Serialize;

use crate::core::{LayoutError, LayoutResult};
use crate::models::{builtin_levels, ZoomLevelConfig, DEFAULT_LEVEL_ID, MIN_DAY_WIDTH};

/// Result of a lenient lookup.
///
/// `fallback` is `true` when the requested id was unknown and the default
/// level was returned instead.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ZoomLookup<'a> {
    pub config: &'a ZoomLevelConfig,
    pub fallback: bool,
}

/// Read-only table of zoom levels, finest (widest day) first.
#[derive(Debug, Clone)]
pub struct ZoomLevelRegistry {
    levels: Vec<ZoomLevelConfig>,
    index: HashMap<String, usize>,
    default_index: usize,
    min_day_width: f64,
}

impl ZoomLevelRegistry {
    /// Builds a registry from `levels`.
    ///
    /// # Arguments
    /// * `levels` - Zoom table, in any order
    /// * `default_id` - Level returned for unknown ids; must be in `levels`
    /// * `min_day_width` - Global floor for effective day widths
    ///
    /// # Returns
    /// * `Err(LayoutError::Configuration)` for an empty table, an invalid
    ///   record, a duplicate id, an unknown default or a non-positive floor
    pub fn new(
        levels: Vec<ZoomLevelConfig>,
        default_id: &str,
        min_day_width: f64,
    ) -> LayoutResult<Self> {
        if levels.is_empty() {
            return Err(LayoutError::Configuration(
                "Zoom table must contain at least one level".to_string(),
            ));
        }
        if !(min_day_width.is_finite() && min_day_width > 0.0) {
            return Err(LayoutError::Configuration(format!(
                "min_day_width must be positive, got {}",
                min_day_width
            )));
        }
        for level in &levels {
            level.validate().map_err(LayoutError::Configuration)?;
        }

        let registry = Self::build(levels, default_id, min_day_width);
        if registry.index.len() != registry.levels.len() {
            return Err(LayoutError::Configuration(
                "Zoom table contains duplicate level ids".to_string(),
            ));
        }
        if !registry.index.contains_key(default_id) {
            return Err(LayoutError::Configuration(format!(
                "Default zoom level '{}' is not in the zoom table",
                default_id
            )));
        }
        Ok(registry)
    }

    /// Registry over the built-in table with the default floor.
    pub fn builtin() -> Self {
        Self::build(builtin_levels(), DEFAULT_LEVEL_ID, MIN_DAY_WIDTH)
    }

    fn build(mut levels: Vec<ZoomLevelConfig>, default_id: &str, min_day_width: f64) -> Self {
        levels.sort_by(|a, b| b.base_day_width.total_cmp(&a.base_day_width));
        let index: HashMap<String, usize> = levels
            .iter()
            .enumerate()
            .map(|(i, level)| (level.id.clone(), i))
            .collect();
        let default_index = index.get(default_id).copied().unwrap_or(0);
        Self {
            levels,
            index,
            default_index,
            min_day_width,
        }
    }

    /// Looks up `level_id`, falling back to the default level.
    pub fn lookup(&self, level_id: &str) -> ZoomLookup<'_> {
        match self.index.get(level_id) {
            Some(&i) => ZoomLookup {
                config: &self.levels[i],
                fallback: false,
            },
            None => {
                log::warn!(
                    "Unknown zoom level '{}', falling back to '{}'",
                    level_id,
                    self.default_config().id
                );
                ZoomLookup {
                    config: self.default_config(),
                    fallback: true,
                }
            }
        }
    }

    /// Configuration for `level_id`; unknown ids yield the default level.
    pub fn get_config(&self, level_id: &str) -> &ZoomLevelConfig {
        self.lookup(level_id).config
    }

    /// Strict lookup for callers that prefer failing loudly.
    pub fn try_get(&self, level_id: &str) -> LayoutResult<&ZoomLevelConfig> {
        self.index
            .get(level_id)
            .map(|&i| &self.levels[i])
            .ok_or_else(|| LayoutError::ConfigurationNotFound(level_id.to_string()))
    }

    pub fn contains(&self, level_id: &str) -> bool {
        self.index.contains_key(level_id)
    }

    pub fn default_config(&self) -> &ZoomLevelConfig {
        &self.levels[self.default_index]
    }

    pub fn levels(&self) -> &[ZoomLevelConfig] {
        &self.levels
    }

    pub fn min_day_width(&self) -> f64 {
        self.min_day_width
    }

    /// Clamps `factor` into the level's bounds. Non-finite factors count as 1.0.
    pub fn clamp_factor(&self, level_id: &str, factor: f64) -> f64 {
        clamp_factor_for(self.get_config(level_id), factor)
    }

    /// `base_day_width × clamp(factor)`, never below the global floor.
    pub fn effective_day_width(&self, level_id: &str, factor: f64) -> f64 {
        let config = self.get_config(level_id);
        let width = config.base_day_width * clamp_factor_for(config, factor);
        self.floor_day_width(width)
    }

    /// Applies the global floor to an arbitrary day width.
    pub fn floor_day_width(&self, width: f64) -> f64 {
        if width.is_finite() && width >= self.min_day_width {
            width
        } else {
            if !(width.is_finite() && width > 0.0) {
                log::warn!(
                    "Degenerate day width {}, clamping to {}",
                    width,
                    self.min_day_width
                );
            }
            self.min_day_width
        }
    }

    /// Next level with a wider day, if any.
    pub fn finer(&self, level_id: &str) -> Option<&ZoomLevelConfig> {
        let i = *self.index.get(level_id)?;
        i.checked_sub(1).map(|j| &self.levels[j])
    }

    /// Next level with a narrower day, if any.
    pub fn coarser(&self, level_id: &str) -> Option<&ZoomLevelConfig> {
        let i = *self.index.get(level_id)?;
        self.levels.get(i + 1)
    }

    /// Finest level whose full range fits into `viewport_width` at factor 1.0.
    /// Falls back to the coarsest level when nothing fits.
    pub fn fit_level(&self, total_days: i64, viewport_width: f64) -> &ZoomLevelConfig {
        let days = total_days.max(1) as f64;
        self.levels
            .iter()
            .find(|level| days * level.base_day_width <= viewport_width)
            .unwrap_or_else(|| &self.levels[self.levels.len() - 1])
    }
}

impl Default for ZoomLevelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn clamp_factor_for(config: &ZoomLevelConfig, factor: f64) -> f64 {
    let factor = if factor.is_finite() { factor } else { 1.0 };
    factor.clamp(config.min_factor, config.max_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HeaderPattern;
    use crate::time::TimeUnit;

    fn level(id: &str, width: f64) -> ZoomLevelConfig {
        ZoomLevelConfig::new(id, width, HeaderPattern::new(TimeUnit::Month, TimeUnit::Day))
    }

    #[test]
    fn test_unknown_id_falls_back_to_default() {
        let registry = ZoomLevelRegistry::builtin();
        let lookup = registry.lookup("no-such-level");
        assert!(lookup.fallback);
        assert_eq!(lookup.config.id, DEFAULT_LEVEL_ID);
        assert_eq!(registry.get_config("no-such-level").id, DEFAULT_LEVEL_ID);
        assert!(matches!(
            registry.try_get("no-such-level"),
            Err(LayoutError::ConfigurationNotFound(_))
        ));
    }

    #[test]
    fn test_known_id_is_not_a_fallback() {
        let registry = ZoomLevelRegistry::builtin();
        let lookup = registry.lookup("day");
        assert!(!lookup.fallback);
        assert_eq!(lookup.config.base_day_width, 25.0);
    }

    #[test]
    fn test_clamp_factor() {
        let registry = ZoomLevelRegistry::builtin();
        assert_eq!(registry.clamp_factor("day", 0.1), 0.5);
        assert_eq!(registry.clamp_factor("day", 10.0), 3.0);
        assert_eq!(registry.clamp_factor("day", 1.5), 1.5);
        assert_eq!(registry.clamp_factor("day", f64::NAN), 1.0);
        assert_eq!(registry.clamp_factor("day", f64::INFINITY), 1.0);
    }

    #[test]
    fn test_effective_day_width_applies_floor() {
        let tiny = level("tiny", 1.0).with_factor_bounds(0.01, 1.0);
        let registry = ZoomLevelRegistry::new(vec![tiny], "tiny", 3.0).unwrap();
        assert_eq!(registry.effective_day_width("tiny", 0.01), 3.0);
        assert_eq!(registry.floor_day_width(-5.0), 3.0);
        assert_eq!(registry.floor_day_width(f64::NAN), 3.0);

        let builtin = ZoomLevelRegistry::builtin();
        assert_eq!(builtin.effective_day_width("day", 2.0), 50.0);
    }

    #[test]
    fn test_constructor_rejects_bad_tables() {
        assert!(ZoomLevelRegistry::new(vec![], "x", 1.0).is_err());
        assert!(ZoomLevelRegistry::new(vec![level("a", 1.0)], "b", 1.0).is_err());
        assert!(ZoomLevelRegistry::new(vec![level("a", 1.0), level("a", 2.0)], "a", 1.0).is_err());
        assert!(ZoomLevelRegistry::new(vec![level("a", 1.0)], "a", 0.0).is_err());
        assert!(ZoomLevelRegistry::new(vec![level("a", -1.0)], "a", 1.0).is_err());
    }

    #[test]
    fn test_finer_and_coarser() {
        let registry = ZoomLevelRegistry::builtin();
        assert_eq!(registry.finer("day").map(|l| l.id.as_str()), Some("day-detail"));
        assert_eq!(registry.coarser("day").map(|l| l.id.as_str()), Some("week"));
        assert!(registry.finer("day-detail").is_none());
        assert!(registry.coarser("decade").is_none());
        assert!(registry.finer("unknown").is_none());
    }

    #[test]
    fn test_fit_level() {
        let registry = ZoomLevelRegistry::builtin();
        // 31 days at 25 px = 775 px fits 800 px but 40 px/day does not
        assert_eq!(registry.fit_level(31, 800.0).id, "day");
        assert_eq!(registry.fit_level(365, 1100.0).id, "quarter");
        assert_eq!(registry.fit_level(1_000_000, 100.0).id, "decade");
    }
}
