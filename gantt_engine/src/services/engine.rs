//! Facade composing the layout components for one timeline view.
//!
//! The engine owns the zoom registry, the label catalog, the row tracker and
//! the tooltip and bar settings. A host drives it with zoom/range requests and
//! scroll events; every call is synchronous and returns plain data.

use std::sync::Arc;

use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::core::{
    HeaderPeriod, LayoutError, LayoutResult, Tier, TooltipRequest, TooltipResult,
    DEFAULT_HIDDEN_THRESHOLD,
};
use crate::time::TimeScale;

use super::bars::{BarGeometry, TaskBar, TaskBarLayout};
use super::header::HeaderPeriodGenerator;
use super::labels::{FormatCatalog, StaticResolver};
use super::row_alignment::RowAlignmentTracker;
use super::tooltip::ViewportTooltipCalculator;
use super::zoom_registry::ZoomLevelRegistry;

/// Header rows for one zoom/range request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderLayout {
    /// Level actually used (the default level when `fallback` is set).
    pub level_id: String,
    /// `true` when the requested level was unknown.
    pub fallback: bool,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub day_width: f64,
    pub primary: Vec<HeaderPeriod>,
    pub secondary: Vec<HeaderPeriod>,
    pub primary_collapsed: bool,
    pub total_width: f64,
}

impl HeaderLayout {
    /// Scale matching the header rows, origin at `start`.
    pub fn scale(&self) -> TimeScale {
        TimeScale::new(self.start, self.day_width)
    }
}

pub struct TimelineEngine {
    registry: ZoomLevelRegistry,
    catalog: FormatCatalog,
    week_start: Weekday,
    rows: RowAlignmentTracker,
    tooltip: ViewportTooltipCalculator,
    tooltip_tier: Tier,
    threshold: f64,
    bars: TaskBarLayout,
}

impl std::fmt::Debug for TimelineEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineEngine")
            .field("levels", &self.registry.levels().len())
            .field("language", &self.catalog.active_language())
            .field("week_start", &self.week_start)
            .field("rows", &self.rows.snapshot().len())
            .field("tooltip_tier", &self.tooltip_tier)
            .finish()
    }
}

impl TimelineEngine {
    pub fn new(registry: ZoomLevelRegistry, catalog: FormatCatalog, week_start: Weekday) -> Self {
        Self {
            registry,
            catalog,
            week_start,
            rows: RowAlignmentTracker::default(),
            tooltip: ViewportTooltipCalculator::default(),
            tooltip_tier: Tier::Primary,
            threshold: DEFAULT_HIDDEN_THRESHOLD,
            bars: TaskBarLayout::default(),
        }
    }

    /// Builds an engine from a validated configuration.
    pub fn from_config(config: &EngineConfig) -> LayoutResult<Self> {
        config.validate()?;
        let registry = config.registry()?;
        let week_start = config.week_start()?;

        let mut catalog = FormatCatalog::english();
        let language = config.header.language.as_str();
        if !config.header.formats.is_empty() {
            let resolver = config
                .header
                .formats
                .iter()
                .fold(StaticResolver::english(), |r, (key, pattern)| {
                    r.with(key.clone(), pattern.clone())
                });
            catalog.register(language, Arc::new(resolver));
        }
        if language != catalog.active_language() && !catalog.set_language(language) {
            return Err(LayoutError::Configuration(format!(
                "No format patterns for language '{}'",
                language
            )));
        }

        let mut engine = Self::new(registry, catalog, week_start);
        engine.rows =
            RowAlignmentTracker::new(config.rows.header_height, config.rows.default_row_height);
        engine.tooltip = ViewportTooltipCalculator::new(
            config.tooltip.left_arrow.clone(),
            config.tooltip.right_arrow.clone(),
        );
        engine.tooltip_tier = config.tooltip.tier;
        engine.threshold = config.tooltip.threshold;
        engine.bars = TaskBarLayout::new(config.bars.min_bar_width);
        Ok(engine)
    }

    pub fn registry(&self) -> &ZoomLevelRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &FormatCatalog {
        &self.catalog
    }

    /// Mutable catalog access, e.g. to register languages or subscribe.
    /// Header layouts always read the catalog's active language.
    pub fn catalog_mut(&mut self) -> &mut FormatCatalog {
        &mut self.catalog
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn rows(&self) -> &RowAlignmentTracker {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut RowAlignmentTracker {
        &mut self.rows
    }

    /// Switches the label language; later header layouts use it.
    pub fn set_language(&mut self, language: &str) -> bool {
        self.catalog.set_language(language)
    }

    /// Generator bound to the active language and the registry's width floor.
    fn generator(&self) -> HeaderPeriodGenerator {
        HeaderPeriodGenerator::new(self.catalog.formatter(self.week_start))
            .with_min_day_width(self.registry.min_day_width())
    }

    /// Header rows for `level_id` at zoom `factor` over `[start, end]`.
    ///
    /// An unknown level renders with the default level and sets `fallback`.
    /// An inverted range yields empty rows.
    pub fn header_layout(
        &self,
        level_id: &str,
        factor: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> HeaderLayout {
        let lookup = self.registry.lookup(level_id);
        let config = lookup.config;
        let day_width = self.registry.effective_day_width(&config.id, factor);
        let tiers = self.generator().generate(start, end, day_width, &config.pattern);

        HeaderLayout {
            level_id: config.id.clone(),
            fallback: lookup.fallback,
            start,
            end,
            day_width: tiers.day_width,
            primary: tiers.primary,
            secondary: tiers.secondary,
            primary_collapsed: tiers.primary_collapsed,
            total_width: tiers.total_width,
        }
    }

    /// Header layout for the finest level that shows `[start, end]` within
    /// `viewport_width` at factor 1.0.
    pub fn fit_layout(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        viewport_width: f64,
    ) -> HeaderLayout {
        let days = (end - start).num_days() + 1;
        let level_id = self.registry.fit_level(days, viewport_width).id.clone();
        self.header_layout(&level_id, 1.0, start, end)
    }

    /// Request carrying the configured hidden-fraction threshold.
    pub fn tooltip_request(&self, scroll_offset: f64, viewport_width: f64) -> TooltipRequest {
        TooltipRequest::new(scroll_offset, viewport_width).with_threshold(self.threshold)
    }

    /// Edge tooltips over the configured header row. The secondary row is
    /// used when the primary row is collapsed.
    pub fn tooltip(&self, layout: &HeaderLayout, request: &TooltipRequest) -> TooltipResult {
        let periods = match self.tooltip_tier {
            Tier::Primary if !layout.primary_collapsed && !layout.primary.is_empty() => {
                &layout.primary
            }
            _ => &layout.secondary,
        };
        self.tooltip.calculate(request, periods)
    }

    /// Places task bars on the current rows using the layout's scale.
    pub fn bar_layout(&self, layout: &HeaderLayout, bars: &[TaskBar]) -> Vec<BarGeometry> {
        self.bars.layout(bars, &layout.scale(), self.rows.snapshot())
    }
}

impl Default for TimelineEngine {
    fn default() -> Self {
        Self::new(ZoomLevelRegistry::builtin(), FormatCatalog::english(), Weekday::Mon)
    }
}
