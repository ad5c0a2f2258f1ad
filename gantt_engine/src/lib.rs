//! Gantt timeline layout engine.
//!
//! Computes the geometry a Gantt view needs, independent of any rendering
//! toolkit:
//!
//! - zoom levels and effective day widths ([`ZoomLevelRegistry`])
//! - two-tier calendar headers ([`HeaderPeriodGenerator`])
//! - row offsets shared by the task list and the timeline ([`RowAlignmentTracker`])
//! - edge tooltips for partly scrolled-out periods ([`ViewportTooltipCalculator`])
//! - task bar rectangles ([`TaskBarLayout`])
//!
//! [`TimelineEngine`] wires these together from an [`EngineConfig`].

pub mod config;
pub mod core;
pub mod models;
pub mod services;
pub mod time;

pub use crate::config::EngineConfig;
pub use crate::core::{
    EntityId, HeaderPeriod, HierarchicalEntity, LayoutError, LayoutResult, RowMetrics, TaskNode,
    Tier, TooltipRequest, TooltipResult,
};
pub use crate::models::{HeaderPattern, ZoomLevelConfig};
pub use crate::services::{
    BarGeometry, FormatCatalog, HeaderLayout, HeaderPeriodGenerator, HeaderTiers, LabelFormatter,
    RowAlignmentTracker, RowLayout, StaticResolver, TaskBar, TaskBarLayout, TimelineEngine,
    ViewportTooltipCalculator, ZoomLevelRegistry,
};
pub use crate::time::{CalendarUnit, TimeScale, TimeUnit};
