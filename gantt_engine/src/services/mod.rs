//! Layout services.
//!
//! This module contains the components that turn configuration, date ranges,
//! entity hierarchies and scroll state into renderable geometry. Each service
//! is a plain value with synchronous methods; [`engine::TimelineEngine`]
//! composes them for a host.

pub mod bars;
pub mod engine;
pub mod header;
pub mod labels;
pub mod row_alignment;
pub mod tooltip;
pub mod zoom_registry;


pub use bars::{BarGeometry, TaskBar, TaskBarLayout};
pub use engine::{HeaderLayout, TimelineEngine};
pub use header::{
    average_primary_width, should_collapse_primary, HeaderPeriodGenerator, HeaderTiers,
};
pub use labels::{
    FormatCatalog, FormatResolver, LabelFormatter, LanguageChange, SharedResolver, StaticResolver,
};
pub use row_alignment::{RowAlignmentTracker, RowLayout};
pub use tooltip::ViewportTooltipCalculator;
pub use zoom_registry::{ZoomLevelRegistry, ZoomLookup};
