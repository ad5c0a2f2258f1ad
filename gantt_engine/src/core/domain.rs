//! Shared value types for header layout, row alignment and tooltips.
//!
//! These are the records handed to the two rendering surfaces: header periods
//! for the timeline, row metrics for both the task list and the timeline, and
//! tooltip results for the edge labels.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::TimeUnit;

/// Header row a period belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Outer, coarser row (e.g. months above days).
    Primary,
    /// Inner, finer row.
    Secondary,
}

/// A contiguous calendar-aligned span rendered as one header cell.
///
/// `start`/`end` are the visible bounds of the cell (inclusive), which differ
/// from the calendar bounds only for the first and last cell of a tier when the
/// requested range cuts through a period. `period_start` is always the calendar
/// start and is what the label is formatted from.
///
/// # Fields
///
/// * `start` - First visible day of the period
/// * `end` - Last visible day of the period (inclusive)
/// * `period_start` - Calendar start of the period
/// * `width` - Pixel width of the visible span
/// * `x_offset` - Running sum of the widths of all previous periods in the tier
/// * `label` - Display label
/// * `tier` - Header row
/// * `unit` - Calendar unit of the tier
/// * `clipped` - `true` when the cell is narrower than its calendar span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub period_start: NaiveDate,
    pub width: f64,
    pub x_offset: f64,
    pub label: String,
    pub tier: Tier,
    pub unit: TimeUnit,
    pub clipped: bool,
}

impl HeaderPeriod {
    /// Right edge of the cell in timeline pixels.
    pub fn x_end(&self) -> f64 {
        self.x_offset + self.width
    }

    /// Number of visible days in the cell.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Stable identifier of an entity in the hierarchical task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hierarchical entity supplied by the task-management collaborator.
///
/// Entities are handed over in display order (pre-order: every parent before
/// its children).
pub trait HierarchicalEntity {
    fn entity_id(&self) -> EntityId;

    fn parent_id(&self) -> Option<EntityId>;

    /// Expand flag stored on the entity itself. An explicit expanded-state map
    /// passed to the tracker takes precedence.
    fn is_expanded(&self) -> bool {
        true
    }

    /// Row height override; `None` uses the tracker's default row height.
    fn row_height(&self) -> Option<f64> {
        None
    }
}

/// Plain entity record, enough to drive the tracker without a task model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskNode {
    pub id: EntityId,
    pub parent: Option<EntityId>,
    #[serde(default = "default_expanded")]
    pub expanded: bool,
    #[serde(default)]
    pub height: Option<f64>,
}

fn default_expanded() -> bool {
    true
}

impl TaskNode {
    /// Creates an expanded root node.
    pub fn root(id: u64) -> Self {
        Self {
            id: EntityId(id),
            parent: None,
            expanded: true,
            height: None,
        }
    }

    /// Creates an expanded node under `parent`.
    pub fn child(id: u64, parent: u64) -> Self {
        Self {
            id: EntityId(id),
            parent: Some(EntityId(parent)),
            expanded: true,
            height: None,
        }
    }

    pub fn collapsed(mut self) -> Self {
        self.expanded = false;
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }
}

impl HierarchicalEntity for TaskNode {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn parent_id(&self) -> Option<EntityId> {
        self.parent
    }

    fn is_expanded(&self) -> bool {
        self.expanded
    }

    fn row_height(&self) -> Option<f64> {
        self.height
    }
}

/// Vertical geometry of one row, shared by the task list and the timeline.
///
/// Hidden rows keep their nominal `height` but contribute nothing to the
/// layout: their `top` equals the top of the next visible row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowMetrics {
    pub index: usize,
    pub entity_id: EntityId,
    pub height: f64,
    pub top: f64,
    pub visible: bool,
    pub expanded: bool,
    pub depth: usize,
    pub parent_index: Option<usize>,
    pub has_children: bool,
}

impl RowMetrics {
    /// Height the row occupies in the layout.
    pub fn rendered_height(&self) -> f64 {
        if self.visible {
            self.height
        } else {
            0.0
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.rendered_height()
    }
}

/// Default fraction of a period that must be hidden before a tooltip shows.
pub const DEFAULT_HIDDEN_THRESHOLD: f64 = 0.5;

/// Scroll state of the timeline viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipRequest {
    pub scroll_offset: f64,
    pub viewport_width: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    DEFAULT_HIDDEN_THRESHOLD
}

impl TooltipRequest {
    pub fn new(scroll_offset: f64, viewport_width: f64) -> Self {
        Self {
            scroll_offset,
            viewport_width,
            threshold: DEFAULT_HIDDEN_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Directional labels for majority-hidden edge periods. Empty strings mean no
/// tooltip on that edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipResult {
    pub left: String,
    pub right: String,
}

impl TooltipResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}
