//! Task bar placement on the timeline.
//!
//! Horizontal geometry comes from the [`TimeScale`], vertical geometry from
//! the row snapshot published by the row tracker, so bars stay aligned with
//! the task list without computing offsets of their own.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::time::TimeScale;

use super::row_alignment::RowLayout;

pub const DEFAULT_MIN_BAR_WIDTH: f64 = 2.0;

/// Date span of one task, `end` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskBar {
    pub entity_id: EntityId,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TaskBar {
    pub fn new(entity_id: EntityId, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            entity_id,
            start,
            end,
        }
    }
}

/// Pixel rectangle of a task bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarGeometry {
    pub entity_id: EntityId,
    pub row_index: usize,
    pub x: f64,
    pub width: f64,
    pub top: f64,
    pub height: f64,
    /// `true` when the bar was widened to the minimum width.
    pub overflow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskBarLayout {
    pub min_bar_width: f64,
}

impl TaskBarLayout {
    pub fn new(min_bar_width: f64) -> Self {
        let min_bar_width = if min_bar_width.is_finite() && min_bar_width >= 0.0 {
            min_bar_width
        } else {
            DEFAULT_MIN_BAR_WIDTH
        };
        Self { min_bar_width }
    }

    /// Places `bars` on the rows of `rows`.
    ///
    /// Bars whose entity has no row, or whose row is hidden, are skipped.
    /// An inverted date span is treated as a single day at `start`.
    pub fn layout(
        &self,
        bars: &[TaskBar],
        scale: &TimeScale,
        rows: &RowLayout,
    ) -> Vec<BarGeometry> {
        let row_of: HashMap<EntityId, usize> = rows
            .rows
            .iter()
            .map(|row| (row.entity_id, row.index))
            .collect();

        bars.iter()
            .filter_map(|bar| {
                let Some(&row_index) = row_of.get(&bar.entity_id) else {
                    log::debug!("Bar for entity {} has no row", bar.entity_id);
                    return None;
                };
                let row = &rows.rows[row_index];
                if !row.visible {
                    return None;
                }

                let end = if bar.end < bar.start {
                    log::warn!(
                        "Bar for entity {} ends before it starts ({} < {})",
                        bar.entity_id,
                        bar.end,
                        bar.start
                    );
                    bar.start
                } else {
                    bar.end
                };
                let natural = scale.span_width(bar.start, end);
                let overflow = natural < self.min_bar_width;

                Some(BarGeometry {
                    entity_id: bar.entity_id,
                    row_index,
                    x: scale.date_to_x(bar.start),
                    width: natural.max(self.min_bar_width),
                    top: row.top,
                    height: row.height,
                    overflow,
                })
            })
            .collect()
    }
}

impl Default for TaskBarLayout {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_BAR_WIDTH)
    }
}
