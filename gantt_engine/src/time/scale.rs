//! Date ↔ pixel conversion for the timeline surface.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calendar::days_between;

/// Horizontal scale of the timeline: `origin` sits at x = 0 and every day is
/// `day_width` pixels wide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    pub origin: NaiveDate,
    pub day_width: f64,
}

impl TimeScale {
    pub fn new(origin: NaiveDate, day_width: f64) -> Self {
        Self { origin, day_width }
    }

    /// Left edge of `date` in timeline pixels.
    pub fn date_to_x(&self, date: NaiveDate) -> f64 {
        days_between(self.origin, date) as f64 * self.day_width
    }

    /// Day under pixel `x` (floor), `None` if the scale is degenerate or the
    /// date falls outside the representable calendar.
    pub fn x_to_date(&self, x: f64) -> Option<NaiveDate> {
        if !(self.day_width > 0.0) || !x.is_finite() {
            return None;
        }
        let days = (x / self.day_width).floor();
        if days >= 0.0 {
            self.origin.checked_add_days(Days::new(days as u64))
        } else {
            self.origin.checked_sub_days(Days::new((-days) as u64))
        }
    }

    /// First and last day (inclusive) at least partially inside the viewport.
    pub fn visible_range(
        &self,
        scroll_offset: f64,
        viewport_width: f64,
    ) -> Option<(NaiveDate, NaiveDate)> {
        if !(viewport_width > 0.0) {
            return None;
        }
        let first = self.x_to_date(scroll_offset)?;
        // The right edge is exclusive: a day starting exactly there is not visible.
        let right = scroll_offset + viewport_width;
        let mut last = self.x_to_date(right)?;
        if self.date_to_x(last) >= right && last > first {
            last = last.pred_opt()?;
        }
        Some((first, last))
    }

    /// Total width of the inclusive range `[start, end]`.
    pub fn span_width(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        (days_between(start, end) + 1).max(0) as f64 * self.day_width
    }
}
