//! Header period generation for the timeline surface.
//!
//! Each header row is produced by walking the calendar from the start of the
//! period containing the first visible day until the last visible day. Cells
//! are emitted left to right and their x-offsets are a running sum of the
//! widths already emitted, which keeps adjacent cells seamless even at
//! fractional day widths.
//!
//! ## Edge cases
//! - Range ends inside a period: the first and last cell are clipped to the
//!   visible days and flagged `clipped`
//! - `end < start`: both rows are empty
//! - Zero, negative or non-finite day width: clamped to the global floor
//! - Average primary cell narrower than the pattern minimum: primary row
//!   suppressed

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{HeaderPeriod, LayoutError, LayoutResult, Tier};
use crate::models::{HeaderPattern, MIN_DAY_WIDTH};
use crate::time::{calendar_unit, days_between, CalendarUnit};

use super::labels::LabelFormatter;

/// Both header rows for one range and scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderTiers {
    pub primary: Vec<HeaderPeriod>,
    pub secondary: Vec<HeaderPeriod>,
    /// `true` when the primary row was suppressed by the collapse rule.
    pub primary_collapsed: bool,
    pub day_width: f64,
    pub total_width: f64,
}

impl HeaderTiers {
    fn empty(day_width: f64) -> Self {
        Self {
            primary: Vec::new(),
            secondary: Vec::new(),
            primary_collapsed: false,
            day_width,
            total_width: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }
}

/// Builds header rows; pure apart from diagnostics logging.
#[derive(Debug, Clone)]
pub struct HeaderPeriodGenerator {
    formatter: LabelFormatter,
    min_day_width: f64,
}

impl HeaderPeriodGenerator {
    pub fn new(formatter: LabelFormatter) -> Self {
        Self {
            formatter,
            min_day_width: MIN_DAY_WIDTH,
        }
    }

    pub fn with_min_day_width(mut self, min_day_width: f64) -> Self {
        if min_day_width.is_finite() && min_day_width > 0.0 {
            self.min_day_width = min_day_width;
        }
        self
    }

    pub fn formatter(&self) -> &LabelFormatter {
        &self.formatter
    }

    /// Generates both rows, degrading to empty rows for an inverted range.
    pub fn generate(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        day_width: f64,
        pattern: &HeaderPattern,
    ) -> HeaderTiers {
        match self.try_generate(start, end, day_width, pattern) {
            Ok(tiers) => tiers,
            Err(e) => {
                log::warn!("Header generation skipped: {}", e);
                HeaderTiers::empty(self.sanitize_day_width(day_width))
            }
        }
    }

    /// Strict variant of [`generate`](Self::generate).
    ///
    /// ## Returns
    /// `Err(LayoutError::InvalidRange)` when `end < start`. Degenerate day
    /// widths are clamped, not reported.
    pub fn try_generate(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        day_width: f64,
        pattern: &HeaderPattern,
    ) -> LayoutResult<HeaderTiers> {
        if end < start {
            return Err(LayoutError::InvalidRange { start, end });
        }
        let day_width = self.sanitize_day_width(day_width);
        let week_start = self.formatter.week_start();

        let secondary_unit = calendar_unit(pattern.secondary, week_start);
        let secondary =
            self.generate_tier(start, end, day_width, secondary_unit.as_ref(), Tier::Secondary);

        let primary_collapsed = should_collapse_primary(start, end, day_width, pattern);
        let primary = if primary_collapsed {
            log::debug!(
                "Primary {} row collapsed at {} px/day",
                pattern.primary,
                day_width
            );
            Vec::new()
        } else {
            let primary_unit = calendar_unit(pattern.primary, week_start);
            self.generate_tier(start, end, day_width, primary_unit.as_ref(), Tier::Primary)
        };

        let total_width = secondary.iter().map(|p| p.width).sum();
        Ok(HeaderTiers {
            primary,
            secondary,
            primary_collapsed,
            day_width,
            total_width,
        })
    }

    /// Generates one row covering `[start, end]` for `unit`.
    ///
    /// ## Arguments
    /// * `start` - First visible day (timeline origin, x = 0)
    /// * `end` - Last visible day, inclusive
    /// * `day_width` - Pixels per day, already sanitized
    /// * `unit` - Calendar strategy of the row
    /// * `tier` - Row the cells are tagged with
    pub fn generate_tier(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        day_width: f64,
        unit: &dyn CalendarUnit,
        tier: Tier,
    ) -> Vec<HeaderPeriod> {
        let mut periods = Vec::new();
        if end < start {
            return periods;
        }

        let mut current = unit.period_start(start);
        let mut running_offset = 0.0;

        while current <= end {
            let next = unit.increment(current);
            let visible_start = current.max(start);
            let visible_end = match next.and_then(|n| n.pred_opt()) {
                Some(last_day) => last_day.min(end),
                None => end,
            };

            let visible_days = days_between(visible_start, visible_end) + 1;
            let calendar_days = next.map(|n| days_between(current, n));
            let width = visible_days as f64 * day_width;

            periods.push(HeaderPeriod {
                start: visible_start,
                end: visible_end,
                period_start: current,
                width,
                x_offset: running_offset,
                label: self.formatter.format(current, unit.unit(), tier),
                tier,
                unit: unit.unit(),
                clipped: calendar_days != Some(visible_days),
            });
            running_offset += width;

            match next {
                Some(n) if n > current => current = n,
                _ => break,
            }
        }

        periods
    }

    fn sanitize_day_width(&self, day_width: f64) -> f64 {
        if !(day_width.is_finite() && day_width > 0.0) {
            log::warn!(
                "{}, clamping to {}",
                LayoutError::ArithmeticDegeneracy(day_width),
                self.min_day_width
            );
            return self.min_day_width;
        }
        day_width.max(self.min_day_width)
    }
}

impl Default for HeaderPeriodGenerator {
    fn default() -> Self {
        Self::new(LabelFormatter::english())
    }
}

/// Average primary cell width estimated from the unit's nominal length.
pub fn average_primary_width(
    start: NaiveDate,
    end: NaiveDate,
    day_width: f64,
    pattern: &HeaderPattern,
) -> f64 {
    let total_days = (days_between(start, end) + 1).max(0) as f64;
    let total_width = total_days * day_width;
    let estimated_count = total_days / pattern.primary.nominal_days();
    if estimated_count <= 0.0 {
        return 0.0;
    }
    total_width / estimated_count
}

/// Collapse rule: strictly below the pattern minimum suppresses the primary row.
pub fn should_collapse_primary(
    start: NaiveDate,
    end: NaiveDate,
    day_width: f64,
    pattern: &HeaderPattern,
) -> bool {
    average_primary_width(start, end, day_width, pattern) < pattern.min_primary_width
}
