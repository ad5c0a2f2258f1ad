//! Edge tooltips for header periods that are mostly scrolled out of view.
//!
//! For each viewport edge the calculator finds the period straddling it
//! (strict containment, so a period that ends exactly on the edge does not
//! count) and shows its label when more than `threshold` of the period is
//! hidden while some of it is still on screen.
//!
//! Inputs arrive during scroll and resize bursts and may be transiently
//! inconsistent. [`ViewportTooltipCalculator::calculate`] never fails: any
//! inconsistency yields an empty result and a `debug!` line.

use serde::{Deserialize, Serialize};

use crate::core::{HeaderPeriod, LayoutError, LayoutResult, TooltipRequest, TooltipResult};

pub const DEFAULT_LEFT_ARROW: &str = "◀ ";
pub const DEFAULT_RIGHT_ARROW: &str = " ▶";

/// Arrow glyphs wrapped around edge labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportTooltipCalculator {
    /// Prepended to left-edge labels.
    pub left_arrow: String,
    /// Appended to right-edge labels.
    pub right_arrow: String,
}

impl ViewportTooltipCalculator {
    pub fn new(left_arrow: impl Into<String>, right_arrow: impl Into<String>) -> Self {
        Self {
            left_arrow: left_arrow.into(),
            right_arrow: right_arrow.into(),
        }
    }

    /// Tooltip labels for the current scroll state, empty on bad input.
    pub fn calculate(&self, request: &TooltipRequest, periods: &[HeaderPeriod]) -> TooltipResult {
        match self.try_calculate(request, periods) {
            Ok(result) => result,
            Err(e) => {
                log::debug!("Tooltip suppressed: {}", e);
                TooltipResult::empty()
            }
        }
    }

    /// Strict variant reporting why the input was rejected.
    ///
    /// ## Arguments
    /// * `request` - Scroll offset, viewport width and hidden-fraction threshold
    /// * `periods` - One header row, ordered left to right
    ///
    /// ## Returns
    /// `Err(LayoutError::TooltipInputInconsistency)` for an empty row,
    /// non-finite values, a non-positive viewport, a scroll offset outside
    /// `[0, total_width]`, a threshold outside `[0, 1]` or non-monotonic periods.
    pub fn try_calculate(
        &self,
        request: &TooltipRequest,
        periods: &[HeaderPeriod],
    ) -> LayoutResult<TooltipResult> {
        validate(request, periods)?;

        let left_edge = request.scroll_offset;
        let right_edge = request.scroll_offset + request.viewport_width;

        let left = straddling(periods, left_edge)
            .filter(|p| {
                let hidden = left_edge - p.x_offset;
                let visible = p.x_end() - left_edge;
                majority_hidden(p.width, hidden, visible, request.threshold)
            })
            .map(|p| format!("{}{}", self.left_arrow, p.label))
            .unwrap_or_default();

        let right = straddling(periods, right_edge)
            .filter(|p| {
                let hidden = p.x_end() - right_edge;
                let visible = right_edge - p.x_offset;
                majority_hidden(p.width, hidden, visible, request.threshold)
            })
            .map(|p| format!("{}{}", p.label, self.right_arrow))
            .unwrap_or_default();

        Ok(TooltipResult { left, right })
    }
}

impl Default for ViewportTooltipCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_LEFT_ARROW, DEFAULT_RIGHT_ARROW)
    }
}

fn majority_hidden(width: f64, hidden: f64, visible: f64, threshold: f64) -> bool {
    hidden > width * threshold && visible > 0.0
}

/// Period with `x_offset < edge < x_offset + width`.
fn straddling(periods: &[HeaderPeriod], edge: f64) -> Option<&HeaderPeriod> {
    let pos = periods.partition_point(|p| p.x_end() <= edge);
    periods
        .get(pos)
        .filter(|p| p.x_offset < edge && edge < p.x_end())
}

fn inconsistent(msg: String) -> LayoutResult<()> {
    Err(LayoutError::TooltipInputInconsistency(msg))
}

fn validate(request: &TooltipRequest, periods: &[HeaderPeriod]) -> LayoutResult<()> {
    if periods.is_empty() {
        return inconsistent("empty period list".to_string());
    }
    let TooltipRequest {
        scroll_offset,
        viewport_width,
        threshold,
    } = *request;
    if !(scroll_offset.is_finite() && viewport_width.is_finite() && threshold.is_finite()) {
        return inconsistent(format!(
            "non-finite request (scroll {}, viewport {}, threshold {})",
            scroll_offset, viewport_width, threshold
        ));
    }
    if viewport_width <= 0.0 {
        return inconsistent(format!("viewport width {}", viewport_width));
    }
    if !(0.0..=1.0).contains(&threshold) {
        return inconsistent(format!("threshold {} outside [0, 1]", threshold));
    }

    for p in periods {
        if !(p.x_offset.is_finite() && p.width.is_finite()) || p.width < 0.0 {
            return inconsistent(format!(
                "period {} has offset {} and width {}",
                p.label, p.x_offset, p.width
            ));
        }
    }
    for pair in periods.windows(2) {
        if pair[1].start <= pair[0].end || pair[1].x_offset < pair[0].x_offset {
            return inconsistent(format!(
                "periods {} and {} are out of order",
                pair[0].label, pair[1].label
            ));
        }
    }

    let total = periods[periods.len() - 1].x_end();
    if scroll_offset < 0.0 || scroll_offset > total {
        return inconsistent(format!(
            "scroll offset {} outside [0, {}]",
            scroll_offset, total
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Tier;
    use crate::time::TimeUnit;
    use chrono::NaiveDate;

    fn period(label: &str, day: u32, days: u32, x_offset: f64, width: f64) -> HeaderPeriod {
        let start = NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, day + days - 1).unwrap();
        HeaderPeriod {
            start,
            end,
            period_start: start,
            width,
            x_offset,
            label: label.to_string(),
            tier: Tier::Primary,
            unit: TimeUnit::Day,
            clipped: false,
        }
    }

    /// Three 100 px periods: A [0,100), B [100,200), C [200,300)
    fn row() -> Vec<HeaderPeriod> {
        vec![
            period("A", 1, 1, 0.0, 100.0),
            period("B", 2, 1, 100.0, 100.0),
            period("C", 3, 1, 200.0, 100.0),
        ]
    }

    #[test]
    fn test_exactly_half_hidden_shows_nothing() {
        let calc = ViewportTooltipCalculator::default();
        let result = calc.calculate(&TooltipRequest::new(50.0, 100.0), &row());
        assert!(result.is_empty());
    }

    #[test]
    fn test_more_than_half_hidden_shows_both_edges() {
        let calc = ViewportTooltipCalculator::default();
        let result = calc.calculate(&TooltipRequest::new(51.0, 100.0), &row());
        assert_eq!(result.left, "◀ A");
        // right edge at 151: B is 49 hidden, 51 visible
        assert_eq!(result.right, "");

        let result = calc.calculate(&TooltipRequest::new(60.0, 80.0), &row());
        assert_eq!(result.left, "◀ A");
        assert_eq!(result.right, "B ▶");
    }

    #[test]
    fn test_edge_on_boundary_is_not_straddling() {
        let calc = ViewportTooltipCalculator::default();
        let result = calc.calculate(&TooltipRequest::new(100.0, 100.0), &row());
        assert!(result.is_empty());
    }

    #[test]
    fn test_threshold_is_respected() {
        let calc = ViewportTooltipCalculator::default();
        let request = TooltipRequest::new(30.0, 200.0).with_threshold(0.25);
        let result = calc.calculate(&request, &row());
        assert_eq!(result.left, "◀ A");
        assert_eq!(result.right, "C ▶");
    }

    #[test]
    fn test_custom_arrows() {
        let calc = ViewportTooltipCalculator::new("< ", " >");
        let result = calc.calculate(&TooltipRequest::new(80.0, 40.0), &row());
        assert_eq!(result.left, "< A");
        assert_eq!(result.right, "B >");
    }

    #[test]
    fn test_malformed_input_degrades_to_empty() {
        let calc = ViewportTooltipCalculator::default();
        let periods = row();

        assert!(calc.calculate(&TooltipRequest::new(60.0, 80.0), &[]).is_empty());
        assert!(calc.calculate(&TooltipRequest::new(f64::NAN, 80.0), &periods).is_empty());
        assert!(calc.calculate(&TooltipRequest::new(60.0, 0.0), &periods).is_empty());
        assert!(calc.calculate(&TooltipRequest::new(-1.0, 80.0), &periods).is_empty());
        assert!(calc.calculate(&TooltipRequest::new(301.0, 80.0), &periods).is_empty());
        assert!(calc
            .calculate(&TooltipRequest::new(60.0, 80.0).with_threshold(1.5), &periods)
            .is_empty());

        let reversed: Vec<HeaderPeriod> = periods.iter().rev().cloned().collect();
        assert!(matches!(
            calc.try_calculate(&TooltipRequest::new(60.0, 80.0), &reversed),
            Err(LayoutError::TooltipInputInconsistency(_))
        ));
    }
}
