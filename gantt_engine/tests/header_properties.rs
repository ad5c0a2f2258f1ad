//! Property tests for header generation.
//!
//! These tests ensure that, for any range, day width and zoom level:
//! 1. Both rows cover exactly `(end - start + 1) × day_width` pixels
//! 2. Periods are ordered, gap-free and non-overlapping
//! 3. Offsets are running sums of the emitted widths
//! 4. The collapse decision matches the average-width rule

use chrono::{Days, NaiveDate};
use gantt_engine::models::builtin_levels;
use gantt_engine::services::{should_collapse_primary, HeaderPeriodGenerator};
use gantt_engine::{HeaderPeriod, ZoomLevelConfig};
use proptest::prelude::*;

// ==================== Helper Functions ====================

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
}

fn check_row(
    row: &[HeaderPeriod],
    start: NaiveDate,
    end: NaiveDate,
    day_width: f64,
) -> Result<(), TestCaseError> {
    prop_assert!(!row.is_empty());
    prop_assert_eq!(row[0].start, start);
    prop_assert_eq!(row[row.len() - 1].end, end);
    prop_assert_eq!(row[0].x_offset, 0.0);

    for period in row {
        prop_assert!(period.start <= period.end);
        prop_assert!(period.period_start <= period.start);
        prop_assert!(period.width > 0.0);
        prop_assert!((period.width - period.days() as f64 * day_width).abs() < 1e-9);
    }
    for pair in row.windows(2) {
        prop_assert_eq!(pair[1].start, pair[0].end.succ_opt().unwrap());
        prop_assert_eq!(pair[1].x_offset, pair[0].x_offset + pair[0].width);
    }
    Ok(())
}

fn level_strategy() -> impl Strategy<Value = ZoomLevelConfig> {
    prop::sample::select(builtin_levels())
}

// ==================== Properties ====================

proptest! {
    #[test]
    fn prop_rows_cover_range_exactly(
        offset in 0u64..15_000,
        span in 0u64..1_500,
        day_width in 0.1..60.0f64,
        level in level_strategy(),
    ) {
        let start = base_date().checked_add_days(Days::new(offset)).unwrap();
        let end = start.checked_add_days(Days::new(span)).unwrap();
        let generator = HeaderPeriodGenerator::default();
        let tiers = generator.generate(start, end, day_width, &level.pattern);

        let expected = (span + 1) as f64 * day_width;
        let tolerance = 1e-9 * expected.max(1.0);

        check_row(&tiers.secondary, start, end, day_width)?;
        let secondary_sum: f64 = tiers.secondary.iter().map(|p| p.width).sum();
        prop_assert!((secondary_sum - expected).abs() < tolerance);
        prop_assert!((tiers.total_width - expected).abs() < tolerance);

        prop_assert_eq!(
            tiers.primary_collapsed,
            should_collapse_primary(start, end, day_width, &level.pattern)
        );
        if tiers.primary_collapsed {
            prop_assert!(tiers.primary.is_empty());
        } else {
            check_row(&tiers.primary, start, end, day_width)?;
            let primary_sum: f64 = tiers.primary.iter().map(|p| p.width).sum();
            prop_assert!((primary_sum - expected).abs() < tolerance);
        }
    }

    #[test]
    fn prop_primary_boundaries_align_with_secondary(
        offset in 0u64..15_000,
        span in 0u64..800,
        level in level_strategy(),
    ) {
        let start = base_date().checked_add_days(Days::new(offset)).unwrap();
        let end = start.checked_add_days(Days::new(span)).unwrap();
        let pattern = level.pattern.with_min_primary_width(0.0);
        let tiers = HeaderPeriodGenerator::default().generate(start, end, 1.0, &pattern);

        // Every primary boundary is also a secondary boundary, except for
        // week rows whose weeks straddle month and year boundaries.
        if pattern.secondary != gantt_engine::TimeUnit::Week {
            for period in &tiers.primary {
                prop_assert!(tiers.secondary.iter().any(|s| s.start == period.start));
            }
        }
    }

    #[test]
    fn prop_inverted_range_is_empty(
        offset in 1u64..15_000,
        back in 1u64..400,
        day_width in 0.1..60.0f64,
        level in level_strategy(),
    ) {
        let end = base_date().checked_add_days(Days::new(offset)).unwrap();
        let start = end.checked_add_days(Days::new(back)).unwrap();
        let generator = HeaderPeriodGenerator::default();
        let tiers = generator.generate(start, end, day_width, &level.pattern);
        prop_assert!(tiers.is_empty());
    }
}
