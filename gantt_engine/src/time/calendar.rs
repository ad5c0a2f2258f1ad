//! Calendar-aware period arithmetic.
//!
//! Every header tier walks the calendar through a [`CalendarUnit`] strategy:
//! `period_start` truncates a date to the start of its period and `increment`
//! returns the (exclusive) start of the following period. Month, quarter, year
//! and decade boundaries come from real calendar arithmetic, so month lengths
//! of 28 to 31 days and leap years never drift over long ranges.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Calendar granularity of a header tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Day,
    Week,
    Month,
    Quarter,
    Year,
    Decade,
}

impl TimeUnit {
    /// Approximate length in days, used only for estimates (never for
    /// boundaries).
    pub fn nominal_days(self) -> f64 {
        match self {
            TimeUnit::Day => 1.0,
            TimeUnit::Week => 7.0,
            TimeUnit::Month => 30.0,
            TimeUnit::Quarter => 91.0,
            TimeUnit::Year => 365.0,
            TimeUnit::Decade => 3652.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Quarter => "quarter",
            TimeUnit::Year => "year",
            TimeUnit::Decade => "decade",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" | "days" => Ok(TimeUnit::Day),
            "week" | "weeks" => Ok(TimeUnit::Week),
            "month" | "months" => Ok(TimeUnit::Month),
            "quarter" | "quarters" => Ok(TimeUnit::Quarter),
            "year" | "years" => Ok(TimeUnit::Year),
            "decade" | "decades" => Ok(TimeUnit::Decade),
            other => Err(format!("Unknown time unit: {}", other)),
        }
    }
}

/// Period arithmetic for one calendar unit.
pub trait CalendarUnit {
    fn unit(&self) -> TimeUnit;

    /// Start of the period containing `date`.
    fn period_start(&self, date: NaiveDate) -> NaiveDate;

    /// Start of the period following the one starting at `period_start`.
    /// `None` once the next boundary is outside chrono's representable range.
    fn increment(&self, period_start: NaiveDate) -> Option<NaiveDate>;

    fn nominal_days(&self) -> f64 {
        self.unit().nominal_days()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DayUnit;

impl CalendarUnit for DayUnit {
    fn unit(&self) -> TimeUnit {
        TimeUnit::Day
    }

    fn period_start(&self, date: NaiveDate) -> NaiveDate {
        date
    }

    fn increment(&self, period_start: NaiveDate) -> Option<NaiveDate> {
        period_start.succ_opt()
    }
}

/// Weeks beginning on a configurable weekday.
#[derive(Debug, Clone, Copy)]
pub struct WeekUnit {
    pub week_start: Weekday,
}

impl WeekUnit {
    pub fn new(week_start: Weekday) -> Self {
        Self { week_start }
    }
}

impl Default for WeekUnit {
    fn default() -> Self {
        Self::new(Weekday::Mon)
    }
}

impl CalendarUnit for WeekUnit {
    fn unit(&self) -> TimeUnit {
        TimeUnit::Week
    }

    fn period_start(&self, date: NaiveDate) -> NaiveDate {
        let back = days_since_week_start(date, self.week_start);
        date.checked_sub_days(Days::new(back as u64))
            .unwrap_or(NaiveDate::MIN)
    }

    fn increment(&self, period_start: NaiveDate) -> Option<NaiveDate> {
        period_start.checked_add_days(Days::new(7))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MonthUnit;

impl CalendarUnit for MonthUnit {
    fn unit(&self) -> TimeUnit {
        TimeUnit::Month
    }

    fn period_start(&self, date: NaiveDate) -> NaiveDate {
        date.with_day(1).unwrap_or(date)
    }

    fn increment(&self, period_start: NaiveDate) -> Option<NaiveDate> {
        period_start.checked_add_months(Months::new(1))
    }
}

/// Calendar quarters: Jan–Mar, Apr–Jun, Jul–Sep, Oct–Dec.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuarterUnit;

impl CalendarUnit for QuarterUnit {
    fn unit(&self) -> TimeUnit {
        TimeUnit::Quarter
    }

    fn period_start(&self, date: NaiveDate) -> NaiveDate {
        let first_month = (quarter_of(date) - 1) * 3 + 1;
        NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date)
    }

    fn increment(&self, period_start: NaiveDate) -> Option<NaiveDate> {
        period_start.checked_add_months(Months::new(3))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct YearUnit;

impl CalendarUnit for YearUnit {
    fn unit(&self) -> TimeUnit {
        TimeUnit::Year
    }

    fn period_start(&self, date: NaiveDate) -> NaiveDate {
        NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
    }

    fn increment(&self, period_start: NaiveDate) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(period_start.year() + 1, 1, 1)
    }
}

/// Decades aligned on years divisible by ten (2020–2029).
#[derive(Debug, Clone, Copy, Default)]
pub struct DecadeUnit;

impl CalendarUnit for DecadeUnit {
    fn unit(&self) -> TimeUnit {
        TimeUnit::Decade
    }

    fn period_start(&self, date: NaiveDate) -> NaiveDate {
        NaiveDate::from_ymd_opt(decade_of(date), 1, 1)
            .or_else(|| NaiveDate::from_ymd_opt(date.year(), 1, 1))
            .unwrap_or(date)
    }

    fn increment(&self, period_start: NaiveDate) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(decade_of(period_start) + 10, 1, 1)
    }
}

/// Returns the strategy for `unit`. `week_start` only affects weeks.
pub fn calendar_unit(unit: TimeUnit, week_start: Weekday) -> Box<dyn CalendarUnit> {
    match unit {
        TimeUnit::Day => Box::new(DayUnit),
        TimeUnit::Week => Box::new(WeekUnit::new(week_start)),
        TimeUnit::Month => Box::new(MonthUnit),
        TimeUnit::Quarter => Box::new(QuarterUnit),
        TimeUnit::Year => Box::new(YearUnit),
        TimeUnit::Decade => Box::new(DecadeUnit),
    }
}

/// Whole days from `from` to `to` (negative if `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Quarter number, 1 to 4.
pub fn quarter_of(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// First year of the decade containing `date`.
pub fn decade_of(date: NaiveDate) -> i32 {
    date.year().div_euclid(10) * 10
}

fn days_since_week_start(date: NaiveDate, week_start: Weekday) -> u32 {
    (date.weekday().num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7
}

/// Week number and week-numbering year of `date`.
///
/// Monday weeks follow ISO 8601. For any other start day a week belongs to the
/// year containing its last day, and the week containing January 1st is
/// week 1 of that year.
pub fn week_number(date: NaiveDate, week_start: Weekday) -> (u32, i32) {
    if week_start == Weekday::Mon {
        let iso = date.iso_week();
        return (iso.week(), iso.year());
    }
    let unit = WeekUnit::new(week_start);
    let start = unit.period_start(date);
    let year = start
        .checked_add_days(Days::new(6))
        .map_or(start.year(), |last| last.year());
    let first = NaiveDate::from_ymd_opt(year, 1, 1)
        .map_or(start, |jan_first| unit.period_start(jan_first));
    (days_between(first, start) as u32 / 7 + 1, year)
}
