//! Calendar arithmetic and the date/pixel scale.

pub mod calendar;
pub mod scale;


pub use calendar::{
    calendar_unit, days_between, decade_of, quarter_of, week_number, CalendarUnit, DayUnit,
    DecadeUnit, MonthUnit, QuarterUnit, TimeUnit, WeekUnit, YearUnit,
};
pub use scale::TimeScale;
