//! Inclusive date boundaries for the periods activity is aggregated over.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// Inclusive date range. Both ends belong to the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Period {
    Day,
    Week,
    Quarter,
}

impl Period {
    /// Boundaries of the period containing `anchor`. Weeks start on
    /// Monday and end on Sunday.
    pub fn bounds(&self, anchor: NaiveDate) -> DateRange {
        match self {
            Period::Day => DateRange {
                start: anchor,
                end: anchor,
            },
            Period::Week => {
                let monday =
                    anchor - Duration::days(anchor.weekday().num_days_from_monday() as i64);
                DateRange {
                    start: monday,
                    end: monday + Duration::days(6),
                }
            }
            Period::Quarter => {
                let first_month = ((anchor.month0() / 3) * 3) + 1;
                let start = NaiveDate::from_ymd_opt(anchor.year(), first_month, 1)
                    .unwrap_or(anchor);
                let (next_year, next_month) = if first_month + 3 > 12 {
                    (anchor.year() + 1, 1)
                } else {
                    (anchor.year(), first_month + 3)
                };
                let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
                    .unwrap_or(anchor)
                    - Duration::days(1);
                DateRange { start, end }
            }
        }
    }

    /// Boundaries of the period immediately before the one containing
    /// `anchor`. Used for period-over-period comparison.
    pub fn previous_bounds(&self, anchor: NaiveDate) -> DateRange {
        let current = self.bounds(anchor);
        self.bounds(current.start - Duration::days(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_runs_monday_through_sunday() {
        let range = Period::Week.bounds(date(2026, 2, 4));
        assert_eq!(range.start, date(2026, 2, 2));
        assert_eq!(range.end, date(2026, 2, 8));
    }

    #[test]
    fn week_anchored_on_sunday_stays_in_the_same_week() {
        let range = Period::Week.bounds(date(2026, 2, 8));
        assert_eq!(range.start, date(2026, 2, 2));
        assert_eq!(range.end, date(2026, 2, 8));
    }

    #[test]
    fn quarter_covers_whole_calendar_quarter() {
        let q1 = Period::Quarter.bounds(date(2026, 2, 4));
        assert_eq!(q1.start, date(2026, 1, 1));
        assert_eq!(q1.end, date(2026, 3, 31));

        let q4 = Period::Quarter.bounds(date(2025, 11, 15));
        assert_eq!(q4.start, date(2025, 10, 1));
        assert_eq!(q4.end, date(2025, 12, 31));
    }

    #[test]
    fn previous_week_abuts_the_current_one() {
        let current = Period::Week.bounds(date(2026, 2, 4));
        let previous = Period::Week.previous_bounds(date(2026, 2, 4));
        assert_eq!(previous.end + Duration::days(1), current.start);
        assert_eq!(previous.start, date(2026, 1, 26));
    }

    #[test]
    fn previous_quarter_crosses_the_year_boundary() {
        let previous = Period::Quarter.previous_bounds(date(2026, 2, 4));
        assert_eq!(previous.start, date(2025, 10, 1));
        assert_eq!(previous.end, date(2025, 12, 31));
    }

    #[test]
    fn day_bounds_are_the_day_itself() {
        let range = Period::Day.bounds(date(2026, 2, 4));
        assert_eq!(range.start, range.end);
    }
}
