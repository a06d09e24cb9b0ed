//! Weekly pace projection: where progress should be by today, assuming
//! uniform daily effort across a Monday-start week.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{PaceMetrics, PaceStatus};

/// Status cut-offs as ratios of expected-by-now progress. Tunable
/// configuration, not business constants baked into the projection.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PaceThresholds {
    pub ahead_ratio: f64,
    pub behind_ratio: f64,
}

impl Default for PaceThresholds {
    fn default() -> Self {
        PaceThresholds {
            ahead_ratio: 1.10,
            behind_ratio: 0.85,
        }
    }
}

/// Projects `current` progress against a weekly `target` as of `as_of`.
///
/// Sunday is the last day of the week (ISO numbering, Monday = 1), so a
/// Sunday projection has zero days remaining and `required_per_day` of 0
/// rather than a division by zero. Never panics; dirty inputs are coerced
/// to zero and produce consistent output.
pub fn compute_pace(
    current: f64,
    target: f64,
    as_of: NaiveDate,
    thresholds: &PaceThresholds,
) -> PaceMetrics {
    let current = sanitize(current);
    let target = sanitize(target);

    let days_into_week = as_of.weekday().number_from_monday();
    let days_remaining = 7 - days_into_week;

    let expected_by_now = (target / 7.0) * days_into_week as f64;
    let delta = current - expected_by_now;

    let required_per_day = if days_remaining == 0 {
        0.0
    } else {
        ((target - current) / days_remaining as f64).max(0.0)
    };

    let status = if expected_by_now == 0.0 {
        if current > 0.0 {
            PaceStatus::Ahead
        } else {
            PaceStatus::OnTrack
        }
    } else if current >= thresholds.ahead_ratio * expected_by_now {
        PaceStatus::Ahead
    } else if current < thresholds.behind_ratio * expected_by_now {
        PaceStatus::Behind
    } else {
        PaceStatus::OnTrack
    };

    PaceMetrics {
        expected_by_now,
        behind_by: (-delta).max(0.0),
        ahead_by: delta.max(0.0),
        required_per_day,
        current_pace: current / days_into_week as f64,
        required_pace: target / 7.0,
        days_into_week,
        days_remaining,
        status,
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 4).unwrap()
    }

    fn sunday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 8).unwrap()
    }

    #[test]
    fn behind_on_wednesday_against_seventy() {
        let pace = compute_pace(20.0, 70.0, wednesday(), &PaceThresholds::default());
        assert_eq!(pace.days_into_week, 3);
        assert!((pace.expected_by_now - 30.0).abs() < 0.001);
        assert!((pace.behind_by - 10.0).abs() < 0.001);
        assert_eq!(pace.ahead_by, 0.0);
        assert_eq!(pace.status, PaceStatus::Behind);
    }

    #[test]
    fn behind_and_ahead_are_mutually_exclusive() {
        let thresholds = PaceThresholds::default();
        for current in [0.0, 10.0, 30.0, 55.0, 90.0] {
            let pace = compute_pace(current, 70.0, wednesday(), &thresholds);
            assert!(
                pace.behind_by == 0.0 || pace.ahead_by == 0.0,
                "both non-zero at current={current}"
            );
        }
    }

    #[test]
    fn sunday_has_zero_required_per_day() {
        let pace = compute_pace(10.0, 70.0, sunday(), &PaceThresholds::default());
        assert_eq!(pace.days_into_week, 7);
        assert_eq!(pace.days_remaining, 0);
        assert_eq!(pace.required_per_day, 0.0);
        assert!(pace.required_per_day.is_finite());
    }

    #[test]
    fn zero_target_is_on_track_only_at_zero_progress() {
        let thresholds = PaceThresholds::default();
        let idle = compute_pace(0.0, 0.0, wednesday(), &thresholds);
        assert_eq!(idle.status, PaceStatus::OnTrack);
        assert_eq!(idle.required_pace, 0.0);

        let active = compute_pace(5.0, 0.0, wednesday(), &thresholds);
        assert_eq!(active.status, PaceStatus::Ahead);
    }

    #[test]
    fn on_pace_monday_is_on_track() {
        let monday = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let pace = compute_pace(10.0, 70.0, monday, &PaceThresholds::default());
        assert_eq!(pace.days_into_week, 1);
        assert!((pace.expected_by_now - 10.0).abs() < 0.001);
        assert_eq!(pace.status, PaceStatus::OnTrack);
        assert_eq!(pace.behind_by, 0.0);
        assert_eq!(pace.ahead_by, 0.0);
    }

    #[test]
    fn dirty_inputs_never_panic() {
        let pace = compute_pace(f64::NAN, -70.0, sunday(), &PaceThresholds::default());
        assert_eq!(pace.expected_by_now, 0.0);
        assert_eq!(pace.status, PaceStatus::OnTrack);
    }
}
