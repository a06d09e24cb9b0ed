//! Period aggregation: buckets raw activity into one totals object, and
//! the comparison/rollup views composed from it.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::models::{ActivityRecord, PeriodTotals, TeamMember, TeamMemberBreakdown};
use crate::period::DateRange;
use crate::score::{compute_score, ScoreWeights};

/// Sums one period's activity into a single totals object.
///
/// Calls and open homes are summed from the daily records; appraisals come
/// from a separately supplied count because appraisal events live in their
/// own table and are merged only here. The caller fetches only records
/// inside the period boundaries; this function trusts its input and does
/// not re-filter by date.
pub fn aggregate(
    records: &[ActivityRecord],
    appraisal_count: i64,
    weights: &ScoreWeights,
) -> PeriodTotals {
    let mut calls: i64 = 0;
    let mut open_homes: i64 = 0;

    for record in records {
        calls += record.calls.max(0) as i64;
        open_homes += record.open_homes.max(0) as i64;
    }

    let appraisals = appraisal_count.max(0);
    let score = compute_score(
        calls as f64,
        appraisals as f64,
        open_homes as f64,
        weights,
    )
    .total;

    PeriodTotals {
        calls,
        appraisals,
        open_homes,
        score,
    }
}

/// Two adjacent periods' totals with the boundaries each was computed over.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodComparison {
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    pub current_range: DateRange,
    pub previous_range: DateRange,
}

/// Aggregates the current and previous period independently. Deltas are a
/// caller concern, and the two ranges are a caller-supplied precondition:
/// non-overlap is not verified here.
#[allow(clippy::too_many_arguments)]
pub fn compare(
    current_records: &[ActivityRecord],
    current_appraisals: i64,
    previous_records: &[ActivityRecord],
    previous_appraisals: i64,
    current_range: DateRange,
    previous_range: DateRange,
    weights: &ScoreWeights,
) -> PeriodComparison {
    PeriodComparison {
        current: aggregate(current_records, current_appraisals, weights),
        previous: aggregate(previous_records, previous_appraisals, weights),
        current_range,
        previous_range,
    }
}

/// One aggregated row per roster member, in roster order.
///
/// Total over the member list: a member with no records and no appraisals
/// still gets an all-zero row, so dashboards render a stable row per agent.
pub fn rollup(
    members: &[TeamMember],
    records_by_agent: &HashMap<Uuid, Vec<ActivityRecord>>,
    appraisals_by_agent: &HashMap<Uuid, i64>,
    weights: &ScoreWeights,
) -> Vec<TeamMemberBreakdown> {
    members
        .iter()
        .map(|member| {
            let records = records_by_agent
                .get(&member.agent_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let appraisals = appraisals_by_agent
                .get(&member.agent_id)
                .copied()
                .unwrap_or(0);
            TeamMemberBreakdown {
                agent_id: member.agent_id,
                display_name: member.display_name.clone(),
                totals: aggregate(records, appraisals, weights),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, calls: i32, open_homes: i32) -> ActivityRecord {
        ActivityRecord {
            agent_id: Uuid::nil(),
            activity_date: NaiveDate::from_ymd_opt(2026, 2, day).unwrap(),
            calls,
            open_homes,
        }
    }

    #[test]
    fn sums_records_and_merges_appraisal_count() {
        let records = vec![record(2, 12, 0), record(3, 8, 1), record(4, 0, 2)];
        let totals = aggregate(&records, 2, &ScoreWeights::default());
        assert_eq!(totals.calls, 20);
        assert_eq!(totals.open_homes, 3);
        assert_eq!(totals.appraisals, 2);
        assert!((totals.score - (2.0 + 10.0 + 6.0)).abs() < 0.001);
    }

    #[test]
    fn record_order_does_not_change_totals() {
        let weights = ScoreWeights::default();
        let forward = vec![record(2, 5, 1), record(3, 7, 0), record(4, 11, 2)];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = aggregate(&forward, 1, &weights);
        let b = aggregate(&reversed, 1, &weights);
        assert_eq!(a.calls, b.calls);
        assert_eq!(a.open_homes, b.open_homes);
        assert_eq!(a.score.to_bits(), b.score.to_bits());
    }

    #[test]
    fn empty_period_is_all_zero() {
        let totals = aggregate(&[], 0, &ScoreWeights::default());
        assert_eq!(totals, PeriodTotals::zero());
    }

    #[test]
    fn comparison_keeps_the_two_periods_independent() {
        let weights = ScoreWeights::default();
        let current = vec![record(2, 30, 1)];
        let previous = vec![ActivityRecord {
            agent_id: Uuid::nil(),
            activity_date: NaiveDate::from_ymd_opt(2026, 1, 26).unwrap(),
            calls: 10,
            open_homes: 0,
        }];
        let current_range = crate::period::Period::Week
            .bounds(NaiveDate::from_ymd_opt(2026, 2, 4).unwrap());
        let previous_range = crate::period::Period::Week
            .previous_bounds(NaiveDate::from_ymd_opt(2026, 2, 4).unwrap());

        let comparison = compare(
            &current, 2, &previous, 1, current_range, previous_range, &weights,
        );
        assert!((comparison.current.score - 15.0).abs() < 0.001);
        assert!((comparison.previous.score - 6.0).abs() < 0.001);
        assert_eq!(comparison.current_range, current_range);
    }

    #[test]
    fn rollup_keeps_idle_members_with_zero_rows() {
        let members = vec![
            TeamMember {
                agent_id: Uuid::from_u128(1),
                display_name: "Priya Nair".to_string(),
                email: "priya@harborline.example".to_string(),
            },
            TeamMember {
                agent_id: Uuid::from_u128(2),
                display_name: "Marcus Webb".to_string(),
                email: "marcus@harborline.example".to_string(),
            },
            TeamMember {
                agent_id: Uuid::from_u128(3),
                display_name: "Elena Rossi".to_string(),
                email: "elena@harborline.example".to_string(),
            },
        ];

        let mut records_by_agent = HashMap::new();
        records_by_agent.insert(Uuid::from_u128(1), vec![record(2, 20, 1)]);
        records_by_agent.insert(Uuid::from_u128(3), vec![record(3, 5, 0)]);
        let mut appraisals_by_agent = HashMap::new();
        appraisals_by_agent.insert(Uuid::from_u128(1), 2i64);

        let rows = rollup(
            &members,
            &records_by_agent,
            &appraisals_by_agent,
            &ScoreWeights::default(),
        );

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].display_name, "Priya Nair");
        assert_eq!(rows[1].display_name, "Marcus Webb");
        assert_eq!(rows[1].totals, PeriodTotals::zero());
        assert_eq!(rows[2].totals.calls, 5);
    }

    #[test]
    fn rollup_with_empty_maps_is_total_over_the_roster() {
        let members = vec![TeamMember {
            agent_id: Uuid::from_u128(7),
            display_name: "Priya Nair".to_string(),
            email: "priya@harborline.example".to_string(),
        }];
        let rows = rollup(
            &members,
            &HashMap::new(),
            &HashMap::new(),
            &ScoreWeights::default(),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].totals, PeriodTotals::zero());
    }
}
