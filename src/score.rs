//! Weighted composite score over calls, appraisals, and open homes.

use serde::Serialize;

/// Per-category weights for the composite score. A scoring-rule change is
/// a data change here, not a code change.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoreWeights {
    pub calls: f64,
    pub appraisals: f64,
    pub open_homes: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            calls: 0.1,
            appraisals: 5.0,
            open_homes: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoreBreakdown {
    pub total: f64,
    pub call_points: f64,
    pub appraisal_points: f64,
    pub open_home_points: f64,
}

/// Inputs come from possibly-incomplete manual logging, so negative and
/// non-finite values are treated as zero rather than rejected. This sits
/// on the dashboard render path and must never panic.
pub fn compute_score(
    calls: f64,
    appraisals: f64,
    open_homes: f64,
    weights: &ScoreWeights,
) -> ScoreBreakdown {
    let call_points = sanitize(calls) * weights.calls;
    let appraisal_points = sanitize(appraisals) * weights.appraisals;
    let open_home_points = sanitize(open_homes) * weights.open_homes;

    ScoreBreakdown {
        total: call_points + appraisal_points + open_home_points,
        call_points,
        appraisal_points,
        open_home_points,
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

    #[test]
    fn worked_example_matches_weight_table() {
        let breakdown = compute_score(20.0, 2.0, 1.0, &ScoreWeights::default());
        assert!((breakdown.call_points - 2.0).abs() < 0.001);
        assert!((breakdown.appraisal_points - 10.0).abs() < 0.001);
        assert!((breakdown.open_home_points - 2.0).abs() < 0.001);
        assert!((breakdown.total - 14.0).abs() < 0.001);
    }

    #[test]
    fn zero_inputs_score_zero() {
        let breakdown = compute_score(0.0, 0.0, 0.0, &ScoreWeights::default());
        assert_eq!(breakdown.total, 0.0);
    }

    #[test]
    fn identical_inputs_are_bit_identical() {
        let weights = ScoreWeights::default();
        let first = compute_score(13.0, 3.0, 2.0, &weights);
        let second = compute_score(13.0, 3.0, 2.0, &weights);
        assert_eq!(first.total.to_bits(), second.total.to_bits());
    }

    #[test]
    fn raising_any_input_never_lowers_the_total() {
        let weights = ScoreWeights::default();
        let base = compute_score(10.0, 1.0, 1.0, &weights).total;
        assert!(compute_score(11.0, 1.0, 1.0, &weights).total >= base);
        assert!(compute_score(10.0, 2.0, 1.0, &weights).total >= base);
        assert!(compute_score(10.0, 1.0, 2.0, &weights).total >= base);
    }

    #[test]
    fn dirty_inputs_are_treated_as_zero() {
        let weights = ScoreWeights::default();
        let breakdown = compute_score(-4.0, f64::NAN, f64::INFINITY, &weights);
        assert_eq!(breakdown.total, 0.0);
    }
}
