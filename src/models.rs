use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// One manually logged day of activity for one agent.
#[derive(Debug, Clone)]
pub struct ActivityRecord {
    pub agent_id: Uuid,
    pub activity_date: NaiveDate,
    pub calls: i32,
    pub open_homes: i32,
}

/// Pipeline stage of an appraisal event. Only a configured subset of
/// stages counts toward aggregate totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppraisalStage {
    Requested,
    Booked,
    Conducted,
    ListingSigned,
}

impl AppraisalStage {
    pub const ALL: [AppraisalStage; 4] = [
        AppraisalStage::Requested,
        AppraisalStage::Booked,
        AppraisalStage::Conducted,
        AppraisalStage::ListingSigned,
    ];

    /// Stages that count toward weekly and quarterly appraisal totals.
    /// `Requested` is an expression of interest, not a qualified
    /// appraisal, so it is excluded here.
    pub fn counted_default() -> &'static [AppraisalStage] {
        &[
            AppraisalStage::Booked,
            AppraisalStage::Conducted,
            AppraisalStage::ListingSigned,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppraisalStage::Requested => "requested",
            AppraisalStage::Booked => "booked",
            AppraisalStage::Conducted => "conducted",
            AppraisalStage::ListingSigned => "listing_signed",
        }
    }
}

impl std::str::FromStr for AppraisalStage {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "requested" => Ok(AppraisalStage::Requested),
            "booked" => Ok(AppraisalStage::Booked),
            "conducted" => Ok(AppraisalStage::Conducted),
            "listing_signed" => Ok(AppraisalStage::ListingSigned),
            other => Err(anyhow::anyhow!("unknown appraisal stage: {other}")),
        }
    }
}

/// Summed activity for one period, with the weighted composite score.
/// Derived on every invocation, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodTotals {
    pub calls: i64,
    pub appraisals: i64,
    pub open_homes: i64,
    pub score: f64,
}

impl PeriodTotals {
    pub fn zero() -> Self {
        PeriodTotals {
            calls: 0,
            appraisals: 0,
            open_homes: 0,
            score: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaceStatus {
    Ahead,
    OnTrack,
    Behind,
}

impl PaceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaceStatus::Ahead => "ahead",
            PaceStatus::OnTrack => "ontrack",
            PaceStatus::Behind => "behind",
        }
    }
}

/// Projection of weekly progress against a target. `behind_by` and
/// `ahead_by` are the positive and negative parts of one signed
/// difference, so at most one of them is non-zero.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PaceMetrics {
    pub expected_by_now: f64,
    pub behind_by: f64,
    pub ahead_by: f64,
    pub required_per_day: f64,
    pub current_pace: f64,
    pub required_pace: f64,
    pub days_into_week: u32,
    pub days_remaining: u32,
    pub status: PaceStatus,
}

/// Roster entry used by the team rollup.
#[derive(Debug, Clone)]
pub struct TeamMember {
    pub agent_id: Uuid,
    pub display_name: String,
    pub email: String,
}

/// One rollup row per team member, all-zero when the member logged nothing.
#[derive(Debug, Clone, Serialize)]
pub struct TeamMemberBreakdown {
    pub agent_id: Uuid,
    pub display_name: String,
    pub totals: PeriodTotals,
}
