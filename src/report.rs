use std::fmt::Write;

use crate::aggregate::PeriodComparison;
use crate::models::{PaceMetrics, PeriodTotals, TeamMemberBreakdown};

/// Score movement between two periods: absolute delta plus percentage
/// change, `None` when the previous score was zero.
pub fn score_delta(current: &PeriodTotals, previous: &PeriodTotals) -> (f64, Option<f64>) {
    let delta = current.score - previous.score;
    let percent = if previous.score > 0.0 {
        Some(delta / previous.score * 100.0)
    } else {
        None
    };
    (delta, percent)
}

pub fn build_report(
    scope: Option<&str>,
    comparison: &PeriodComparison,
    pace: Option<&PaceMetrics>,
    team_rows: &[TeamMemberBreakdown],
) -> String {
    let mut output = String::new();
    let scope_label = scope.unwrap_or("all agents");

    let _ = writeln!(output, "# Agency Pulse Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} to {})",
        scope_label, comparison.current_range.start, comparison.current_range.end
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## This Period");
    write_totals(&mut output, &comparison.current);

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Previous Period ({} to {})",
        comparison.previous_range.start, comparison.previous_range.end
    );
    write_totals(&mut output, &comparison.previous);

    let (delta, percent) = score_delta(&comparison.current, &comparison.previous);
    let _ = writeln!(output);
    match percent {
        Some(percent) => {
            let _ = writeln!(
                output,
                "Score moved {:+.1} week over week ({:+.1}%).",
                delta, percent
            );
        }
        None => {
            let _ = writeln!(output, "Score moved {:+.1} week over week.", delta);
        }
    }

    if let Some(pace) = pace {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Pace");
        let _ = writeln!(
            output,
            "Day {} of 7, {} days remaining. Expected by now: {:.1}.",
            pace.days_into_week, pace.days_remaining, pace.expected_by_now
        );
        if pace.behind_by > 0.0 {
            let _ = writeln!(
                output,
                "Behind by {:.1}; {:.1} per day needed to close the gap.",
                pace.behind_by, pace.required_per_day
            );
        } else if pace.ahead_by > 0.0 {
            let _ = writeln!(output, "Ahead by {:.1}.", pace.ahead_by);
        } else {
            let _ = writeln!(output, "Exactly on pace.");
        }
        let _ = writeln!(output, "Status: {}.", pace.status.as_str());
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Team Breakdown");

    if team_rows.is_empty() {
        let _ = writeln!(output, "No agents in scope for this period.");
    } else {
        let _ = writeln!(output, "| Agent | Calls | Appraisals | Open homes | Score |");
        let _ = writeln!(output, "| --- | ---: | ---: | ---: | ---: |");
        for row in team_rows {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {:.1} |",
                row.display_name,
                row.totals.calls,
                row.totals.appraisals,
                row.totals.open_homes,
                row.totals.score
            );
        }
    }

    output
}

fn write_totals(output: &mut String, totals: &PeriodTotals) {
    let _ = writeln!(output, "- Calls: {}", totals.calls);
    let _ = writeln!(output, "- Appraisals: {}", totals.appraisals);
    let _ = writeln!(output, "- Open homes: {}", totals.open_homes);
    let _ = writeln!(output, "- Score: {:.1}", totals.score);
}
