use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{ArgGroup, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

mod aggregate;
mod db;
mod models;
mod pace;
mod period;
mod report;
mod score;

use models::{ActivityRecord, AppraisalStage};
use pace::PaceThresholds;
use period::Period;
use score::ScoreWeights;

#[derive(Parser)]
#[command(name = "agency-pulse")]
#[command(about = "Agent activity scoring and pace tracking for real-estate teams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import daily activity rows from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Log one agent's activity for one day (re-logging replaces the day)
    Log {
        #[arg(long)]
        email: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value_t = 0)]
        calls: i32,
        #[arg(long, default_value_t = 0)]
        open_homes: i32,
    },
    /// Weekly totals versus the previous week, with optional pace projection
    #[command(group(
        ArgGroup::new("scope")
            .args(["team", "email"])
            .multiple(false)
    ))]
    Week {
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Weekly score target to project pace against
        #[arg(long)]
        target: Option<f64>,
        /// Count every appraisal stage, including requested
        #[arg(long)]
        all_stages: bool,
        #[arg(long)]
        json: bool,
    },
    /// Per-member breakdown for one team over one period
    Team {
        #[arg(long)]
        team: String,
        #[arg(long, value_enum, default_value_t = Period::Week)]
        period: Period,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        all_stages: bool,
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    #[command(group(
        ArgGroup::new("scope")
            .args(["team", "email"])
            .multiple(false)
    ))]
    Report {
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Weekly score target to project pace against
        #[arg(long)]
        target: Option<f64>,
        #[arg(long)]
        all_stages: bool,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let imported = db::import_csv(&pool, &csv).await?;
            println!("Imported {imported} activity rows from {}.", csv.display());
        }
        Commands::Log {
            email,
            date,
            calls,
            open_homes,
        } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            db::log_activity(&pool, &email, date, calls, open_homes).await?;
            println!("Logged {calls} calls and {open_homes} open homes for {email} on {date}.");
        }
        Commands::Week {
            team,
            email,
            date,
            target,
            all_stages,
            json,
        } => {
            let anchor = date.unwrap_or_else(|| Utc::now().date_naive());
            let comparison = fetch_comparison(
                &pool,
                Period::Week,
                anchor,
                team.as_deref(),
                email.as_deref(),
                counted_stages(all_stages),
            )
            .await?;
            let pace = target.map(|target| {
                pace::compute_pace(
                    comparison.current.score,
                    target,
                    anchor,
                    &PaceThresholds::default(),
                )
            });

            if json {
                let payload = serde_json::json!({
                    "comparison": comparison,
                    "pace": pace,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
                return Ok(());
            }

            println!(
                "Week {} to {}: {} calls, {} appraisals, {} open homes, score {:.1}",
                comparison.current_range.start,
                comparison.current_range.end,
                comparison.current.calls,
                comparison.current.appraisals,
                comparison.current.open_homes,
                comparison.current.score
            );
            println!(
                "Previous week {} to {}: score {:.1}",
                comparison.previous_range.start,
                comparison.previous_range.end,
                comparison.previous.score
            );

            let (delta, percent) = report::score_delta(&comparison.current, &comparison.previous);
            match percent {
                Some(percent) => println!("Score moved {delta:+.1} ({percent:+.1}%)."),
                None => println!("Score moved {delta:+.1}."),
            }

            if let Some(pace) = pace {
                println!(
                    "Pace: day {} of 7, expected {:.1} by now, {:.1} per day needed, status {}.",
                    pace.days_into_week,
                    pace.expected_by_now,
                    pace.required_per_day,
                    pace.status.as_str()
                );
            }
        }
        Commands::Team {
            team,
            period,
            date,
            all_stages,
            json,
        } => {
            let anchor = date.unwrap_or_else(|| Utc::now().date_naive());
            let range = period.bounds(anchor);
            let rows = fetch_rollup(
                &pool,
                range,
                Some(team.as_str()),
                None,
                counted_stages(all_stages),
            )
            .await?;

            if rows.is_empty() {
                println!("No agents found for team {team}.");
                return Ok(());
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            println!("Team {team}, {} to {}:", range.start, range.end);
            for row in &rows {
                println!(
                    "- {}: {} calls, {} appraisals, {} open homes, score {:.1}",
                    row.display_name,
                    row.totals.calls,
                    row.totals.appraisals,
                    row.totals.open_homes,
                    row.totals.score
                );
            }
        }
        Commands::Report {
            team,
            email,
            date,
            target,
            all_stages,
            out,
        } => {
            let anchor = date.unwrap_or_else(|| Utc::now().date_naive());
            let stages = counted_stages(all_stages);
            let comparison = fetch_comparison(
                &pool,
                Period::Week,
                anchor,
                team.as_deref(),
                email.as_deref(),
                stages,
            )
            .await?;
            let rows = fetch_rollup(
                &pool,
                comparison.current_range,
                team.as_deref(),
                email.as_deref(),
                stages,
            )
            .await?;

            let pace = target.map(|target| {
                pace::compute_pace(
                    comparison.current.score,
                    target,
                    anchor,
                    &PaceThresholds::default(),
                )
            });

            let scope = team.as_deref().or(email.as_deref());
            let report = report::build_report(scope, &comparison, pace.as_ref(), &rows);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn counted_stages(all_stages: bool) -> &'static [AppraisalStage] {
    if all_stages {
        &AppraisalStage::ALL
    } else {
        AppraisalStage::counted_default()
    }
}

async fn fetch_comparison(
    pool: &PgPool,
    period: Period,
    anchor: NaiveDate,
    team: Option<&str>,
    email: Option<&str>,
    stages: &[AppraisalStage],
) -> anyhow::Result<aggregate::PeriodComparison> {
    let current_range = period.bounds(anchor);
    let previous_range = period.previous_bounds(anchor);

    let current_records = db::fetch_activity(pool, current_range, team, email).await?;
    let current_appraisals = db::count_appraisals(pool, current_range, stages, team, email).await?;
    let previous_records = db::fetch_activity(pool, previous_range, team, email).await?;
    let previous_appraisals =
        db::count_appraisals(pool, previous_range, stages, team, email).await?;

    Ok(aggregate::compare(
        &current_records,
        current_appraisals,
        &previous_records,
        previous_appraisals,
        current_range,
        previous_range,
        &ScoreWeights::default(),
    ))
}

async fn fetch_rollup(
    pool: &PgPool,
    range: period::DateRange,
    team: Option<&str>,
    email: Option<&str>,
    stages: &[AppraisalStage],
) -> anyhow::Result<Vec<models::TeamMemberBreakdown>> {
    let mut roster = db::fetch_agents(pool, team).await?;
    if let Some(email) = email {
        roster.retain(|member| member.email == email);
    }

    let records = db::fetch_activity(pool, range, team, email).await?;
    let mut records_by_agent: HashMap<Uuid, Vec<ActivityRecord>> = HashMap::new();
    for record in records {
        records_by_agent
            .entry(record.agent_id)
            .or_default()
            .push(record);
    }

    let mut appraisals_by_agent: HashMap<Uuid, i64> = HashMap::new();
    for member in &roster {
        let count =
            db::count_appraisals(pool, range, stages, None, Some(member.email.as_str())).await?;
        appraisals_by_agent.insert(member.agent_id, count);
    }

    Ok(aggregate::rollup(
        &roster,
        &records_by_agent,
        &appraisals_by_agent,
        &ScoreWeights::default(),
    ))
}
