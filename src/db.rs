use anyhow::Context;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{ActivityRecord, AppraisalStage, TeamMember};
use crate::period::DateRange;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let agents = vec![
        (
            Uuid::parse_str("8f2c3b1a-5d47-4a9e-9c21-7e5f80d2a4b6")?,
            "Priya Nair",
            "priya.nair@harborline.example",
            "bayside",
        ),
        (
            Uuid::parse_str("2a91e7c4-63f8-4d02-b5aa-91c4f7e86d33")?,
            "Marcus Webb",
            "marcus.webb@harborline.example",
            "bayside",
        ),
        (
            Uuid::parse_str("c47d9e02-18b6-4f5c-8d73-3a92b61f0e58")?,
            "Elena Rossi",
            "elena.rossi@harborline.example",
            "hillcrest",
        ),
    ];

    for (id, name, email, team) in agents {
        sqlx::query(
            r#"
            INSERT INTO agency_pulse.agents (id, full_name, email, team)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE
            SET full_name = EXCLUDED.full_name, team = EXCLUDED.team
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(team)
        .fetch_one(pool)
        .await?;
    }

    let activity = vec![
        ("priya.nair@harborline.example", 18, 1, NaiveDate::from_ymd_opt(2026, 2, 2)),
        ("priya.nair@harborline.example", 22, 0, NaiveDate::from_ymd_opt(2026, 2, 3)),
        ("marcus.webb@harborline.example", 9, 2, NaiveDate::from_ymd_opt(2026, 2, 2)),
        ("elena.rossi@harborline.example", 25, 1, NaiveDate::from_ymd_opt(2026, 2, 4)),
    ];

    for (email, calls, open_homes, date) in activity {
        let date = date.context("invalid seed date")?;
        upsert_activity(pool, email, date, calls, open_homes).await?;
    }

    let appraisals = vec![
        (
            "seed-appr-001",
            "priya.nair@harborline.example",
            AppraisalStage::Conducted,
            NaiveDate::from_ymd_opt(2026, 2, 3),
        ),
        (
            "seed-appr-002",
            "priya.nair@harborline.example",
            AppraisalStage::Requested,
            NaiveDate::from_ymd_opt(2026, 2, 4),
        ),
        (
            "seed-appr-003",
            "elena.rossi@harborline.example",
            AppraisalStage::Booked,
            NaiveDate::from_ymd_opt(2026, 2, 4),
        ),
    ];

    for (source_key, email, stage, date) in appraisals {
        let date = date.context("invalid seed date")?;
        let agent_id = agent_id_by_email(pool, email).await?;

        sqlx::query(
            r#"
            INSERT INTO agency_pulse.appraisals
            (id, agent_id, appraisal_date, stage, source_key)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(agent_id)
        .bind(date)
        .bind(stage.as_str())
        .bind(source_key)
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn agent_id_by_email(pool: &PgPool, email: &str) -> anyhow::Result<Uuid> {
    let row = sqlx::query("SELECT id FROM agency_pulse.agents WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .with_context(|| format!("no agent with email {email}"))?;
    Ok(row.get("id"))
}

async fn upsert_activity(
    pool: &PgPool,
    email: &str,
    date: NaiveDate,
    calls: i32,
    open_homes: i32,
) -> anyhow::Result<()> {
    let agent_id = agent_id_by_email(pool, email).await?;

    sqlx::query(
        r#"
        INSERT INTO agency_pulse.daily_activity
        (id, agent_id, activity_date, calls, open_homes)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (agent_id, activity_date) DO UPDATE
        SET calls = EXCLUDED.calls, open_homes = EXCLUDED.open_homes
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(agent_id)
    .bind(date)
    .bind(calls)
    .bind(open_homes)
    .execute(pool)
    .await?;

    Ok(())
}

/// The manual daily-logging action: one row per agent per day, replaced
/// on re-log.
pub async fn log_activity(
    pool: &PgPool,
    email: &str,
    date: NaiveDate,
    calls: i32,
    open_homes: i32,
) -> anyhow::Result<()> {
    upsert_activity(pool, email, date, calls, open_homes).await
}

pub async fn fetch_activity(
    pool: &PgPool,
    range: DateRange,
    team: Option<&str>,
    email: Option<&str>,
) -> anyhow::Result<Vec<ActivityRecord>> {
    let mut query = String::from(
        "SELECT d.agent_id, d.activity_date, d.calls, d.open_homes \
         FROM agency_pulse.daily_activity d \
         JOIN agency_pulse.agents a ON a.id = d.agent_id \
         WHERE d.activity_date BETWEEN $1 AND $2",
    );

    if team.is_some() {
        query.push_str(" AND a.team = $3");
    } else if email.is_some() {
        query.push_str(" AND a.email = $3");
    }

    let mut rows = sqlx::query(&query).bind(range.start).bind(range.end);

    if let Some(value) = team {
        rows = rows.bind(value);
    } else if let Some(value) = email {
        rows = rows.bind(value);
    }

    let fetched = rows.fetch_all(pool).await?;
    let mut records = Vec::new();

    for row in fetched {
        records.push(ActivityRecord {
            agent_id: row.get("agent_id"),
            activity_date: row.get("activity_date"),
            calls: row.get("calls"),
            open_homes: row.get("open_homes"),
        });
    }

    Ok(records)
}

/// Counts appraisal events in the range whose stage is in the counted
/// set. Which stages count is caller configuration, not a query default.
pub async fn count_appraisals(
    pool: &PgPool,
    range: DateRange,
    counted_stages: &[AppraisalStage],
    team: Option<&str>,
    email: Option<&str>,
) -> anyhow::Result<i64> {
    let mut query = String::from(
        "SELECT COUNT(*) AS total \
         FROM agency_pulse.appraisals ap \
         JOIN agency_pulse.agents a ON a.id = ap.agent_id \
         WHERE ap.appraisal_date BETWEEN $1 AND $2 \
         AND ap.stage = ANY($3)",
    );

    if team.is_some() {
        query.push_str(" AND a.team = $4");
    } else if email.is_some() {
        query.push_str(" AND a.email = $4");
    }

    let stages: Vec<String> = counted_stages
        .iter()
        .map(|stage| stage.as_str().to_string())
        .collect();

    let mut row = sqlx::query(&query)
        .bind(range.start)
        .bind(range.end)
        .bind(stages);

    if let Some(value) = team {
        row = row.bind(value);
    } else if let Some(value) = email {
        row = row.bind(value);
    }

    let fetched = row.fetch_one(pool).await?;
    Ok(fetched.get("total"))
}

pub async fn fetch_agents(pool: &PgPool, team: Option<&str>) -> anyhow::Result<Vec<TeamMember>> {
    let mut query =
        String::from("SELECT id, full_name, email FROM agency_pulse.agents");
    if team.is_some() {
        query.push_str(" WHERE team = $1");
    }
    query.push_str(" ORDER BY full_name");

    let mut rows = sqlx::query(&query);
    if let Some(value) = team {
        rows = rows.bind(value);
    }

    let fetched = rows.fetch_all(pool).await?;
    let mut members = Vec::new();

    for row in fetched {
        members.push(TeamMember {
            agent_id: row.get("id"),
            display_name: row.get("full_name"),
            email: row.get("email"),
        });
    }

    Ok(members)
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        full_name: String,
        email: String,
        team: String,
        activity_date: NaiveDate,
        #[serde(default)]
        calls: i32,
        #[serde(default)]
        open_homes: i32,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut imported = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        sqlx::query(
            r#"
            INSERT INTO agency_pulse.agents (id, full_name, email, team)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE
            SET full_name = EXCLUDED.full_name, team = EXCLUDED.team
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&row.full_name)
        .bind(&row.email)
        .bind(&row.team)
        .execute(pool)
        .await?;

        upsert_activity(pool, &row.email, row.activity_date, row.calls, row.open_homes)
            .await?;
        imported += 1;
    }

    Ok(imported)
}
