use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::forecast::{DailyForecast, DayInflows, DayOutflows, ScenarioBounds};

/// Persist a full horizon in one transaction, upserting by `forecast_date`.
/// Rerunning for the same dates overwrites, never duplicates. The statement
/// timeout bounds the batch so a wedged store fails the persistence step
/// instead of hanging the caller.
pub async fn upsert_daily_forecasts_atomic(
    pool: &sqlx::PgPool,
    days: &[DailyForecast],
) -> anyhow::Result<u64> {
    anyhow::ensure!(!days.is_empty(), "days must be non-empty");

    let mut tx = pool.begin().await.context("begin transaction failed")?;

    let timeout_ms: u64 = std::env::var("FORECAST_PERSIST_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(30_000);
    sqlx::query(&format!("SET LOCAL statement_timeout = {timeout_ms}"))
        .execute(&mut *tx)
        .await
        .context("set statement timeout failed")?;

    let chunk_size: usize = std::env::var("FORECAST_UPSERT_BATCH")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(120);
    anyhow::ensure!(chunk_size >= 1, "FORECAST_UPSERT_BATCH must be >= 1");

    let generated_at: DateTime<Utc> = Utc::now();
    let mut affected: u64 = 0;
    let mut batch_idx: usize = 0;
    for chunk in days.chunks(chunk_size) {
        batch_idx += 1;
        let t0 = std::time::Instant::now();
        let mut qb = sqlx::QueryBuilder::new(
            "INSERT INTO daily_forecasts (forecast_date, opening_balance, closing_balance, \
             confidence_level, inflows, outflows, scenarios, alerts, generated_at) ",
        );
        qb.push_values(chunk, |mut b, day| {
            // These cannot fail: the forecast structs are numeric-only plus
            // plain strings.
            let inflows = serde_json::to_value(day.inflows).expect("inflows serialize failed");
            let outflows = serde_json::to_value(day.outflows).expect("outflows serialize failed");
            let scenarios =
                serde_json::to_value(day.scenarios).expect("scenarios serialize failed");
            let alerts = serde_json::to_value(&day.alerts).expect("alerts serialize failed");
            b.push_bind(day.date)
                .push_bind(day.opening_balance)
                .push_bind(day.closing_balance)
                .push_bind(day.confidence_level)
                .push_bind(inflows)
                .push_bind(outflows)
                .push_bind(scenarios)
                .push_bind(alerts)
                .push_bind(generated_at);
        });
        qb.push(
            " ON CONFLICT (forecast_date) DO UPDATE \
               SET opening_balance = EXCLUDED.opening_balance, \
                   closing_balance = EXCLUDED.closing_balance, \
                   confidence_level = EXCLUDED.confidence_level, \
                   inflows = EXCLUDED.inflows, \
                   outflows = EXCLUDED.outflows, \
                   scenarios = EXCLUDED.scenarios, \
                   alerts = EXCLUDED.alerts, \
                   generated_at = EXCLUDED.generated_at",
        );

        let res = qb
            .build()
            .persistent(false)
            .execute(&mut *tx)
            .await
            .context("batch upsert daily_forecasts failed")?;
        affected += res.rows_affected();

        tracing::debug!(
            batch_idx,
            batch_size = chunk.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "daily_forecasts batch upsert"
        );
    }

    tx.commit().await.context("commit transaction failed")?;
    Ok(affected)
}

pub async fn load_day(
    pool: &sqlx::PgPool,
    date: NaiveDate,
) -> anyhow::Result<Option<DailyForecast>> {
    let row = sqlx::query_as::<
        _,
        (
            NaiveDate,
            f64,
            f64,
            f64,
            serde_json::Value,
            serde_json::Value,
            serde_json::Value,
            serde_json::Value,
        ),
    >(
        "SELECT forecast_date, opening_balance, closing_balance, confidence_level, \
                inflows, outflows, scenarios, alerts \
         FROM daily_forecasts \
         WHERE forecast_date = $1",
    )
    .persistent(false)
    .bind(date)
    .fetch_optional(pool)
    .await
    .context("load daily forecast failed")?;

    let Some((
        forecast_date,
        opening_balance,
        closing_balance,
        confidence_level,
        inflows,
        outflows,
        scenarios,
        alerts,
    )) = row
    else {
        return Ok(None);
    };

    Ok(Some(DailyForecast {
        date: forecast_date,
        opening_balance,
        inflows: serde_json::from_value::<DayInflows>(inflows)
            .context("invalid inflows payload in daily_forecasts")?,
        outflows: serde_json::from_value::<DayOutflows>(outflows)
            .context("invalid outflows payload in daily_forecasts")?,
        closing_balance,
        scenarios: serde_json::from_value::<ScenarioBounds>(scenarios)
            .context("invalid scenarios payload in daily_forecasts")?,
        confidence_level,
        alerts: serde_json::from_value(alerts)
            .context("invalid alerts payload in daily_forecasts")?,
    }))
}

pub async fn record_forecast_run(
    pool: &sqlx::PgPool,
    as_of_date: NaiveDate,
    horizon_days: i64,
    status: &str,
    error: Option<&str>,
) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let generated_at: DateTime<Utc> = Utc::now();

    sqlx::query(
        "INSERT INTO forecast_runs (id, as_of_date, horizon_days, generated_at, status, error) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .persistent(false)
    .bind(id)
    .bind(as_of_date)
    .bind(horizon_days as i32)
    .bind(generated_at)
    .bind(status)
    .bind(error)
    .execute(pool)
    .await
    .context("insert forecast_runs failed")?;

    Ok(id)
}
