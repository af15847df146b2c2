use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flowcast_core::cache::MemoryTtlCache;
use flowcast_core::engine::config::EngineConfig;
use flowcast_core::engine::CashFlowEngine;
use flowcast_core::tax::TaxConfig;

#[derive(Debug, Parser)]
#[command(name = "flowcast_worker")]
struct Args {
    /// Forecast as-of date (YYYY-MM-DD). Defaults to today's UTC date.
    #[arg(long)]
    as_of_date: Option<String>,

    /// Number of future days to simulate.
    #[arg(long, default_value_t = 90)]
    horizon_days: i64,

    /// Do everything except writing to the database.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = flowcast_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let as_of_date = resolve_as_of_date(args.as_of_date.as_deref())?;

    let db_url = settings.require_database_url()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await
        .context("connect DATABASE_URL failed")?;

    flowcast_core::storage::migrate(&pool).await?;

    let engine = CashFlowEngine::new(
        pool.clone(),
        MemoryTtlCache::new(),
        EngineConfig::from_env(),
        TaxConfig::default(),
    );

    if args.dry_run {
        let run = engine.compute(as_of_date, args.horizon_days).await?;
        let last = run.days.last().map(|day| day.closing_balance).unwrap_or(0.0);
        tracing::info!(
            %as_of_date,
            dry_run = true,
            horizon_days = args.horizon_days,
            days_len = run.days.len(),
            derived_obligations = run.derived_obligations.len(),
            position_precision = ?run.position_precision,
            final_closing_balance = last,
            "forecast run (dry-run)"
        );
        return Ok(());
    }

    let acquired = flowcast_core::storage::lock::try_acquire_run_lock(&pool, as_of_date).await?;
    if !acquired {
        tracing::warn!(%as_of_date, "forecast run lock not acquired; another run in progress");
        return Ok(());
    }

    match engine.run_and_persist(as_of_date, args.horizon_days).await {
        Ok(outcome) => {
            if let Some(persist_error) = &outcome.persist_error {
                tracing::error!(
                    %as_of_date,
                    horizon_days = args.horizon_days,
                    error = %persist_error,
                    "forecast computed but persistence failed"
                );
            } else {
                tracing::info!(
                    %as_of_date,
                    horizon_days = args.horizon_days,
                    days_len = outcome.days.len(),
                    "persisted forecast run"
                );
            }
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            let _ = flowcast_core::storage::forecasts::record_forecast_run(
                &pool,
                as_of_date,
                args.horizon_days,
                "error",
                Some(&format!("{err:#}")),
            )
            .await;
            tracing::error!(%as_of_date, error = %err, "forecast run failed");
        }
    }

    let _ = flowcast_core::storage::lock::release_run_lock(&pool, as_of_date).await;
    Ok(())
}

fn init_sentry(settings: &flowcast_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

fn resolve_as_of_date(as_of_date_arg: Option<&str>) -> anyhow::Result<chrono::NaiveDate> {
    if let Some(s) = as_of_date_arg {
        return Ok(chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")?);
    }
    Ok(chrono::Utc::now().date_naive())
}
