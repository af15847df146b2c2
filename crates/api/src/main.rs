use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flowcast_core::cache::MemoryTtlCache;
use flowcast_core::domain::forecast::DailyForecast;
use flowcast_core::engine::config::EngineConfig;
use flowcast_core::engine::error::ForecastEngineError;
use flowcast_core::engine::CashFlowEngine;
use flowcast_core::tax::TaxConfig;

const DEFAULT_HORIZON_DAYS: i64 = 90;
const MAX_HORIZON_DAYS: i64 = 370;

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

    let pool: Option<PgPool> = match settings.require_database_url() {
        Ok(db_url) => match sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(db_url)
            .await
        {
            Ok(pool) => match flowcast_core::storage::migrate(&pool).await {
                Ok(()) => Some(pool),
                Err(e) => {
                    sentry_anyhow::capture_anyhow(&e);
                    tracing::error!(error = %e, "db migrations failed; starting API in degraded mode");
                    None
                }
            },
            Err(e) => {
                let err = anyhow::Error::new(e);
                sentry_anyhow::capture_anyhow(&err);
                tracing::error!(error = %err, "db connect failed; starting API in degraded mode");
                None
            }
        },
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "DATABASE_URL missing; starting API in degraded mode");
            None
        }
    };

    let engine = pool.clone().map(|pool| {
        Arc::new(CashFlowEngine::new(
            pool,
            MemoryTtlCache::new(),
            EngineConfig::from_env(),
            TaxConfig::default(),
        ))
    });

    let state = AppState {
        pool,
        engine,
        default_horizon_days: settings
            .default_horizon_days
            .unwrap_or(DEFAULT_HORIZON_DAYS),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/forecast", get(get_forecast))
        .route("/forecast/daily/:date", get(get_forecast_day))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    pool: Option<PgPool>,
    engine: Option<Arc<CashFlowEngine<MemoryTtlCache>>>,
    default_horizon_days: i64,
}

#[derive(Debug, Deserialize)]
struct ForecastQuery {
    days: Option<i64>,
}

#[derive(Debug, Serialize)]
struct ForecastResponse {
    horizon_days: i64,
    from_cache: bool,
    persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    persist_error: Option<String>,
    days: Vec<DailyForecast>,
}

async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, StatusCode> {
    let Some(engine) = &state.engine else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let horizon_days = query.days.unwrap_or(state.default_horizon_days);
    if horizon_days > MAX_HORIZON_DAYS {
        return Err(StatusCode::BAD_REQUEST);
    }

    let outcome = engine.get_or_compute(horizon_days).await.map_err(|e| {
        if e.downcast_ref::<ForecastEngineError>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        sentry_anyhow::capture_anyhow(&e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ForecastResponse {
        horizon_days,
        from_cache: outcome.from_cache,
        persisted: outcome.persisted,
        persist_error: outcome.persist_error,
        days: outcome.days,
    }))
}

async fn get_forecast_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DailyForecast>, StatusCode> {
    let Some(pool) = &state.pool else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let date =
        NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| StatusCode::BAD_REQUEST)?;

    let day = flowcast_core::storage::forecasts::load_day(pool, date)
        .await
        .map_err(|e| {
            sentry_anyhow::capture_anyhow(&e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(day))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
