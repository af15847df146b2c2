pub mod config;
pub mod error;
pub mod simulate;

use std::time::Duration;

use chrono::NaiveDate;

use crate::cache::KvCache;
use crate::domain::facts::{FactSnapshot, Precision};
use crate::domain::forecast::DailyForecast;
use crate::domain::tax::TaxObligation;
use crate::engine::config::EngineConfig;
use crate::engine::error::ForecastEngineError;
use crate::loader;
use crate::storage;
use crate::tax::{self, TaxConfig};

/// One full pipeline execution before persistence.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub days: Vec<DailyForecast>,
    pub derived_obligations: Vec<TaxObligation>,
    pub position_precision: Precision,
}

/// What a caller gets back. `persisted`/`persist_error` describe the durable
/// write of a freshly computed run; a cache hit skips that step entirely.
#[derive(Debug, Clone)]
pub struct ForecastOutcome {
    pub days: Vec<DailyForecast>,
    pub from_cache: bool,
    pub persisted: bool,
    pub persist_error: Option<String>,
}

/// The forecasting engine. Owns its configuration; nothing here is mutated
/// after construction, so one engine serves concurrent callers.
pub struct CashFlowEngine<C: KvCache> {
    pool: sqlx::PgPool,
    cache: C,
    config: EngineConfig,
    tax_config: TaxConfig,
}

impl<C: KvCache> CashFlowEngine<C> {
    pub fn new(pool: sqlx::PgPool, cache: C, config: EngineConfig, tax_config: TaxConfig) -> Self {
        Self {
            pool,
            cache,
            config,
            tax_config,
        }
    }

    fn cache_key(horizon_days: i64) -> String {
        format!("forecast:{horizon_days}")
    }

    /// Load facts, derive obligations, and simulate. No cache, no writes.
    pub async fn compute(
        &self,
        as_of: NaiveDate,
        horizon_days: i64,
    ) -> anyhow::Result<PipelineRun> {
        if horizon_days < 1 {
            return Err(ForecastEngineError::InvalidHorizon {
                requested: horizon_days,
            }
            .into());
        }

        let loaded = loader::load_facts(&self.pool, as_of, horizon_days).await;

        let derived = tax::calculate_upcoming_obligations(
            as_of,
            horizon_days,
            &loaded.profile,
            &loaded.activity,
            &self.tax_config,
        );
        let merged =
            tax::merge_obligations(derived.clone(), loaded.pending_obligations.clone());

        let snapshot = FactSnapshot {
            as_of,
            position: loaded.position,
            position_precision: loaded.position_precision,
            patterns: loaded.pattern_map(),
            receivables: loaded.receivables,
            payables: loaded.payables,
            schedules: loaded.schedules,
            budgets: loaded.budgets,
            obligations: merged,
        };

        if snapshot.position_precision == Precision::Degraded {
            tracing::warn!(%as_of, "running in degraded zero-position mode");
        }

        let days = simulate::simulate_horizon(&snapshot, horizon_days, &self.config);
        Ok(PipelineRun {
            days,
            derived_obligations: derived,
            position_precision: snapshot.position_precision,
        })
    }

    /// Compute and durably persist one run. A persistence failure is
    /// surfaced in the outcome, never by discarding the computed forecast.
    pub async fn run_and_persist(
        &self,
        as_of: NaiveDate,
        horizon_days: i64,
    ) -> anyhow::Result<ForecastOutcome> {
        let run = self.compute(as_of, horizon_days).await?;

        let persist_error = match self.persist(&run).await {
            Ok(()) => None,
            Err(err) => {
                tracing::error!(%as_of, horizon_days, error = %err, "forecast persistence failed");
                Some(format!("{err:#}"))
            }
        };

        let status = if persist_error.is_none() {
            "success"
        } else {
            "persist_failed"
        };
        if let Err(err) = storage::forecasts::record_forecast_run(
            &self.pool,
            as_of,
            horizon_days,
            status,
            persist_error.as_deref(),
        )
        .await
        {
            tracing::warn!(error = %err, "failed to record forecast run audit row");
        }

        Ok(ForecastOutcome {
            days: run.days,
            from_cache: false,
            persisted: persist_error.is_none(),
            persist_error,
        })
    }

    async fn persist(&self, run: &PipelineRun) -> anyhow::Result<()> {
        storage::obligations::upsert_derived(&self.pool, &run.derived_obligations).await?;
        storage::forecasts::upsert_daily_forecasts_atomic(&self.pool, &run.days).await?;
        Ok(())
    }

    /// The public entry point. A cached horizon younger than the TTL is
    /// served as-is; the staleness window is the documented trade-off for
    /// bounding repeat-request cost. The cache write and the durable batch
    /// write are independent failure domains.
    pub async fn get_or_compute(&self, horizon_days: i64) -> anyhow::Result<ForecastOutcome> {
        if horizon_days < 1 {
            return Err(ForecastEngineError::InvalidHorizon {
                requested: horizon_days,
            }
            .into());
        }

        let key = Self::cache_key(horizon_days);
        match self.cache.get(&key).await {
            Ok(Some(serialized)) => {
                match serde_json::from_str::<Vec<DailyForecast>>(&serialized) {
                    Ok(days) => {
                        tracing::debug!(horizon_days, "forecast served from cache");
                        return Ok(ForecastOutcome {
                            days,
                            from_cache: true,
                            persisted: true,
                            persist_error: None,
                        });
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "cached forecast failed to deserialize; recomputing");
                    }
                }
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "cache get failed; recomputing");
            }
        }

        let as_of = chrono::Utc::now().date_naive();
        let outcome = self.run_and_persist(as_of, horizon_days).await?;

        match serde_json::to_string(&outcome.days) {
            Ok(serialized) => {
                if let Err(err) = self
                    .cache
                    .set(&key, serialized, Duration::from_secs(self.config.cache_ttl_secs))
                    .await
                {
                    tracing::warn!(error = %err, "cache set failed; result still returned");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "forecast serialization for cache failed");
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryTtlCache;

    fn engine_with_lazy_pool() -> CashFlowEngine<MemoryTtlCache> {
        // connect_lazy performs no I/O; the pool only dials on first use.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost:1/unreachable")
            .unwrap();
        CashFlowEngine::new(
            pool,
            MemoryTtlCache::new(),
            EngineConfig::default(),
            TaxConfig::default(),
        )
    }

    #[tokio::test]
    async fn zero_horizon_is_rejected_before_any_io() {
        let err = engine_with_lazy_pool().get_or_compute(0).await.unwrap_err();
        let typed = err.downcast_ref::<ForecastEngineError>();
        assert!(matches!(
            typed,
            Some(ForecastEngineError::InvalidHorizon { requested: 0 })
        ));
    }

    #[tokio::test]
    async fn negative_horizon_is_rejected_by_compute() {
        let as_of = chrono::NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        let err = engine_with_lazy_pool().compute(as_of, -3).await.unwrap_err();
        assert!(err.downcast_ref::<ForecastEngineError>().is_some());
    }
}
