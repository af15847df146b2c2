//! Per-run fact loading. All queries are independent reads, so they fan out
//! concurrently and the run waits only for the slowest one. A failed source
//! degrades to a documented default instead of aborting the run; the
//! position carries a precision tag so callers can see which happened.

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::facts::{
    BudgetLine, CashPosition, CounterpartyRole, Direction, OpenInvoiceLike,
    PaymentBehaviorPattern, Precision, RecurringSchedule,
};
use crate::domain::tax::{ActivitySummary, OrgTaxProfile, TaxObligation};
use crate::storage::{facts, obligations};
use crate::time::calendar;

#[derive(Debug, Clone)]
pub struct LoadedFacts {
    pub position: CashPosition,
    pub position_precision: Precision,
    pub receivables: Vec<OpenInvoiceLike>,
    pub payables: Vec<OpenInvoiceLike>,
    pub schedules: Vec<RecurringSchedule>,
    pub patterns: Vec<PaymentBehaviorPattern>,
    pub budgets: Vec<BudgetLine>,
    pub pending_obligations: Vec<TaxObligation>,
    pub profile: OrgTaxProfile,
    pub activity: ActivitySummary,
}

impl LoadedFacts {
    pub fn pattern_map(&self) -> BTreeMap<(Uuid, CounterpartyRole), PaymentBehaviorPattern> {
        self.patterns
            .iter()
            .map(|p| ((p.counterparty_id, p.role), p.clone()))
            .collect()
    }
}

pub async fn load_facts(pool: &sqlx::PgPool, as_of: NaiveDate, horizon_days: i64) -> LoadedFacts {
    let horizon_end = as_of + Duration::days(horizon_days - 1);
    let from_month = calendar::month_key(as_of);
    let to_month = calendar::month_key(horizon_end);

    let position_fut = async {
        match facts::load_cash_position(pool).await {
            Ok(position) => (position, Precision::Precise),
            Err(err) => {
                tracing::warn!(error = %err, "position query failed; trying fallback snapshot");
                match facts::load_fallback_position(pool, as_of).await {
                    Ok(Some(position)) => (position, Precision::Estimated),
                    Ok(None) => (CashPosition::zero(), Precision::Degraded),
                    Err(err) => {
                        tracing::warn!(error = %err, "fallback position failed; using zero position");
                        (CashPosition::zero(), Precision::Degraded)
                    }
                }
            }
        }
    };

    let (
        (position, position_precision),
        receivables,
        payables,
        schedules,
        patterns,
        budgets,
        pending_obligations,
        profile,
        activity,
    ) = tokio::join!(
        position_fut,
        async {
            or_default(
                "open_receivables",
                facts::load_open_invoices(pool, Direction::Receivable).await,
            )
        },
        async {
            or_default(
                "open_payables",
                facts::load_open_invoices(pool, Direction::Payable).await,
            )
        },
        async {
            or_default(
                "recurring_schedules",
                facts::load_recurring_schedules(pool, as_of, horizon_end).await,
            )
        },
        async { or_default("payment_patterns", facts::load_payment_patterns(pool).await) },
        async {
            or_default(
                "budget_lines",
                facts::load_budget_lines(pool, &from_month, &to_month).await,
            )
        },
        async { or_default("pending_obligations", obligations::load_pending(pool).await) },
        async {
            match facts::load_org_tax_profile(pool).await {
                Ok(Some(profile)) => profile,
                Ok(None) => OrgTaxProfile::default(),
                Err(err) => {
                    tracing::warn!(error = %err, "org tax profile load failed; using defaults");
                    OrgTaxProfile::default()
                }
            }
        },
        async { or_default("activity_summary", facts::load_activity_summary(pool, as_of).await) },
    );

    LoadedFacts {
        position,
        position_precision,
        receivables,
        payables,
        schedules,
        patterns,
        budgets,
        pending_obligations,
        profile,
        activity,
    }
}

fn or_default<T: Default>(source: &str, res: anyhow::Result<T>) -> T {
    match res {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(source, error = %err, "fact load failed; continuing with empty default");
            T::default()
        }
    }
}
