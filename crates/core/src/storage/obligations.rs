use anyhow::Context;
use chrono::NaiveDate;

use crate::domain::facts::Precision;
use crate::domain::tax::{ObligationStatus, TaxKind, TaxObligation};

/// Pending obligations already on record. These win over freshly derived
/// estimates for the same `(kind, due_date)`.
pub async fn load_pending(pool: &sqlx::PgPool) -> anyhow::Result<Vec<TaxObligation>> {
    let rows = sqlx::query_as::<
        _,
        (
            String,
            NaiveDate,
            f64,
            Option<NaiveDate>,
            Option<NaiveDate>,
            String,
            String,
            String,
        ),
    >(
        "SELECT kind, due_date, amount, period_start, period_end, reference, status, precision \
         FROM tax_obligations \
         WHERE status = 'pending' \
         ORDER BY due_date ASC, kind ASC",
    )
    .persistent(false)
    .fetch_all(pool)
    .await
    .context("load pending tax obligations failed")?;

    let mut out = Vec::with_capacity(rows.len());
    for (kind, due_date, amount, period_start, period_end, reference, status, precision) in rows {
        out.push(TaxObligation {
            kind: TaxKind::parse(&kind)?,
            due_date,
            amount,
            period_start,
            period_end,
            reference,
            status: ObligationStatus::parse(&status)?,
            precision: Precision::parse(&precision)?,
        });
    }
    Ok(out)
}

/// Write newly derived obligations keyed by `(kind, due_date)`. DO NOTHING
/// on conflict: an existing record is authoritative over a fresh estimate.
pub async fn upsert_derived(
    pool: &sqlx::PgPool,
    obligations: &[TaxObligation],
) -> anyhow::Result<u64> {
    if obligations.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await.context("begin transaction failed")?;

    let mut qb = sqlx::QueryBuilder::new(
        "INSERT INTO tax_obligations (kind, due_date, amount, period_start, period_end, \
         reference, status, precision) ",
    );
    qb.push_values(obligations, |mut b, ob| {
        b.push_bind(ob.kind.as_str())
            .push_bind(ob.due_date)
            .push_bind(ob.amount)
            .push_bind(ob.period_start)
            .push_bind(ob.period_end)
            .push_bind(ob.reference.as_str())
            .push_bind(ob.status.as_str())
            .push_bind(ob.precision.as_str());
    });
    qb.push(" ON CONFLICT (kind, due_date) DO NOTHING");

    let res = qb
        .build()
        .persistent(false)
        .execute(&mut *tx)
        .await
        .context("upsert tax_obligations failed")?;

    tx.commit().await.context("commit transaction failed")?;
    Ok(res.rows_affected())
}
