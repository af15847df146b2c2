use anyhow::Context;
use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::domain::facts::{
    BudgetCategory, BudgetLine, CashPosition, CounterpartyRole, Direction, IntervalUnit,
    OpenInvoiceLike, PaymentBehaviorPattern, RecurringSchedule,
};
use crate::domain::tax::{ActivitySummary, OrgTaxProfile, VatCadence};

/// Current position: active bank balances plus open AR/AP sums.
pub async fn load_cash_position(pool: &sqlx::PgPool) -> anyhow::Result<CashPosition> {
    let (cash, accounts_receivable, accounts_payable): (f64, f64, f64) = sqlx::query_as(
        "SELECT \
           (SELECT COALESCE(SUM(balance), 0) FROM bank_accounts WHERE is_active), \
           (SELECT COALESCE(SUM(amount_due), 0) FROM invoices \
             WHERE status = 'open' AND direction = 'receivable' AND amount_due > 0), \
           (SELECT COALESCE(SUM(amount_due), 0) FROM invoices \
             WHERE status = 'open' AND direction = 'payable' AND amount_due > 0)",
    )
    .persistent(false)
    .fetch_one(pool)
    .await
    .context("load cash position failed")?;

    Ok(CashPosition {
        cash,
        accounts_receivable,
        accounts_payable,
    })
}

/// Fallback source when the live position query fails: the opening balance
/// of the most recent persisted forecast day at or before `as_of`.
pub async fn load_fallback_position(
    pool: &sqlx::PgPool,
    as_of: NaiveDate,
) -> anyhow::Result<Option<CashPosition>> {
    let row: Option<(f64,)> = sqlx::query_as(
        "SELECT opening_balance FROM daily_forecasts \
         WHERE forecast_date <= $1 \
         ORDER BY forecast_date DESC \
         LIMIT 1",
    )
    .persistent(false)
    .bind(as_of)
    .fetch_optional(pool)
    .await
    .context("load fallback position failed")?;

    Ok(row.map(|(cash,)| CashPosition {
        cash,
        accounts_receivable: 0.0,
        accounts_payable: 0.0,
    }))
}

/// Open invoices or bills with something still due, ascending by due date.
/// The ordering is load-bearing: it fixes iteration order for the simulation.
pub async fn load_open_invoices(
    pool: &sqlx::PgPool,
    direction: Direction,
) -> anyhow::Result<Vec<OpenInvoiceLike>> {
    let rows = sqlx::query_as::<_, (Uuid, Uuid, String, NaiveDate, NaiveDate, f64, f64)>(
        "SELECT id, counterparty_id, counterparty_name, issue_date, due_date, amount_due, total_amount \
         FROM invoices \
         WHERE status = 'open' AND direction = $1 AND amount_due > 0 \
         ORDER BY due_date ASC, id ASC",
    )
    .persistent(false)
    .bind(direction.as_str())
    .fetch_all(pool)
    .await
    .context("load open invoices failed")?;

    let out = rows
        .into_iter()
        .map(
            |(id, counterparty_id, counterparty_name, issue_date, due_date, amount_due, total_amount)| {
                OpenInvoiceLike {
                    id,
                    counterparty_id,
                    counterparty_name,
                    issue_date,
                    due_date,
                    amount_due,
                    total_amount,
                    direction,
                }
            },
        )
        .collect();
    Ok(out)
}

/// Active schedules whose next occurrence falls inside the horizon and whose
/// end date has not already passed.
pub async fn load_recurring_schedules(
    pool: &sqlx::PgPool,
    today: NaiveDate,
    horizon_end: NaiveDate,
) -> anyhow::Result<Vec<RecurringSchedule>> {
    let rows = sqlx::query_as::<
        _,
        (
            Uuid,
            String,
            Option<Uuid>,
            String,
            i32,
            NaiveDate,
            Option<NaiveDate>,
            f64,
        ),
    >(
        "SELECT id, direction, counterparty_id, interval_unit, interval_count, \
                next_occurrence, end_date, amount \
         FROM recurring_schedules \
         WHERE is_active \
           AND next_occurrence >= $1 AND next_occurrence <= $2 \
           AND (end_date IS NULL OR end_date >= $1) \
         ORDER BY next_occurrence ASC, id ASC",
    )
    .persistent(false)
    .bind(today)
    .bind(horizon_end)
    .fetch_all(pool)
    .await
    .context("load recurring schedules failed")?;

    let mut out = Vec::with_capacity(rows.len());
    for (id, direction, counterparty_id, unit, count, next_occurrence, end_date, amount) in rows {
        anyhow::ensure!(
            count >= 1,
            "recurring schedule {id} has non-positive interval_count {count}"
        );
        out.push(RecurringSchedule {
            id,
            direction: Direction::parse(&direction)?,
            counterparty_id,
            interval_unit: IntervalUnit::parse(&unit)?,
            interval_count: count as u32,
            next_occurrence,
            end_date,
            amount,
        });
    }
    Ok(out)
}

pub async fn load_payment_patterns(
    pool: &sqlx::PgPool,
) -> anyhow::Result<Vec<PaymentBehaviorPattern>> {
    let rows = sqlx::query_as::<_, (Uuid, String, f64, f64, i64)>(
        "SELECT counterparty_id, role, average_days_to_pay, on_time_rate, sample_size \
         FROM payment_patterns \
         ORDER BY counterparty_id ASC, role ASC",
    )
    .persistent(false)
    .fetch_all(pool)
    .await
    .context("load payment patterns failed")?;

    let mut out = Vec::with_capacity(rows.len());
    for (counterparty_id, role, average_days_to_pay, on_time_rate, sample_size) in rows {
        out.push(PaymentBehaviorPattern {
            counterparty_id,
            role: CounterpartyRole::parse(&role)?,
            average_days_to_pay,
            on_time_rate,
            sample_size,
        });
    }
    Ok(out)
}

/// Budget lines for months overlapping the horizon. `month_period` is
/// `YYYY-MM`, so lexicographic range bounds are chronological.
pub async fn load_budget_lines(
    pool: &sqlx::PgPool,
    from_month: &str,
    to_month: &str,
) -> anyhow::Result<Vec<BudgetLine>> {
    let rows = sqlx::query_as::<_, (String, String, String, f64)>(
        "SELECT account_code, category, month_period, budgeted_amount \
         FROM budget_lines \
         WHERE month_period >= $1 AND month_period <= $2 \
         ORDER BY month_period ASC, account_code ASC",
    )
    .persistent(false)
    .bind(from_month)
    .bind(to_month)
    .fetch_all(pool)
    .await
    .context("load budget lines failed")?;

    let mut out = Vec::with_capacity(rows.len());
    for (account_code, category, month_period, budgeted_amount) in rows {
        out.push(BudgetLine {
            account_code,
            category: BudgetCategory::parse(&category)?,
            month_period,
            budgeted_amount,
        });
    }
    Ok(out)
}

pub async fn load_org_tax_profile(pool: &sqlx::PgPool) -> anyhow::Result<Option<OrgTaxProfile>> {
    let row = sqlx::query_as::<_, (bool, String, i32, i32, bool, Option<String>, Option<String>)>(
        "SELECT vat_registered, vat_cadence, fiscal_year_end_month, fiscal_year_end_day, \
                employs_staff, vat_liability_account, payroll_liability_account \
         FROM org_tax_profile \
         LIMIT 1",
    )
    .persistent(false)
    .fetch_optional(pool)
    .await
    .context("load org tax profile failed")?;

    let Some((
        vat_registered,
        vat_cadence,
        fiscal_year_end_month,
        fiscal_year_end_day,
        employs_staff,
        vat_liability_account,
        payroll_liability_account,
    )) = row
    else {
        return Ok(None);
    };

    anyhow::ensure!(
        (1..=12).contains(&fiscal_year_end_month),
        "org profile has invalid fiscal_year_end_month {fiscal_year_end_month}"
    );
    anyhow::ensure!(
        (1..=31).contains(&fiscal_year_end_day),
        "org profile has invalid fiscal_year_end_day {fiscal_year_end_day}"
    );

    Ok(Some(OrgTaxProfile {
        vat_registered,
        vat_cadence: VatCadence::parse(&vat_cadence)?,
        fiscal_year_end_month: fiscal_year_end_month as u32,
        fiscal_year_end_day: fiscal_year_end_day as u32,
        employs_staff,
        vat_liability_account,
        payroll_liability_account,
    }))
}

/// Trailing ledger aggregates for the obligation calculators, computed in
/// one round trip. The designated liability accounts come from the profile
/// row via the joins, so a missing designation reads as NULL, not zero.
pub async fn load_activity_summary(
    pool: &sqlx::PgPool,
    as_of: NaiveDate,
) -> anyhow::Result<ActivitySummary> {
    let window_3m = as_of - Duration::days(90);
    let window_12m = as_of - Duration::days(365);

    let row: (Option<f64>, Option<f64>, f64, f64, f64, f64) = sqlx::query_as(
        "SELECT \
           (SELECT SUM(l.amount) FROM ledger_transactions l \
             JOIN org_tax_profile p ON l.account_code = p.vat_liability_account \
             WHERE l.posted_on > $1 AND l.posted_on <= $3), \
           (SELECT SUM(l.amount) FROM ledger_transactions l \
             JOIN org_tax_profile p ON l.account_code = p.payroll_liability_account \
             WHERE l.posted_on > $1 AND l.posted_on <= $3), \
           (SELECT COALESCE(SUM(amount), 0) FROM ledger_transactions \
             WHERE entry_type = 'receipt' AND posted_on > $1 AND posted_on <= $3), \
           (SELECT COALESCE(SUM(amount), 0) FROM ledger_transactions \
             WHERE entry_type = 'payment' \
               AND (description ILIKE '%payroll%' OR description ILIKE '%salar%' \
                    OR description ILIKE '%wage%' OR description ILIKE '%paye%') \
               AND posted_on > $1 AND posted_on <= $3), \
           (SELECT COALESCE(SUM(amount), 0) FROM ledger_transactions \
             WHERE entry_type = 'receipt' AND posted_on > $2 AND posted_on <= $3), \
           (SELECT COALESCE(SUM(amount), 0) FROM ledger_transactions \
             WHERE entry_type = 'payment' AND posted_on > $2 AND posted_on <= $3)",
    )
    .persistent(false)
    .bind(window_3m)
    .bind(window_12m)
    .bind(as_of)
    .fetch_one(pool)
    .await
    .context("load activity summary failed")?;

    let (
        vat_liability_balance,
        payroll_liability_balance,
        trailing_3m_sales_receipts,
        payroll_outflow_3m,
        trailing_12m_receipts,
        trailing_12m_payments,
    ) = row;

    Ok(ActivitySummary {
        vat_liability_balance,
        payroll_liability_balance,
        trailing_3m_sales_receipts,
        payroll_outflow_3m,
        trailing_12m_receipts,
        trailing_12m_payments,
    })
}
