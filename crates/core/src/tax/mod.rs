//! Upcoming tax obligation calculators (UK-style rules).
//!
//! Pure with respect to their inputs: the same activity window and org
//! profile always produce the same obligations. Other jurisdictions swap the
//! rates and cadences via `TaxConfig` without touching the rules.

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

use crate::domain::facts::Precision;
use crate::domain::tax::{
    ActivitySummary, ObligationStatus, OrgTaxProfile, TaxKind, TaxObligation, VatCadence,
};
use crate::time::calendar;

#[derive(Debug, Clone, PartialEq)]
pub struct TaxConfig {
    pub vat_fallback_rate: f64,
    pub payroll_estimation_factor: f64,
    pub small_profits_rate: f64,
    pub main_rate: f64,
    pub main_rate_threshold: f64,
    pub vat_due_months: i32,
    pub vat_due_extra_days: i64,
    pub payroll_due_day: u32,
    pub corporate_due_months: i32,
    pub corporate_due_extra_days: i64,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            vat_fallback_rate: 0.20,
            payroll_estimation_factor: 0.30,
            small_profits_rate: 0.19,
            main_rate: 0.25,
            main_rate_threshold: 250_000.0,
            vat_due_months: 1,
            vat_due_extra_days: 7,
            payroll_due_day: 22,
            corporate_due_months: 9,
            corporate_due_extra_days: 1,
        }
    }
}

/// All obligations whose due date is worth knowing about for this horizon.
/// Corporate tax looks roughly a year ahead regardless of horizon; its due
/// date may land beyond it and is filtered out by the simulation, not here.
pub fn calculate_upcoming_obligations(
    today: NaiveDate,
    horizon_days: i64,
    profile: &OrgTaxProfile,
    activity: &ActivitySummary,
    config: &TaxConfig,
) -> Vec<TaxObligation> {
    let horizon_end = today + Duration::days(horizon_days);

    let mut out = Vec::new();
    out.extend(vat_obligations(today, horizon_end, profile, activity, config));
    out.extend(payroll_obligations(
        today,
        horizon_end,
        profile,
        activity,
        config,
    ));
    out.extend(corporate_obligations(today, profile, activity, config));

    out.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.kind.cmp(&b.kind)));
    out
}

/// VAT returns fall due one month plus seven days after each period end.
pub fn vat_obligations(
    today: NaiveDate,
    horizon_end: NaiveDate,
    profile: &OrgTaxProfile,
    activity: &ActivitySummary,
    config: &TaxConfig,
) -> Vec<TaxObligation> {
    if !profile.vat_registered {
        return Vec::new();
    }

    let (amount, precision) = match activity.vat_liability_balance {
        Some(balance) if balance > 0.0 => (balance, Precision::Precise),
        _ => {
            let monthly_sales = activity.trailing_3m_sales_receipts / 3.0;
            let annual_estimate = monthly_sales * 12.0 * config.vat_fallback_rate;
            (
                annual_estimate / profile.vat_cadence.periods_per_year() as f64,
                Precision::Estimated,
            )
        }
    };
    if amount <= 0.0 {
        return Vec::new();
    }

    // Period ends a couple of months back can still have a due date inside
    // the window, so the scan starts before today.
    let scan_from = calendar::add_months(today, -(config.vat_due_months + 1));
    let period_ends: Vec<NaiveDate> = match profile.vat_cadence {
        VatCadence::Monthly => calendar::month_ends_between(scan_from, horizon_end),
        VatCadence::Quarterly => calendar::quarter_ends_between(scan_from, horizon_end),
    };

    let months_per_period = profile.vat_cadence.months_per_period() as i32;
    period_ends
        .into_iter()
        .filter_map(|period_end| {
            let due = calendar::add_months(period_end, config.vat_due_months)
                + Duration::days(config.vat_due_extra_days);
            if due < today || due > horizon_end {
                return None;
            }
            let period_start =
                calendar::add_months(period_end + Duration::days(1), -months_per_period);
            Some(TaxObligation {
                kind: TaxKind::Vat,
                due_date: due,
                amount,
                period_start: Some(period_start),
                period_end: Some(period_end),
                reference: format!("VAT-{period_end}"),
                status: ObligationStatus::Pending,
                precision,
            })
        })
        .collect()
}

/// PAYE/NI falls due on the 22nd of the month following each month end.
pub fn payroll_obligations(
    today: NaiveDate,
    horizon_end: NaiveDate,
    profile: &OrgTaxProfile,
    activity: &ActivitySummary,
    config: &TaxConfig,
) -> Vec<TaxObligation> {
    let has_signal =
        activity.payroll_liability_balance.is_some() || activity.payroll_outflow_3m > 0.0;
    if !profile.employs_staff && !has_signal {
        return Vec::new();
    }

    let (amount, precision) = match activity.payroll_liability_balance {
        Some(balance) if balance > 0.0 => (balance, Precision::Precise),
        _ => (
            (activity.payroll_outflow_3m / 3.0) * config.payroll_estimation_factor,
            Precision::Estimated,
        ),
    };
    if amount <= 0.0 {
        return Vec::new();
    }

    let scan_from = calendar::add_months(today, -2);
    calendar::month_ends_between(scan_from, horizon_end)
        .into_iter()
        .filter_map(|month_end| {
            let due_day = config
                .payroll_due_day
                .min(calendar::days_in_month(month_end.year(), month_end.month()));
            let due_anchor = NaiveDate::from_ymd_opt(month_end.year(), month_end.month(), due_day)
                .expect("clamped due day is valid");
            let due = calendar::add_months(due_anchor, 1);
            if due < today || due > horizon_end {
                return None;
            }
            let period_start =
                NaiveDate::from_ymd_opt(month_end.year(), month_end.month(), 1)
                    .expect("valid first of month");
            Some(TaxObligation {
                kind: TaxKind::Payroll,
                due_date: due,
                amount,
                period_start: Some(period_start),
                period_end: Some(month_end),
                reference: format!("PAYE-{:04}-{:02}", month_end.year(), month_end.month()),
                status: ObligationStatus::Pending,
                precision,
            })
        })
        .collect()
}

/// Corporation tax: due 9 months + 1 day after each fiscal year end within
/// roughly the next year. Two-bracket rate on trailing-12-month profit.
pub fn corporate_obligations(
    today: NaiveDate,
    profile: &OrgTaxProfile,
    activity: &ActivitySummary,
    config: &TaxConfig,
) -> Vec<TaxObligation> {
    let profit = (activity.trailing_12m_receipts - activity.trailing_12m_payments).max(0.0);
    if profit <= 0.0 {
        return Vec::new();
    }

    let rate = if profit >= config.main_rate_threshold {
        config.main_rate
    } else {
        config.small_profits_rate
    };
    let amount = profit * rate;

    let lookahead_end = today + Duration::days(366);
    calendar::fiscal_year_ends_between(
        today,
        lookahead_end,
        profile.fiscal_year_end_month,
        profile.fiscal_year_end_day,
    )
    .into_iter()
    .map(|fy_end| {
        let due = calendar::add_months(fy_end, config.corporate_due_months)
            + Duration::days(config.corporate_due_extra_days);
        let period_start = calendar::add_months(fy_end + Duration::days(1), -12);
        TaxObligation {
            kind: TaxKind::Corporate,
            due_date: due,
            amount,
            period_start: Some(period_start),
            period_end: Some(fy_end),
            reference: format!("CT-FY{}", fy_end.year()),
            status: ObligationStatus::Pending,
            // Profit is inferred from trailing receipts minus payments.
            precision: Precision::Estimated,
        }
    })
    .collect()
}

/// Merge freshly derived obligations with already-persisted pending ones.
/// Identity is `(kind, due_date)`; the persisted record wins on conflict.
pub fn merge_obligations(
    derived: Vec<TaxObligation>,
    persisted: Vec<TaxObligation>,
) -> Vec<TaxObligation> {
    let mut by_key: BTreeMap<(TaxKind, NaiveDate), TaxObligation> = BTreeMap::new();
    for ob in derived {
        by_key.insert((ob.kind, ob.due_date), ob);
    }
    for ob in persisted {
        by_key.insert((ob.kind, ob.due_date), ob);
    }

    let mut out: Vec<TaxObligation> = by_key.into_values().collect();
    out.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.kind.cmp(&b.kind)));
    out
}
