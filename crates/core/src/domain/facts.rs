use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::tax::TaxObligation;

/// How a loaded or derived figure was obtained. `Degraded` means the source
/// was unreachable and a zero default was substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    Precise,
    Estimated,
    Degraded,
}

impl Precision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Precise => "precise",
            Self::Estimated => "estimated",
            Self::Degraded => "degraded",
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "precise" => Ok(Self::Precise),
            "estimated" => Ok(Self::Estimated),
            "degraded" => Ok(Self::Degraded),
            other => anyhow::bail!("unknown precision tag: {other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashPosition {
    pub cash: f64,
    pub accounts_receivable: f64,
    pub accounts_payable: f64,
}

impl CashPosition {
    pub fn zero() -> Self {
        Self {
            cash: 0.0,
            accounts_receivable: 0.0,
            accounts_payable: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Receivable,
    Payable,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receivable => "receivable",
            Self::Payable => "payable",
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "receivable" => Ok(Self::Receivable),
            "payable" => Ok(Self::Payable),
            other => anyhow::bail!("unknown direction: {other}"),
        }
    }
}

/// Unified shape for an open invoice (receivable) or bill (payable).
/// Loaded once per run; `amount_due > 0` is enforced by the loader filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenInvoiceLike {
    pub id: Uuid,
    pub counterparty_id: Uuid,
    pub counterparty_name: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount_due: f64,
    pub total_amount: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalUnit {
    Week,
    Month,
    Year,
}

impl IntervalUnit {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => anyhow::bail!("unknown interval unit: {other}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringSchedule {
    pub id: Uuid,
    pub direction: Direction,
    pub counterparty_id: Option<Uuid>,
    pub interval_unit: IntervalUnit,
    pub interval_count: u32,
    pub next_occurrence: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterpartyRole {
    Customer,
    Supplier,
}

impl CounterpartyRole {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "customer" => Ok(Self::Customer),
            "supplier" => Ok(Self::Supplier),
            other => anyhow::bail!("unknown counterparty role: {other}"),
        }
    }
}

/// Historical payment behavior aggregate for one counterparty. Shifts the
/// expected cash-movement date away from the contractual due date; absence
/// means "pays on the due date".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBehaviorPattern {
    pub counterparty_id: Uuid,
    pub role: CounterpartyRole,
    pub average_days_to_pay: f64,
    pub on_time_rate: f64,
    pub sample_size: i64,
}

impl PaymentBehaviorPattern {
    /// Whole-day offset applied to a contractual due date.
    pub fn day_offset(&self) -> i64 {
        self.average_days_to_pay.round() as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetCategory {
    Revenue,
    Expense,
}

impl BudgetCategory {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            other => anyhow::bail!("unknown budget category: {other}"),
        }
    }
}

/// One budgeted amount for one account in one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub account_code: String,
    pub category: BudgetCategory,
    pub month_period: String,
    pub budgeted_amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_position_is_the_degraded_sentinel() {
        let p = CashPosition::zero();
        assert_eq!(p.cash, 0.0);
        assert_eq!(p.accounts_receivable, 0.0);
        assert_eq!(p.accounts_payable, 0.0);
    }

    #[test]
    fn precision_tags_round_trip_through_storage_strings() {
        for tag in [Precision::Precise, Precision::Estimated, Precision::Degraded] {
            assert_eq!(Precision::parse(tag.as_str()).unwrap(), tag);
        }
        assert!(Precision::parse("exact").is_err());
    }

    #[test]
    fn direction_rejects_unknown_values() {
        assert!(Direction::parse("sideways").is_err());
        assert_eq!(Direction::parse("payable").unwrap(), Direction::Payable);
    }

    #[test]
    fn pattern_offset_rounds_to_whole_days() {
        let mut pattern = PaymentBehaviorPattern {
            counterparty_id: Uuid::nil(),
            role: CounterpartyRole::Customer,
            average_days_to_pay: 3.4,
            on_time_rate: 0.7,
            sample_size: 10,
        };
        assert_eq!(pattern.day_offset(), 3);
        pattern.average_days_to_pay = 3.6;
        assert_eq!(pattern.day_offset(), 4);
        pattern.average_days_to_pay = -1.2;
        assert_eq!(pattern.day_offset(), -1);
    }
}

/// Everything one forecast run loads. Treated as an immutable snapshot for
/// all simulated days; a concurrent write to the source store is never
/// observed mid-run.
#[derive(Debug, Clone)]
pub struct FactSnapshot {
    pub as_of: NaiveDate,
    pub position: CashPosition,
    pub position_precision: Precision,
    pub receivables: Vec<OpenInvoiceLike>,
    pub payables: Vec<OpenInvoiceLike>,
    pub schedules: Vec<RecurringSchedule>,
    pub patterns: BTreeMap<(Uuid, CounterpartyRole), PaymentBehaviorPattern>,
    pub budgets: Vec<BudgetLine>,
    pub obligations: Vec<TaxObligation>,
}
