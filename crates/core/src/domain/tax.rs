use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::facts::Precision;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxKind {
    Vat,
    Payroll,
    Corporate,
}

impl TaxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vat => "vat",
            Self::Payroll => "payroll",
            Self::Corporate => "corporate",
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "vat" => Ok(Self::Vat),
            "payroll" => Ok(Self::Payroll),
            "corporate" => Ok(Self::Corporate),
            other => anyhow::bail!("unknown tax kind: {other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObligationStatus {
    Pending,
    Paid,
}

impl ObligationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => anyhow::bail!("unknown obligation status: {other}"),
        }
    }
}

/// A future tax payment. Identity is `(kind, due_date)`; duplicates are
/// collapsed before simulation and before persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxObligation {
    pub kind: TaxKind,
    pub due_date: NaiveDate,
    pub amount: f64,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub reference: String,
    pub status: ObligationStatus,
    pub precision: Precision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VatCadence {
    Monthly,
    Quarterly,
}

impl VatCadence {
    pub fn months_per_period(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
        }
    }

    pub fn periods_per_year(&self) -> u32 {
        match self {
            Self::Monthly => 12,
            Self::Quarterly => 4,
        }
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            other => anyhow::bail!("unknown VAT cadence: {other}"),
        }
    }
}

/// The organization's tax scheme, loaded from its single profile row.
#[derive(Debug, Clone, PartialEq)]
pub struct OrgTaxProfile {
    pub vat_registered: bool,
    pub vat_cadence: VatCadence,
    pub fiscal_year_end_month: u32,
    pub fiscal_year_end_day: u32,
    pub employs_staff: bool,
    pub vat_liability_account: Option<String>,
    pub payroll_liability_account: Option<String>,
}

impl Default for OrgTaxProfile {
    fn default() -> Self {
        Self {
            vat_registered: false,
            vat_cadence: VatCadence::Quarterly,
            fiscal_year_end_month: 3,
            fiscal_year_end_day: 31,
            employs_staff: false,
            vat_liability_account: None,
            payroll_liability_account: None,
        }
    }
}

/// Ledger aggregates the loader computes in SQL; everything the obligation
/// calculators need about recent financial activity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActivitySummary {
    pub vat_liability_balance: Option<f64>,
    pub payroll_liability_balance: Option<f64>,
    pub trailing_3m_sales_receipts: f64,
    pub payroll_outflow_3m: f64,
    pub trailing_12m_receipts: f64,
    pub trailing_12m_payments: f64,
}
