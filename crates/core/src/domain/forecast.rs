use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DayInflows {
    pub from_invoices: f64,
    pub from_recurring: f64,
    pub from_other: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DayOutflows {
    pub to_bills: f64,
    pub to_recurring: f64,
    pub to_tax: f64,
    pub to_inferred_patterns: f64,
    pub to_budget: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioBounds {
    pub best_case: f64,
    pub worst_case: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LowBalance,
    LargePayment,
    TaxDue,
    OverdueInvoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

/// Transient, embedded in its owning `DailyForecast`; never stored or
/// queried on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

/// One simulated day. `opening_balance` of day N+1 always equals
/// `closing_balance` of day N.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub opening_balance: f64,
    pub inflows: DayInflows,
    pub outflows: DayOutflows,
    pub closing_balance: f64,
    pub scenarios: ScenarioBounds,
    pub confidence_level: f64,
    pub alerts: Vec<Alert>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_forecast_round_trips_calendar_dates_exactly() {
        let day = DailyForecast {
            date: NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
            opening_balance: 10_000.0,
            inflows: DayInflows {
                from_invoices: 5_000.0,
                from_recurring: 0.0,
                from_other: 0.0,
                total: 5_000.0,
            },
            outflows: DayOutflows::default(),
            closing_balance: 15_000.0,
            scenarios: ScenarioBounds {
                best_case: 16_000.0,
                worst_case: 14_000.0,
            },
            confidence_level: 0.95,
            alerts: vec![Alert {
                kind: AlertKind::LargePayment,
                severity: AlertSeverity::Info,
                message: "Outflows of 12000.00 scheduled".to_string(),
                amount: Some(12_000.0),
            }],
        };

        let serialized = serde_json::to_string(&vec![day.clone()]).unwrap();
        // Calendar day, not a timestamp: no timezone to drift.
        assert!(serialized.contains("\"2026-02-28\""));
        let parsed: Vec<DailyForecast> = serde_json::from_str(&serialized).unwrap();
        assert_eq!(parsed, vec![day]);
    }
}
