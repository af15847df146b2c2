//! Engine parameters. Built once, passed in at construction, never mutated
//! afterwards, so alternative jurisdictions and currencies are a matter of
//! constructing a different config.

#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceWeights {
    pub confirmed_invoice: f64,
    pub repeating_schedule: f64,
    pub inferred_pattern: f64,
    pub budgeted: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            confirmed_invoice: 0.95,
            repeating_schedule: 0.98,
            inferred_pattern: 0.75,
            budgeted: 0.60,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioMultipliers {
    pub best_inflow: f64,
    pub best_outflow: f64,
    pub worst_inflow: f64,
    pub worst_outflow: f64,
}

impl Default for ScenarioMultipliers {
    fn default() -> Self {
        Self {
            best_inflow: 1.2,
            best_outflow: 0.9,
            worst_inflow: 0.8,
            worst_outflow: 1.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertThresholds {
    pub low_balance: f64,
    pub critical_balance: f64,
    pub large_payment: f64,
    pub overdue_days: i64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            low_balance: 5_000.0,
            critical_balance: 1_000.0,
            large_payment: 10_000.0,
            overdue_days: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub confidence: ConfidenceWeights,
    pub scenarios: ScenarioMultipliers,
    pub alerts: AlertThresholds,
    pub cache_ttl_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence: ConfidenceWeights::default(),
            scenarios: ScenarioMultipliers::default(),
            alerts: AlertThresholds::default(),
            cache_ttl_secs: 300,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        if let Ok(s) = std::env::var("FORECAST_CACHE_TTL_SECS") {
            if let Ok(n) = s.parse::<u64>() {
                out.cache_ttl_secs = n;
            }
        }

        if let Ok(s) = std::env::var("FORECAST_LOW_BALANCE_THRESHOLD") {
            if let Ok(n) = s.parse::<f64>() {
                out.alerts.low_balance = n;
            }
        }

        if let Ok(s) = std::env::var("FORECAST_LARGE_PAYMENT_THRESHOLD") {
            if let Ok(n) = s.parse::<f64>() {
                out.alerts.large_payment = n;
            }
        }

        out
    }
}
