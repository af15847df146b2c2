use std::fmt;

#[derive(Debug, Clone)]
pub enum ForecastEngineError {
    InvalidHorizon { requested: i64 },
}

impl fmt::Display for ForecastEngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHorizon { requested } => {
                write!(f, "forecast horizon must be at least 1 day (got {requested})")
            }
        }
    }
}

impl std::error::Error for ForecastEngineError {}
