pub mod cache;
pub mod domain;
pub mod engine;
pub mod loader;
pub mod storage;
pub mod tax;
pub mod time;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub database_url: Option<String>,
        pub sentry_dsn: Option<String>,
        pub default_horizon_days: Option<i64>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                database_url: std::env::var("DATABASE_URL").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                default_horizon_days: std::env::var("FORECAST_DEFAULT_HORIZON_DAYS")
                    .ok()
                    .and_then(|s| s.parse::<i64>().ok()),
            })
        }

        pub fn require_database_url(&self) -> anyhow::Result<&str> {
            self.database_url
                .as_deref()
                .context("DATABASE_URL is required")
        }
    }
}
