pub mod facts;
pub mod forecasts;
pub mod lock;
pub mod obligations;

use anyhow::Context;

pub async fn migrate(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("sqlx migrations failed")?;
    Ok(())
}
