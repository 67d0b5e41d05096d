pub mod customer_repo;
pub mod subscription_repo;

use {
    crate::{config::Config, domain::error::BillingError},
    sqlx::{PgPool, postgres::PgPoolOptions},
    std::time::Duration,
};

pub async fn connect(config: &Config) -> Result<PgPool, BillingError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(config.database_acquire_timeout_secs))
        .connect(&config.database_url)
        .await?;
    tracing::info!(
        max_connections = config.database_max_connections,
        "connected to database"
    );
    Ok(pool)
}

/// Apply the crate's bundled migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), BillingError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| BillingError::Database(e.into()))?;
    Ok(())
}
