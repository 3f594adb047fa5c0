//! Process-wide PostgreSQL connection pool: created once at startup, closed at shutdown.

use log::{debug, info};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::Config;

/// Creates the pool and verifies the database answers before handing it out.
pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    info!(
        "Creating database connection pool (max_connections = {})",
        config.database_max_connections
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database_url)
        .await?;

    health_check(&pool).await?;
    Ok(pool)
}

/// Runs `SELECT 1` against the pool.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Applies pending migrations from `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await
}

pub async fn close_pool(pool: PgPool) {
    info!("Closing database connection pool");
    pool.close().await;
}
