//! Database Layer
//!
//! `PostgreSQL` pool management plus the storage port. Handlers only ever see
//! `dyn Store`; [`PgStore`] backs production and [`MemoryStore`] backs tests.

pub mod memory;
mod models;
mod postgres;
mod store;

#[cfg(test)]
mod tests;

use std::time::Duration;

use anyhow::Result;
pub use memory::MemoryStore;
pub use models::*;
pub use postgres::PgStore;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
pub use store::*;
use tracing::info;

/// Create `PostgreSQL` connection pool with health configuration.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .min_connections(2)
        .max_connections(20)
        // Fail fast instead of hanging on pool exhaustion
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .test_before_acquire(true)
        .connect(database_url)
        .await?;

    info!("Connected to PostgreSQL");
    Ok(pool)
}

/// Run database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed");
    Ok(())
}
