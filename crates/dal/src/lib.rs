//! Persistence for inventory records: one table per component type behind the
//! [`InventoryStore`] trait, with PostgreSQL and in-memory implementations.

mod error;
mod memory;
mod postgres;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::InventoryStore;

use settings::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};

pub async fn get_db_pool(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await
        .map_err(|e| StoreError::sqlx(format!("connecting to database at {}", config.url), e))
}

/// Applies any pending migrations from `migrations/`.
pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
    tracing::warn!("Migrations running");
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}
