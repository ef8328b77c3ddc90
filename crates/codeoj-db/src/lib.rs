//! # CodeOJ DB
//!
//! Database pool and migrations for the CodeOJ user service.
//!
//! # Example
//!
//! ```ignore
//! use codeoj_db::init_db_pool;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = init_db_pool(&std::env::var("DATABASE_URL")?).await?;
//!     // Use pool for database operations
//!     Ok(())
//! }
//! ```

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

/// Connects to PostgreSQL and applies pending migrations.
///
/// The returned pool is cheaply cloneable and should be shared through the
/// application state.
pub async fn init_db_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    run_migrations(&pool).await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations applied");
    Ok(())
}
