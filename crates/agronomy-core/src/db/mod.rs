//! Postgres storage for accounts, stored predictions and contact messages.

pub mod contacts;
pub mod predictions;
pub mod users;

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub type DbPool = Pool<Postgres>;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn connect(database_url: &str) -> Result<DbPool> {
    connect_with(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Opens the pool eagerly so a bad `DATABASE_URL` fails at startup rather
/// than on the first form submission.
pub async fn connect_with(database_url: &str, max_connections: u32) -> Result<DbPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .with_context(|| format!("failed to open a pool of {max_connections} Postgres connections"))
}

/// Applies the `users`, `predictions` and `contacts` schema.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("failed to apply agronomy schema migrations")
}
