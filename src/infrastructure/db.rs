use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Row, Sqlite, Transaction};
use std::str::FromStr;
use std::time::Duration;

use crate::domain::KanbanError;

pub async fn init_db(database_url: &str, max_connections: u32) -> Result<SqlitePool, KanbanError> {
    tracing::debug!("Connecting to database: {}", database_url);

    let connect_options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(connect_options)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database initialized with WAL mode enabled");

    Ok(pool)
}

/// Opens a write transaction that takes the database write lock up front.
///
/// A deferred transaction that reads before writing fails with
/// `SQLITE_BUSY` when another writer commits in between; an immediate one
/// waits for the lock instead.
pub async fn begin_write(
    pool: &SqlitePool,
) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

pub async fn journal_mode(pool: &SqlitePool) -> Result<String, sqlx::Error> {
    let row = sqlx::query("PRAGMA journal_mode")
        .fetch_one(pool)
        .await?;

    Ok(row.get::<String, _>(0))
}

pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_sqlx%' ESCAPE '\\' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await
}
