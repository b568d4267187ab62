pub mod channels;
pub mod conversations;
pub mod direct_messages;
pub mod members;
pub mod messages;
pub mod pagination;
pub mod profiles;
pub mod servers;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;

pub async fn init_pool(database_path: &str) -> Result<SqlitePool, sqlx::Error> {
    // Ensure parent directory exists
    if let Some(parent) = Path::new(database_path).parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    apply_schema(&pool).await?;

    tracing::info!("Database initialized at {}", database_path);
    Ok(pool)
}

/// Create every table and index that does not exist yet.
pub async fn apply_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let schema = include_str!("schema.sql");

    // SQLx doesn't support multi-statement queries directly
    for statement in schema.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

/// RFC 3339 with fixed microsecond precision, so string order is time order.
pub fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// `?,?,?` for an `IN (...)` clause of `n` binds.
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}
