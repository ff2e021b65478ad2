//! Embedded schema migrations.
//!
//! Statements are idempotent and applied in order, so `migrate` can run on
//! every startup.

use sqlx::SqlitePool;
use worklog_core::{Error, error::StorageError};

const MIGRATIONS: &[(&str, &str)] = &[
    (
        "create_users_table",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )
        "#,
    ),
    (
        "create_work_events_table",
        r#"
        CREATE TABLE IF NOT EXISTS work_events (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id),
            event_type TEXT NOT NULL,
            recorded_at INTEGER NOT NULL
        )
        "#,
    ),
    (
        "create_work_events_user_index",
        "CREATE INDEX IF NOT EXISTS idx_work_events_user_id ON work_events(user_id)",
    ),
    (
        "create_work_events_recorded_index",
        "CREATE INDEX IF NOT EXISTS idx_work_events_recorded_at ON work_events(recorded_at)",
    ),
];

pub(crate) async fn migrate(pool: &SqlitePool) -> Result<(), Error> {
    for (name, statement) in MIGRATIONS {
        tracing::debug!(migration = name, "applying migration");
        sqlx::query(statement).execute(pool).await.map_err(|e| {
            tracing::error!(migration = name, error = %e, "migration failed");
            Error::Storage(StorageError::Migration(format!("{name}: {e}")))
        })?;
    }

    Ok(())
}
