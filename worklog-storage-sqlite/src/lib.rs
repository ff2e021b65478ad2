//! SQLite storage backend for worklog.
//!
//! Provides [`SqliteRepositoryProvider`], a [`RepositoryProvider`]
//! implementation backed by a [`sqlx::SqlitePool`]. Timestamps are stored as
//! integer Unix seconds; identifiers as their string form.
//!
//! [`RepositoryProvider`]: worklog_core::repositories::RepositoryProvider

mod migrations;
pub mod repositories;

pub use repositories::{
    SqlitePasswordRepository, SqliteRepositoryProvider, SqliteUserRepository,
    SqliteWorkEventRepository,
};

use chrono::DateTime;
use worklog_core::{EventId, User, UserId, WorkEvent};

/// Row shape of the `users` table.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SqliteUser {
    id: String,
    username: String,
    #[allow(dead_code)]
    password_hash: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl From<SqliteUser> for User {
    fn from(row: SqliteUser) -> Self {
        User {
            id: UserId::new(&row.id),
            username: row.username,
            created_at: DateTime::from_timestamp(row.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::from_timestamp(row.updated_at, 0).unwrap_or_default(),
        }
    }
}

/// Row shape of the `work_events` table.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SqliteWorkEvent {
    id: String,
    user_id: String,
    event_type: String,
    recorded_at: i64,
}

impl From<SqliteWorkEvent> for WorkEvent {
    fn from(row: SqliteWorkEvent) -> Self {
        WorkEvent {
            id: EventId::new(&row.id),
            user_id: UserId::new(&row.user_id),
            event_type: row.event_type,
            recorded_at: DateTime::from_timestamp(row.recorded_at, 0).unwrap_or_default(),
        }
    }
}
