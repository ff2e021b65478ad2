//! Repository implementations for SQLite storage

pub mod password;
pub mod user;
pub mod work_event;

pub use password::SqlitePasswordRepository;
pub use user::SqliteUserRepository;
pub use work_event::SqliteWorkEventRepository;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use worklog_core::{
    Error,
    error::StorageError,
    repositories::{
        PasswordRepositoryProvider, RepositoryProvider, UserRepositoryProvider,
        WorkEventRepositoryProvider,
    },
};

/// Repository provider implementation for SQLite
///
/// This struct implements all the individual repository provider traits
/// as well as the unified `RepositoryProvider` trait.
pub struct SqliteRepositoryProvider {
    pool: SqlitePool,
    user: Arc<SqliteUserRepository>,
    password: Arc<SqlitePasswordRepository>,
    work_event: Arc<SqliteWorkEventRepository>,
}

impl SqliteRepositoryProvider {
    pub fn new(pool: SqlitePool) -> Self {
        let user = Arc::new(SqliteUserRepository::new(pool.clone()));
        let password = Arc::new(SqlitePasswordRepository::new(pool.clone()));
        let work_event = Arc::new(SqliteWorkEventRepository::new(pool.clone()));

        Self {
            pool,
            user,
            password,
            work_event,
        }
    }
}

impl UserRepositoryProvider for SqliteRepositoryProvider {
    type UserRepo = SqliteUserRepository;

    fn user(&self) -> &Self::UserRepo {
        &self.user
    }
}

impl PasswordRepositoryProvider for SqliteRepositoryProvider {
    type PasswordRepo = SqlitePasswordRepository;

    fn password(&self) -> &Self::PasswordRepo {
        &self.password
    }
}

impl WorkEventRepositoryProvider for SqliteRepositoryProvider {
    type WorkEventRepo = SqliteWorkEventRepository;

    fn work_event(&self) -> &Self::WorkEventRepo {
        &self.work_event
    }
}

#[async_trait]
impl RepositoryProvider for SqliteRepositoryProvider {
    async fn migrate(&self) -> Result<(), Error> {
        crate::migrations::migrate(&self.pool).await
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Connection(e.to_string())))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrate_and_health_check() {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create pool");
        let provider = SqliteRepositoryProvider::new(pool);

        provider.migrate().await.expect("Failed to migrate");
        // Re-running is fine, the statements are idempotent
        provider.migrate().await.expect("Failed to re-migrate");

        provider.health_check().await.expect("Health check failed");
    }
}
