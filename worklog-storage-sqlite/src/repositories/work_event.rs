use async_trait::async_trait;
use sqlx::SqlitePool;
use worklog_core::{
    Error, NewWorkEvent, UserId, WorkEvent, error::StorageError,
    repositories::WorkEventRepository,
};

use crate::SqliteWorkEvent;

pub struct SqliteWorkEventRepository {
    pool: SqlitePool,
}

impl SqliteWorkEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkEventRepository for SqliteWorkEventRepository {
    async fn append(&self, event: NewWorkEvent) -> Result<WorkEvent, Error> {
        let row = sqlx::query_as::<_, SqliteWorkEvent>(
            r#"
            INSERT INTO work_events (id, user_id, event_type, recorded_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING *
            "#,
        )
        .bind(event.id.as_str())
        .bind(event.user_id.as_str())
        .bind(&event.event_type)
        .bind(event.recorded_at.timestamp())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to append work event");
            Error::Storage(StorageError::Database(e.to_string()))
        })?;

        Ok(row.into())
    }

    async fn list_all(&self) -> Result<Vec<WorkEvent>, Error> {
        let rows = sqlx::query_as::<_, SqliteWorkEvent>(
            "SELECT * FROM work_events ORDER BY recorded_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<WorkEvent>, Error> {
        let rows = sqlx::query_as::<_, SqliteWorkEvent>(
            "SELECT * FROM work_events WHERE user_id = ?1 ORDER BY recorded_at ASC, id ASC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::SqliteUserRepository;
    use chrono::{Duration, Utc};
    use worklog_core::{NewUser, User, repositories::UserRepository};

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create pool");
        crate::migrations::migrate(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    async fn create_test_user(pool: &SqlitePool, username: &str) -> User {
        SqliteUserRepository::new(pool.clone())
            .create(NewUser::new(username.to_string()))
            .await
            .expect("Failed to create test user")
    }

    #[tokio::test]
    async fn test_append_and_list() {
        let pool = setup_test_db().await;
        let user = create_test_user(&pool, "alice").await;
        let repo = SqliteWorkEventRepository::new(pool);

        let start = Utc::now() - Duration::hours(1);
        repo.append(NewWorkEvent::new(
            user.id.clone(),
            "work_start".to_string(),
            start,
        ))
        .await
        .unwrap();
        repo.append(NewWorkEvent::new(
            user.id.clone(),
            "work_stop".to_string(),
            start + Duration::minutes(30),
        ))
        .await
        .unwrap();

        let events = repo.list_all().await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "work_start");
        assert_eq!(events[1].event_type, "work_stop");
        assert!(events[0].recorded_at < events[1].recorded_at);
    }

    #[tokio::test]
    async fn test_list_for_user_filters_by_user() {
        let pool = setup_test_db().await;
        let alice = create_test_user(&pool, "alice").await;
        let bob = create_test_user(&pool, "bob").await;
        let repo = SqliteWorkEventRepository::new(pool);

        let now = Utc::now();
        repo.append(NewWorkEvent::new(
            alice.id.clone(),
            "work_start".to_string(),
            now,
        ))
        .await
        .unwrap();
        repo.append(NewWorkEvent::new(
            bob.id.clone(),
            "work_start".to_string(),
            now,
        ))
        .await
        .unwrap();

        let alice_events = repo.list_for_user(&alice.id).await.unwrap();
        assert_eq!(alice_events.len(), 1);
        assert_eq!(alice_events[0].user_id, alice.id);

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_list_empty_log() {
        let pool = setup_test_db().await;
        let repo = SqliteWorkEventRepository::new(pool);

        assert!(repo.list_all().await.unwrap().is_empty());
    }
}
