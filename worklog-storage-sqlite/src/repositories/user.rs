use async_trait::async_trait;
use sqlx::SqlitePool;
use worklog_core::{
    Error, NewUser, User, UserId, error::StorageError, repositories::UserRepository,
};

use crate::SqliteUser;

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, Error> {
        let now = chrono::Utc::now().timestamp();

        let sqlite_user = sqlx::query_as::<_, SqliteUser>(
            r#"
            INSERT INTO users (id, username, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING *
            "#,
        )
        .bind(user.id.as_str())
        .bind(&user.username)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::Storage(StorageError::Constraint(format!(
                    "username already taken: {}",
                    user.username
                )))
            }
            _ => Error::Storage(StorageError::Database(e.to_string())),
        })?;

        Ok(sqlite_user.into())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error> {
        let sqlite_user = sqlx::query_as::<_, SqliteUser>("SELECT * FROM users WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(sqlite_user.map(|u| u.into()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        let sqlite_user =
            sqlx::query_as::<_, SqliteUser>("SELECT * FROM users WHERE username = ?1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(sqlite_user.map(|u| u.into()))
    }

    async fn delete(&self, id: &UserId) -> Result<(), Error> {
        sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(StorageError::Database(e.to_string())))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create pool");
        crate::migrations::migrate(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let pool = setup_test_db().await;
        let repo = SqliteUserRepository::new(pool);

        let created = repo
            .create(NewUser::new("alice".to_string()))
            .await
            .expect("Failed to create user");
        assert_eq!(created.username, "alice");
        assert!(created.id.is_valid());

        let by_id = repo.find_by_id(&created.id).await.unwrap();
        assert!(by_id.is_some());

        let by_username = repo.find_by_username("alice").await.unwrap();
        assert_eq!(by_username.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_find_missing_user_returns_none() {
        let pool = setup_test_db().await;
        let repo = SqliteUserRepository::new(pool);

        assert!(repo.find_by_username("ghost").await.unwrap().is_none());
        assert!(
            repo.find_by_id(&UserId::new_random())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_is_constraint_error() {
        let pool = setup_test_db().await;
        let repo = SqliteUserRepository::new(pool);

        repo.create(NewUser::new("alice".to_string())).await.unwrap();
        let result = repo.create(NewUser::new("alice".to_string())).await;

        assert!(matches!(
            result.unwrap_err(),
            Error::Storage(StorageError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let pool = setup_test_db().await;
        let repo = SqliteUserRepository::new(pool);

        let user = repo.create(NewUser::new("alice".to_string())).await.unwrap();
        repo.delete(&user.id).await.unwrap();

        assert!(repo.find_by_id(&user.id).await.unwrap().is_none());
    }
}
