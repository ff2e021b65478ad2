//! Adapters that wrap a [`RepositoryProvider`] and implement the individual
//! repository traits, so services can be generic over a single provider.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    Error, NewUser, NewWorkEvent, User, UserId, WorkEvent,
    repositories::{
        PasswordRepository, RepositoryProvider, UserRepository, WorkEventRepository,
    },
};

pub struct UserRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> UserRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> UserRepository for UserRepositoryAdapter<R> {
    async fn create(&self, user: NewUser) -> Result<User, Error> {
        self.provider.user().create(user).await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.provider.user().find_by_id(id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        self.provider.user().find_by_username(username).await
    }

    async fn delete(&self, id: &UserId) -> Result<(), Error> {
        self.provider.user().delete(id).await
    }
}

pub struct PasswordRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> PasswordRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> PasswordRepository for PasswordRepositoryAdapter<R> {
    async fn set_password_hash(&self, user_id: &UserId, hash: &str) -> Result<(), Error> {
        self.provider.password().set_password_hash(user_id, hash).await
    }

    async fn get_password_hash(&self, user_id: &UserId) -> Result<Option<String>, Error> {
        self.provider.password().get_password_hash(user_id).await
    }

    async fn remove_password_hash(&self, user_id: &UserId) -> Result<(), Error> {
        self.provider.password().remove_password_hash(user_id).await
    }
}

pub struct WorkEventRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> WorkEventRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> WorkEventRepository for WorkEventRepositoryAdapter<R> {
    async fn append(&self, event: NewWorkEvent) -> Result<WorkEvent, Error> {
        self.provider.work_event().append(event).await
    }

    async fn list_all(&self) -> Result<Vec<WorkEvent>, Error> {
        self.provider.work_event().list_all().await
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<WorkEvent>, Error> {
        self.provider.work_event().list_for_user(user_id).await
    }
}
