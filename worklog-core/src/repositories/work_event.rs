use async_trait::async_trait;

use crate::{Error, NewWorkEvent, UserId, WorkEvent};

/// Repository for the append-only work-time log.
#[async_trait]
pub trait WorkEventRepository: Send + Sync + 'static {
    /// Append an event to the log
    async fn append(&self, event: NewWorkEvent) -> Result<WorkEvent, Error>;

    /// List every event, oldest first
    async fn list_all(&self) -> Result<Vec<WorkEvent>, Error>;

    /// List a single user's events, oldest first
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<WorkEvent>, Error>;
}
