use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    Clock, Error, NewWorkEvent, UserId, WorkEvent, repositories::WorkEventRepository,
    validation::validate_event_type,
};

/// Service for the work-time event log.
pub struct WorkEventService<R: WorkEventRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: WorkEventRepository> WorkEventService<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Append an event for a user.
    ///
    /// When the caller supplies no timestamp the service clock stamps the
    /// entry.
    pub async fn record_event(
        &self,
        user_id: &UserId,
        event_type: &str,
        recorded_at: Option<DateTime<Utc>>,
    ) -> Result<WorkEvent, Error> {
        validate_event_type(event_type)?;

        let recorded_at = recorded_at.unwrap_or_else(|| self.clock.now());
        let event = self
            .repository
            .append(NewWorkEvent::new(
                user_id.clone(),
                event_type.to_string(),
                recorded_at,
            ))
            .await?;

        tracing::debug!(event_id = %event.id, user_id = %user_id, event_type, "recorded work event");

        Ok(event)
    }

    /// Every event in the shared log, oldest first.
    pub async fn list_events(&self) -> Result<Vec<WorkEvent>, Error> {
        self.repository.list_all().await
    }

    /// One user's events, oldest first.
    pub async fn events_for_user(&self, user_id: &UserId) -> Result<Vec<WorkEvent>, Error> {
        self.repository.list_for_user(user_id).await
    }
}
