//! Work-time log events.
//!
//! A [`WorkEvent`] is one entry in the shared time log: who, what kind of
//! event (`work_start`, `work_stop`, ...), and when. Events are append-only;
//! there is no update or delete path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    UserId,
    id::{generate_prefixed_id, validate_prefixed_id},
};

/// A unique, stable identifier for a logged event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: &str) -> Self {
        EventId(id.to_string())
    }

    pub fn new_random() -> Self {
        EventId(generate_prefixed_id("evt"))
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_valid(&self) -> bool {
        validate_prefixed_id(&self.0, "evt")
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new_random()
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recorded entry in the work-time log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkEvent {
    pub id: EventId,

    /// The user this entry belongs to.
    pub user_id: UserId,

    /// Free-form label, e.g. `work_start` or `work_stop`.
    pub event_type: String,

    pub recorded_at: DateTime<Utc>,
}

/// Payload for appending an event to the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkEvent {
    pub id: EventId,
    pub user_id: UserId,
    pub event_type: String,
    pub recorded_at: DateTime<Utc>,
}

impl NewWorkEvent {
    pub fn new(user_id: UserId, event_type: String, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: EventId::new_random(),
            user_id,
            event_type,
            recorded_at,
        }
    }
}
