use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use worklog::{User, WorkEvent};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct RecordEventRequest {
    pub event_type: String,
    /// Optional client-supplied timestamp; the server clock is used when
    /// absent.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct WorkEventResponse {
    pub event: WorkEvent,
}

#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub events: Vec<WorkEvent>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
