use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use worklog::Worklog;
use worklog_core::repositories::RepositoryProvider;

use crate::{
    error::{ApiError, Result},
    extractors::{BasicCredentials, ClientAddr},
    types::{
        EventListResponse, HealthResponse, RecordEventRequest, RegisterRequest, UserResponse,
        WorkEventResponse,
    },
};

/// Shared state for the route handlers.
pub struct AppState<R: RepositoryProvider> {
    pub worklog: Arc<Worklog<R>>,
}

impl<R: RepositoryProvider> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            worklog: self.worklog.clone(),
        }
    }
}

pub fn create_router<R>(worklog: Arc<Worklog<R>>) -> Router
where
    R: RepositoryProvider + 'static,
{
    let state = AppState { worklog };

    Router::new()
        .route("/health", get(health_handler))
        .route("/register", post(register_handler))
        .route(
            "/logevent",
            post(record_event_handler).get(list_events_handler),
        )
        .with_state(state)
}

async fn health_handler<R>(State(state): State<AppState<R>>) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    state
        .worklog
        .health_check()
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

async fn register_handler<R>(
    State(state): State<AppState<R>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let user = state
        .worklog
        .register_user(&payload.username, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

async fn record_event_handler<R>(
    State(state): State<AppState<R>>,
    addr: ClientAddr,
    credentials: BasicCredentials,
    Json(payload): Json<RecordEventRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let user = state
        .worklog
        .authenticate(&addr.0, &credentials.username, &credentials.password)
        .await?;

    let event = state
        .worklog
        .record_event(&user.id, &payload.event_type, payload.timestamp)
        .await?;

    Ok((StatusCode::CREATED, Json(WorkEventResponse { event })))
}

async fn list_events_handler<R>(
    State(state): State<AppState<R>>,
    addr: ClientAddr,
    credentials: BasicCredentials,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    state
        .worklog
        .authenticate(&addr.0, &credentials.username, &credentials.password)
        .await?;

    let events = state.worklog.list_events().await?;

    Ok(Json(EventListResponse { events }))
}
