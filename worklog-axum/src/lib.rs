//! HTTP surface for the worklog service.
//!
//! Exposes the worklog API over axum with HTTP Basic authentication:
//!
//! - `POST /register`: create a user
//! - `POST /logevent`: append a work event (authenticated)
//! - `GET /logevent`: read the shared event log (authenticated)
//! - `GET /health`: storage health check
//!
//! Every authentication rejection (blocked address, cooldown, bad
//! credentials, unknown user) produces the same `401` response body, so an
//! external observer cannot probe the guard's state. The distinction is
//! preserved in the logs.

pub mod error;
pub mod extractors;
pub mod routes;
pub mod types;

pub use error::ApiError;
pub use extractors::{BasicCredentials, ClientAddr};
pub use routes::{AppState, create_router};
