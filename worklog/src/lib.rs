//! # Worklog
//!
//! Worklog is a small work-time tracking service core: users authenticate
//! with a username and password, and every authenticated user can append
//! entries to a shared work-time event log.
//!
//! The part that earns its keep is the brute force defense. Every
//! authentication attempt is bucketed by calling address; repeated failures
//! force a cooldown between attempts, and an address that keeps failing is
//! blocked for the remaining life of the process, correct credentials or
//! not.
//!
//! [`Worklog`] is the coordinator: construct it once at service start with a
//! repository provider, inject it into request handling, and use it for every
//! operation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use worklog::Worklog;
//! use worklog_storage_sqlite::SqliteRepositoryProvider;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
//!     let repositories = Arc::new(SqliteRepositoryProvider::new(pool));
//!
//!     let worklog = Worklog::new(repositories);
//!     worklog.migrate().await.unwrap();
//!
//!     let user = worklog
//!         .register_user("alice", "correct-horse-battery")
//!         .await
//!         .unwrap();
//!     let authed = worklog
//!         .authenticate("203.0.113.7", "alice", "correct-horse-battery")
//!         .await
//!         .unwrap();
//!     assert_eq!(user.id, authed.id);
//! }
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use worklog_core::{
    alerts::AlertBus,
    error::AuthError,
    repositories::{
        PasswordRepositoryAdapter, RepositoryProvider, UserRepositoryAdapter,
        WorkEventRepositoryAdapter,
    },
    services::{AccessGuard, AuthService, UserService, WorkEventService},
};

/// Re-export core types from worklog_core
///
/// These types are commonly used when working with the Worklog API.
pub use worklog_core::{
    Clock, EventId, SystemClock, User, UserId, WorkEvent,
    alerts::{AlertEvent, AlertHandler},
    error::{AlertError, AuthError},
    services::GuardConfig,
};

/// Re-export storage backends
///
/// These storage implementations are available when the corresponding
/// feature is enabled.
#[cfg(feature = "sqlite")]
pub use worklog_storage_sqlite::SqliteRepositoryProvider;

/// Errors that can occur when using Worklog.
#[derive(Debug, thiserror::Error)]
pub enum WorklogError {
    /// An authentication outcome, including guard rejections
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Invalid input during registration or event recording
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error when interacting with storage
    #[error("Storage error: {0}")]
    Storage(String),

    /// Error delivering a security alert
    #[error("Alert error: {0}")]
    Alert(String),
}

impl From<worklog_core::Error> for WorklogError {
    fn from(err: worklog_core::Error) -> Self {
        match err {
            worklog_core::Error::Auth(e) => WorklogError::Auth(e),
            worklog_core::Error::Validation(e) => WorklogError::Validation(e.to_string()),
            worklog_core::Error::Storage(e) => WorklogError::Storage(e.to_string()),
            worklog_core::Error::Alert(e) => WorklogError::Alert(e.to_string()),
        }
    }
}

impl WorklogError {
    /// True for every outcome that must reach the wire as one opaque
    /// "authentication failed" response.
    pub fn is_credential_rejection(&self) -> bool {
        matches!(
            self,
            WorklogError::Auth(AuthError::InvalidCredentials)
                | WorklogError::Auth(AuthError::UserNotFound)
                | WorklogError::Auth(AuthError::PermanentlyBlocked)
                | WorklogError::Auth(AuthError::CoolingDown)
        )
    }
}

/// The central coordinator for authentication and the work-time log.
///
/// `Worklog` wires the services to a repository provider and owns the
/// process-lifetime guard state. Construct one instance at service start and
/// share it; the guard's lockout table is never persisted, so a restart
/// starts every address with a clean slate.
pub struct Worklog<R: RepositoryProvider> {
    repositories: Arc<R>,
    guard_config: GuardConfig,
    clock: Arc<dyn Clock>,
    alerts: AlertBus,
    user_service: Arc<UserService<UserRepositoryAdapter<R>>>,
    auth_service: Arc<AuthService<UserRepositoryAdapter<R>, PasswordRepositoryAdapter<R>>>,
    event_service: Arc<WorkEventService<WorkEventRepositoryAdapter<R>>>,
}

impl<R: RepositoryProvider> Worklog<R> {
    /// Create a new Worklog instance with a repository provider.
    ///
    /// Uses the default [`GuardConfig`] and the system clock; see
    /// [`Worklog::with_guard_config`] and [`Worklog::with_clock`].
    pub fn new(repositories: Arc<R>) -> Self {
        Self::assemble(
            repositories,
            GuardConfig::default(),
            Arc::new(SystemClock),
            AlertBus::new(),
        )
    }

    /// Replace the guard configuration.
    ///
    /// This discards any lockout state accumulated so far, so call it during
    /// startup, before serving requests.
    pub fn with_guard_config(self, config: GuardConfig) -> Self {
        Self::assemble(self.repositories, config, self.clock, self.alerts)
    }

    /// Replace the time source, primarily for tests.
    ///
    /// Like [`Worklog::with_guard_config`], this resets guard state.
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        Self::assemble(self.repositories, self.guard_config, clock, self.alerts)
    }

    fn assemble(
        repositories: Arc<R>,
        guard_config: GuardConfig,
        clock: Arc<dyn Clock>,
        alerts: AlertBus,
    ) -> Self {
        let user_repo = Arc::new(UserRepositoryAdapter::new(repositories.clone()));
        let password_repo = Arc::new(PasswordRepositoryAdapter::new(repositories.clone()));
        let event_repo = Arc::new(WorkEventRepositoryAdapter::new(repositories.clone()));

        let guard = Arc::new(AccessGuard::new(guard_config.clone(), clock.clone()));

        let user_service = Arc::new(UserService::new(user_repo.clone()));
        let auth_service = Arc::new(AuthService::new(
            user_repo,
            password_repo,
            guard,
            alerts.clone(),
        ));
        let event_service = Arc::new(WorkEventService::new(event_repo, clock.clone()));

        Self {
            repositories,
            guard_config,
            clock,
            alerts,
            user_service,
            auth_service,
            event_service,
        }
    }

    /// The active guard configuration.
    pub fn guard_config(&self) -> &GuardConfig {
        &self.guard_config
    }

    /// Register a sink for security alerts (failed logins, blocked
    /// addresses).
    pub async fn register_alert_handler(&self, handler: Arc<dyn AlertHandler>) {
        self.alerts.register(handler).await;
    }

    /// Run migrations for all repositories
    pub async fn migrate(&self) -> Result<(), WorklogError> {
        self.repositories
            .migrate()
            .await
            .map_err(WorklogError::from)
    }

    /// Health check for all repositories
    pub async fn health_check(&self) -> Result<(), WorklogError> {
        self.repositories
            .health_check()
            .await
            .map_err(WorklogError::from)
    }

    /// Register a new user with a username and password.
    pub async fn register_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, WorklogError> {
        self.auth_service
            .register_user(username, password)
            .await
            .map_err(WorklogError::from)
    }

    /// Authenticate a user from a calling address.
    ///
    /// The returned error distinguishes guard rejections from bad
    /// credentials for logging; use
    /// [`WorklogError::is_credential_rejection`] when mapping to a wire
    /// response so all of them collapse into one.
    pub async fn authenticate(
        &self,
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<User, WorklogError> {
        self.auth_service
            .authenticate(address, username, password)
            .await
            .map_err(WorklogError::from)
    }

    /// Get a user by their ID
    pub async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, WorklogError> {
        self.user_service
            .get_user(user_id)
            .await
            .map_err(WorklogError::from)
    }

    /// Get a user by username
    pub async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, WorklogError> {
        self.user_service
            .get_user_by_username(username)
            .await
            .map_err(WorklogError::from)
    }

    /// Append a work event for a user.
    ///
    /// When `recorded_at` is `None` the event is stamped with the service
    /// clock.
    pub async fn record_event(
        &self,
        user_id: &UserId,
        event_type: &str,
        recorded_at: Option<DateTime<Utc>>,
    ) -> Result<WorkEvent, WorklogError> {
        self.event_service
            .record_event(user_id, event_type, recorded_at)
            .await
            .map_err(WorklogError::from)
    }

    /// Every event in the shared log, oldest first.
    pub async fn list_events(&self) -> Result<Vec<WorkEvent>, WorklogError> {
        self.event_service
            .list_events()
            .await
            .map_err(WorklogError::from)
    }

    /// One user's events, oldest first.
    pub async fn events_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<WorkEvent>, WorklogError> {
        self.event_service
            .events_for_user(user_id)
            .await
            .map_err(WorklogError::from)
    }
}
