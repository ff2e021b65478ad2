//! Repository traits for the data access layer
//!
//! This module defines the repository interfaces that services use to
//! interact with storage.
//!
//! # Trait Hierarchy
//!
//! The repository system uses a composable trait hierarchy:
//!
//! - Individual `*Repository` traits define the operations for each data domain
//! - Individual `*RepositoryProvider` traits provide access to each repository type
//! - [`RepositoryProvider`] is a supertrait combining all provider traits plus
//!   lifecycle methods
//!
//! This design allows storage backends to implement only the repositories they
//! need and share repository implementations across backend types.

pub mod adapter;
pub mod password;
pub mod user;
pub mod work_event;

pub use adapter::{PasswordRepositoryAdapter, UserRepositoryAdapter, WorkEventRepositoryAdapter};
pub use password::PasswordRepository;
pub use user::UserRepository;
pub use work_event::WorkEventRepository;

use async_trait::async_trait;

use crate::Error;

/// Provider trait for user repository access.
pub trait UserRepositoryProvider: Send + Sync + 'static {
    /// The user repository implementation type
    type UserRepo: UserRepository;

    /// Get the user repository
    fn user(&self) -> &Self::UserRepo;
}

/// Provider trait for password repository access.
pub trait PasswordRepositoryProvider: Send + Sync + 'static {
    /// The password repository implementation type
    type PasswordRepo: PasswordRepository;

    /// Get the password repository
    fn password(&self) -> &Self::PasswordRepo;
}

/// Provider trait for work-event repository access.
pub trait WorkEventRepositoryProvider: Send + Sync + 'static {
    /// The work-event repository implementation type
    type WorkEventRepo: WorkEventRepository;

    /// Get the work-event repository
    fn work_event(&self) -> &Self::WorkEventRepo;
}

/// Provider trait that storage implementations must implement to provide all
/// repositories, plus lifecycle methods for migrations and health checks.
///
/// # Implementing a Custom Storage Backend
///
/// 1. Implement each individual `*Repository` trait for your backend
/// 2. Implement each individual `*RepositoryProvider` trait
/// 3. Implement the `RepositoryProvider` trait with `migrate()` and
///    `health_check()`
#[async_trait]
pub trait RepositoryProvider:
    UserRepositoryProvider + PasswordRepositoryProvider + WorkEventRepositoryProvider
{
    /// Run migrations for all repositories
    async fn migrate(&self) -> Result<(), Error>;

    /// Health check for all repositories
    async fn health_check(&self) -> Result<(), Error>;
}
