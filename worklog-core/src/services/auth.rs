//! Credential authentication behind the access guard.

use std::sync::Arc;

use crate::{
    Error, NewUser, User,
    alerts::{AlertBus, AlertEvent},
    error::AuthError,
    repositories::{PasswordRepository, UserRepository},
    services::AccessGuard,
    validation::{validate_password, validate_username},
};

/// Service for registration and credential verification.
///
/// Every authentication attempt is gated by the [`AccessGuard`]: blocked or
/// cooling-down addresses are rejected before any credential lookup happens.
/// Callers receive the internal failure taxonomy (`PermanentlyBlocked`,
/// `CoolingDown`, `InvalidCredentials`); collapsing those into one opaque
/// response is the transport layer's job.
pub struct AuthService<U: UserRepository, P: PasswordRepository> {
    users: Arc<U>,
    passwords: Arc<P>,
    guard: Arc<AccessGuard>,
    alerts: AlertBus,
}

impl<U: UserRepository, P: PasswordRepository> AuthService<U, P> {
    pub fn new(
        users: Arc<U>,
        passwords: Arc<P>,
        guard: Arc<AccessGuard>,
        alerts: AlertBus,
    ) -> Self {
        Self {
            users,
            passwords,
            guard,
            alerts,
        }
    }

    /// Register a new user with a password.
    ///
    /// Registration validates inputs; authentication does not. A taken
    /// username is an explicit error here, unlike the uniform rejection on
    /// the login path.
    pub async fn register_user(&self, username: &str, password: &str) -> Result<User, Error> {
        validate_username(username)?;
        validate_password(password)?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let password_hash = Self::hash_password(password);

        let user = self.users.create(NewUser::new(username.to_string())).await?;
        self.passwords
            .set_password_hash(&user.id, &password_hash)
            .await?;

        tracing::info!(user_id = %user.id, username, "registered new user");

        Ok(user)
    }

    /// Authenticate a user by username and password from a calling address.
    ///
    /// `username` and `password` may be arbitrary strings, including empty
    /// ones; an unknown username is indistinguishable from a wrong password
    /// in the returned error. The slow hash verification runs outside the
    /// guard's lock.
    pub async fn authenticate(
        &self,
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<User, Error> {
        if let Err(rejection) = self.guard.check_address(address) {
            tracing::info!(address, outcome = %rejection, "authentication attempt rejected by access guard");
            return Err(rejection.into());
        }

        let candidate = self.users.find_by_username(username).await?;

        let verified = match &candidate {
            Some(user) => match self.passwords.get_password_hash(&user.id).await? {
                Some(hash) => Self::verify_password(password, &hash),
                None => false,
            },
            None => {
                // Logged distinctly, returned uniformly.
                tracing::debug!(address, username, "authentication attempt for unknown username");
                false
            }
        };

        let Some(user) = candidate.filter(|_| verified) else {
            self.note_failure(address, username).await;
            return Err(AuthError::InvalidCredentials.into());
        };

        self.guard.record_success(address);

        tracing::debug!(address, user_id = %user.id, "authentication succeeded");

        Ok(user)
    }

    /// Record a failed attempt with the guard and raise the matching alerts.
    ///
    /// Alert delivery failures are logged by the bus and never propagated;
    /// they must not change the authentication outcome.
    async fn note_failure(&self, address: &str, username: &str) {
        let tally = self.guard.record_failure(address);

        let _ = self
            .alerts
            .emit(&AlertEvent::LoginFailed {
                address: address.to_string(),
                username: username.to_string(),
                failed_attempts: tally.failure_count,
                timestamp: tally.at,
            })
            .await;

        if tally.newly_blocked {
            tracing::error!(
                address,
                failed_attempts = tally.failure_count,
                "too many failed authentication attempts, address permanently blocked"
            );

            let _ = self
                .alerts
                .emit(&AlertEvent::AddressBlocked {
                    address: address.to_string(),
                    failed_attempts: tally.failure_count,
                    timestamp: tally.at,
                })
                .await;
        }
    }

    /// Hash a password using argon2
    fn hash_password(password: &str) -> String {
        use password_auth::generate_hash;
        generate_hash(password)
    }

    /// Verify a password against a hash
    fn verify_password(password: &str, hash: &str) -> bool {
        use password_auth::verify_password;
        verify_password(password, hash).is_ok()
    }
}
