use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Alert error: {0}")]
    Alert(#[from] AlertError),
}

/// Outcomes of the authentication path.
///
/// `PermanentlyBlocked`, `CoolingDown`, `InvalidCredentials` and
/// `UserNotFound` must all reach the wire as the same opaque rejection;
/// the distinction exists for internal logging only.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Address permanently blocked")]
    PermanentlyBlocked,

    #[error("Address cooling down after failed attempt")]
    CoolingDown,

    #[error("Password hash error: {0}")]
    PasswordHash(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Record not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid event type: {0}")]
    InvalidEventType(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Alert handler error: {0}")]
    Handler(String),
}

impl Error {
    /// True for every outcome that must surface as a uniform
    /// "authentication failed" to the caller.
    pub fn is_credential_rejection(&self) -> bool {
        matches!(
            self,
            Error::Auth(AuthError::InvalidCredentials)
                | Error::Auth(AuthError::UserNotFound)
                | Error::Auth(AuthError::PermanentlyBlocked)
                | Error::Auth(AuthError::CoolingDown)
        )
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let auth_error = Error::Auth(AuthError::InvalidCredentials);
        assert_eq!(
            auth_error.to_string(),
            "Authentication error: Invalid credentials"
        );

        let blocked = Error::Auth(AuthError::PermanentlyBlocked);
        assert_eq!(
            blocked.to_string(),
            "Authentication error: Address permanently blocked"
        );

        let storage_error = Error::Storage(StorageError::NotFound);
        assert_eq!(storage_error.to_string(), "Storage error: Record not found");
    }

    #[test]
    fn test_is_credential_rejection() {
        assert!(Error::Auth(AuthError::InvalidCredentials).is_credential_rejection());
        assert!(Error::Auth(AuthError::UserNotFound).is_credential_rejection());
        assert!(Error::Auth(AuthError::PermanentlyBlocked).is_credential_rejection());
        assert!(Error::Auth(AuthError::CoolingDown).is_credential_rejection());
        assert!(!Error::Auth(AuthError::UserAlreadyExists).is_credential_rejection());
        assert!(!Error::Storage(StorageError::NotFound).is_credential_rejection());
    }

    #[test]
    fn test_error_from_conversions() {
        let auth_error = AuthError::CoolingDown;
        let error: Error = auth_error.into();
        assert!(matches!(error, Error::Auth(AuthError::CoolingDown)));

        let validation_error = ValidationError::InvalidUsername("a".to_string());
        let error: Error = validation_error.into();
        assert!(matches!(
            error,
            Error::Validation(ValidationError::InvalidUsername(_))
        ));
    }
}
