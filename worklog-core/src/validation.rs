//! Centralized validation for usernames, passwords, and event labels.
//!
//! Validation applies to registration and event recording only. The
//! authentication path accepts arbitrary strings, including empty ones; a
//! malformed username is just a failed lookup there.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

/// Lazy-loaded username validation regex.
///
/// Usernames start with an alphanumeric character and may contain dots,
/// underscores, and dashes. Length is enforced separately for clearer
/// error messages.
static USERNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9._-]*$").expect("Invalid username regex pattern")
});

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::MissingField(
            "Username is required".to_string(),
        ));
    }

    if username.len() < 3 {
        return Err(ValidationError::InvalidUsername(
            "Username must be at least 3 characters long".to_string(),
        ));
    }

    if username.len() > 32 {
        return Err(ValidationError::InvalidUsername(
            "Username must be no more than 32 characters long".to_string(),
        ));
    }

    if USERNAME_REGEX.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::InvalidUsername(format!(
            "Invalid username format: {username}"
        )))
    }
}

/// Validates a password according to security requirements
///
/// # Password Requirements
///
/// - Minimum 8 characters
/// - Maximum 128 characters
/// - Cannot be empty or whitespace only
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::MissingField(
            "Password is required".to_string(),
        ));
    }

    if password.trim().is_empty() {
        return Err(ValidationError::InvalidPassword(
            "Password cannot be only whitespace".to_string(),
        ));
    }

    if password.len() < 8 {
        return Err(ValidationError::InvalidPassword(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(ValidationError::InvalidPassword(
            "Password must be no more than 128 characters long".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_event_type(event_type: &str) -> Result<(), ValidationError> {
    if event_type.is_empty() {
        return Err(ValidationError::MissingField(
            "Event type is required".to_string(),
        ));
    }

    if event_type.len() > 64 {
        return Err(ValidationError::InvalidEventType(
            "Event type must be no more than 64 characters long".to_string(),
        ));
    }

    if event_type.chars().any(char::is_control) {
        return Err(ValidationError::InvalidEventType(
            "Event type must not contain control characters".to_string(),
        ));
    }

    Ok(())
}
