//! Input validation constants and utilities
//!
//! Note: Most validation is handled by garde in models/input.rs.
//! These functions cover identifiers that arrive outside a DTO (QR payloads, room ids).

use crate::error::ValidationError;
use crate::models::input::MAX_USER_ID_LENGTH;

/// Validate a user or room identifier
/// Identifiers are opaque but must be non-blank, bounded and free of path separators
pub fn validate_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::Invalid("ID cannot be empty".to_string()));
    }
    if id.len() > MAX_USER_ID_LENGTH {
        return Err(ValidationError::Invalid(format!(
            "ID too long (max {} characters)",
            MAX_USER_ID_LENGTH
        )));
    }
    if id.chars().any(|c| c.is_control() || c.is_whitespace() || c == '/') {
        return Err(ValidationError::Invalid(
            "ID contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

/// Normalize an email for comparison
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
