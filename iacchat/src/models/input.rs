//! Input DTOs with garde validation.
//!
//! These structs validate caller data before it reaches the store.

use garde::Validate;
use serde::Deserialize;

use crate::error::ValidationError;

/// Validation constants
pub const MAX_USER_ID_LENGTH: usize = 128;
pub const MAX_ROOM_ID_LENGTH: usize = 128;
pub const MAX_MESSAGE_LENGTH: usize = 10000;

/// Rejects blank content; the text is trimmed before it is stored
fn validate_not_blank(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("Message cannot be empty"));
    }
    Ok(())
}

/// Input for adding a contact by email
#[derive(Debug, Deserialize, Validate)]
#[garde(context(()))]
pub struct AddContactInput {
    #[garde(email)]
    pub email: String,
}

impl AddContactInput {
    pub fn new(email: &str) -> Self {
        Self {
            email: email.trim().to_string(),
        }
    }
}

/// Input for opening a direct room with another user
#[derive(Debug, Deserialize, Validate)]
#[garde(context(()))]
pub struct OpenDirectInput {
    #[garde(length(min = 1, max = MAX_USER_ID_LENGTH))]
    pub user_id: String,
}

/// Input for sending a message
#[derive(Debug, Deserialize, Validate)]
#[garde(context(()))]
pub struct SendMessageInput {
    #[garde(length(min = 1, max = MAX_ROOM_ID_LENGTH))]
    pub room_id: String,
    #[garde(custom(validate_not_blank), length(chars, max = MAX_MESSAGE_LENGTH))]
    pub content: String,
}

/// Helper trait to convert garde validation errors into [`ValidationError`]
pub trait ValidateExt {
    fn validate_input(&self) -> Result<(), ValidationError>;
}

impl<T: Validate<Context = ()>> ValidateExt for T {
    fn validate_input(&self) -> Result<(), ValidationError> {
        self.validate()
            .map_err(|e| ValidationError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_contact_email_format() {
        assert!(AddContactInput::new("ada@example.com").validate_input().is_ok());
        assert!(AddContactInput::new("  ada@example.com ").validate_input().is_ok());
        assert!(AddContactInput::new("not-an-email").validate_input().is_err());
        assert!(AddContactInput::new("").validate_input().is_err());
    }

    #[test]
    fn test_send_message_rejects_blank() {
        let input = SendMessageInput {
            room_id: "room1".to_string(),
            content: "   ".to_string(),
        };
        assert!(input.validate_input().is_err());

        let input = SendMessageInput {
            room_id: "room1".to_string(),
            content: "hi".to_string(),
        };
        assert!(input.validate_input().is_ok());
    }

    #[test]
    fn test_send_message_length_limit() {
        let input = SendMessageInput {
            room_id: "room1".to_string(),
            content: "a".repeat(MAX_MESSAGE_LENGTH + 1),
        };
        assert!(input.validate_input().is_err());

        let input = SendMessageInput {
            room_id: "room1".to_string(),
            content: "a".repeat(MAX_MESSAGE_LENGTH),
        };
        assert!(input.validate_input().is_ok());
    }

    #[test]
    fn test_open_direct_requires_id() {
        let input = OpenDirectInput {
            user_id: String::new(),
        };
        assert!(input.validate_input().is_err());
    }
}
