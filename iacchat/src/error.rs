use thiserror::Error;

pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid room: {0}")]
    InvalidRoom(String),

    /// Query or write against the store failed. Not retried here.
    #[error("Store error: {0}")]
    Transport(#[from] rusqlite::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store lock poisoned")]
    Poisoned,

    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}

impl ChatError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

/// Input rule violations, one variant per contact-add rule in evaluation order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid email")]
    InvalidEmail,

    #[error("You cannot add yourself as a contact")]
    OwnEmail,

    #[error("No user found with this email")]
    UnknownEmail,

    #[error("This user is already in your contacts")]
    AlreadyContact,

    #[error("{0}")]
    Invalid(String),
}
