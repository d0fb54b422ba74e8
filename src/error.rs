use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

/// A move the board refuses before touching any state.
///
/// The `Display` text is what the user sees in the error notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("Invalid status transition")]
    InvalidTransition { from: String, to: String },

    #[error("Personal completed tasks cannot be moved")]
    PersonalCompleted,
}

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("No column for status: {0}")]
    ColumnNotFound(String),

    #[error("Invalid card ID: {0}")]
    InvalidCardId(String),

    #[error("Unknown status: {0}")]
    InvalidStatus(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server rejected move ({status}): {message}")]
    ServerRejected { status: u16, message: String },

    /// A success response whose body could not be read
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Markup error: {0}")]
    MarkupError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
