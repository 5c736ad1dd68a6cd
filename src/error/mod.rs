//! Error types for Rekon.

use thiserror::Error;

/// Primary error type for all Rekon operations.
#[derive(Error, Debug)]
pub enum RekonError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Forbidden operation: {0}")]
    ForbiddenOperation(String),

    #[error("Unknown tool requested: {0}")]
    UnknownTool(String),

    #[error("Agent loop exceeded {limit} tool iterations without a final answer")]
    MaxIterationsExceeded { limit: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl RekonError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether this error aborts the whole turn.
    ///
    /// Tool-level failures are fed back to the model as error tool results
    /// and the loop continues; everything else ends the turn with the
    /// transcript rolled back to its pre-turn state.
    pub fn aborts_turn(&self) -> bool {
        !matches!(
            self,
            Self::ForbiddenOperation(_)
                | Self::UnknownTool(_)
                | Self::Database(_)
                | Self::InvalidArgument(_)
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RekonError>;
