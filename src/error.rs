//! Error types for the planning backend.

use thiserror::Error;

/// Result type alias for planner operations.
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Error types for the store, the engine and the loaders.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// A numeric or date input the engine cannot work with.
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// A record lookup that found nothing.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// Simulation names must be unique.
    #[error("A simulation named '{name}' already exists")]
    DuplicateName { name: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PlannerError {
    /// Create an invalid input error.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(entity: &'static str, id: u64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Create an invalid config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
