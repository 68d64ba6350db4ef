/// Core error types for Botkeeper
use thiserror::Error;

/// Result type alias using `RecordError`
pub type Result<T> = std::result::Result<T, RecordError>;

/// Core error type for record storage
#[derive(Error, Debug)]
pub enum RecordError {
    /// No store connection could be established
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any failure reported by the document store
    #[error("Database error: {0}")]
    Database(String),

    /// Document could not be converted to or from its stored form
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RecordError {
    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}
