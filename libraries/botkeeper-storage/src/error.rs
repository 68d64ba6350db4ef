/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error reported by the MongoDB driver
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    /// Document could not be encoded to BSON
    #[error("BSON encoding error: {0}")]
    Encode(#[from] bson::ser::Error),

    /// Document could not be decoded from BSON
    #[error("BSON decoding error: {0}")]
    Decode(#[from] bson::de::Error),
}

impl From<StorageError> for botkeeper_core::RecordError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Mongo(e) => Self::database(e.to_string()),
            StorageError::Encode(e) => Self::serialization(e.to_string()),
            StorageError::Decode(e) => Self::serialization(e.to_string()),
        }
    }
}
