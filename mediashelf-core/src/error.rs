use mediashelf_model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

impl ShelfError {
    /// Wraps a failure reported by a storage backend.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        ShelfError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShelfError>;
