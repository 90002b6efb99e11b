use models::errors::ModelError;
use thiserror::Error;

/// Failures raised while loading or committing the entity collection.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Db(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<sea_orm::DbErr> for StorageError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}

impl From<ModelError> for StorageError {
    fn from(e: ModelError) -> Self { Self::Decode(e.to_string()) }
}
