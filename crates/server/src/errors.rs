use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use service::StorageError;
use thiserror::Error;
use tracing::error;

/// Every handler failure, mapped to its HTTP response in one place.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self { Self::BadRequest(msg.into()) }
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self { Self::BadRequest(e.to_string()) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Storage(e) => {
                error!(error = %e, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage failure".to_string())
            }
        };
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage unavailable: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
