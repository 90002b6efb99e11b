use std::convert::Infallible;

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use models::base::from_payload;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::ApiError;

pub const NOT_A_JSON: &str = "Not a JSON";

/// Request body that never rejects on its own.
///
/// Holds `None` when the request is not declared as JSON or the body does not
/// parse, so handlers can run their 404 checks before complaining about the
/// payload.
#[derive(Debug, Clone, Default)]
pub struct Payload(pub Option<Value>);

#[axum::async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Payload(Some(value))),
            Err(rejection) => {
                debug!(status = %rejection.status(), reason = %rejection.body_text(), "request body is not JSON");
                Ok(Payload(None))
            }
        }
    }
}

impl Payload {
    /// The body as a JSON object, or 400 "Not a JSON".
    pub fn object(self) -> Result<Map<String, Value>, ApiError> {
        match self.0 {
            Some(Value::Object(map)) => Ok(map),
            _ => Err(ApiError::bad_request(NOT_A_JSON)),
        }
    }

    /// Decode the body object into a typed input.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        Ok(from_payload(self.object()?)?)
    }
}
