use axum::{http::StatusCode, Extension, Json};
use models::{Model, NewUser};
use serde_json::Value;

use super::resource::persist;
use crate::errors::ApiError;
use crate::payload::Payload;
use crate::session::RequestStorage;

/// `email` is checked before `password`. Duplicate emails are accepted.
pub async fn create_user(
    Extension(storage): Extension<RequestStorage>,
    payload: Payload,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = payload.parse::<NewUser>()?.into_user()?;
    let record = user.to_record();
    let mut session = storage.session().await?;
    persist(&mut session, user.into()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
