use axum::{http::StatusCode, Extension, Json};
use models::{Model, NewState};
use serde_json::Value;

use super::resource::persist;
use crate::errors::ApiError;
use crate::payload::Payload;
use crate::session::RequestStorage;

pub async fn create_state(
    Extension(storage): Extension<RequestStorage>,
    payload: Payload,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let state = payload.parse::<NewState>()?.into_state()?;
    let record = state.to_record();
    let mut session = storage.session().await?;
    persist(&mut session, state.into()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
