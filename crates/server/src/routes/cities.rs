use axum::{extract::Path, http::StatusCode, Extension, Json};
use models::{Model, NewCity, State};
use serde_json::Value;

use super::resource::{persist, records};
use crate::errors::ApiError;
use crate::payload::Payload;
use crate::session::RequestStorage;

pub async fn list_cities(
    Extension(storage): Extension<RequestStorage>,
    Path(state_id): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let session = storage.session().await?;
    if session.get::<State>(&state_id).is_none() {
        return Err(ApiError::NotFound);
    }
    Ok(records(session.cities_of(&state_id)))
}

pub async fn create_city(
    Extension(storage): Extension<RequestStorage>,
    Path(state_id): Path<String>,
    payload: Payload,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut session = storage.session().await?;
    if session.get::<State>(&state_id).is_none() {
        return Err(ApiError::NotFound);
    }
    let city = payload.parse::<NewCity>()?.into_city(&state_id)?;
    let record = city.to_record();
    persist(&mut session, city.into()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
