use axum::{extract::Path, http::StatusCode, Extension, Json};
use models::{base::from_payload, City, Model, NewPlace, User};
use serde_json::Value;
use service::{places_search, search::search_record, SearchCriteria};

use super::resource::{persist, records};
use crate::errors::ApiError;
use crate::payload::{Payload, NOT_A_JSON};
use crate::session::RequestStorage;

pub async fn list_places(
    Extension(storage): Extension<RequestStorage>,
    Path(city_id): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let session = storage.session().await?;
    if session.get::<City>(&city_id).is_none() {
        return Err(ApiError::NotFound);
    }
    Ok(records(session.places_of(&city_id)))
}

/// City 404, then payload checks (`name`, `user_id`), then owner 404.
pub async fn create_place(
    Extension(storage): Extension<RequestStorage>,
    Path(city_id): Path<String>,
    payload: Payload,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut session = storage.session().await?;
    if session.get::<City>(&city_id).is_none() {
        return Err(ApiError::NotFound);
    }
    let place = payload.parse::<NewPlace>()?.into_place(&city_id)?;
    if session.get::<User>(&place.user_id).is_none() {
        return Err(ApiError::NotFound);
    }
    let record = place.to_record();
    persist(&mut session, place.into()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `POST /places_search`. A JSON `null` body searches with no criteria.
pub async fn search_places(
    Extension(storage): Extension<RequestStorage>,
    Payload(body): Payload,
) -> Result<Json<Vec<Value>>, ApiError> {
    let criteria = match body {
        Some(Value::Null) => SearchCriteria::default(),
        Some(Value::Object(map)) => from_payload::<SearchCriteria>(map)?,
        _ => return Err(ApiError::bad_request(NOT_A_JSON)),
    };
    let session = storage.session().await?;
    let found = places_search(&session, &criteria);
    Ok(Json(found.into_iter().map(search_record).collect()))
}
