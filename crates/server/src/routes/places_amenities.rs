use axum::{extract::Path, http::StatusCode, Extension, Json};
use models::{Amenity, Model, Place};
use serde_json::{json, Value};

use super::resource::{persist, records};
use crate::errors::ApiError;
use crate::session::RequestStorage;

pub async fn list_place_amenities(
    Extension(storage): Extension<RequestStorage>,
    Path(place_id): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let session = storage.session().await?;
    let place = session.get::<Place>(&place_id).ok_or(ApiError::NotFound)?;
    Ok(records(session.amenities_of(place)))
}

/// 200 when the link already existed, 201 when it was created.
pub async fn link_amenity(
    Extension(storage): Extension<RequestStorage>,
    Path((place_id, amenity_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut session = storage.session().await?;
    let mut place = session.get::<Place>(&place_id).cloned().ok_or(ApiError::NotFound)?;
    let record = session
        .get::<Amenity>(&amenity_id)
        .map(Model::to_record)
        .ok_or(ApiError::NotFound)?;
    if !place.link_amenity(&amenity_id) {
        return Ok((StatusCode::OK, Json(record)));
    }
    persist(&mut session, place.into()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn unlink_amenity(
    Extension(storage): Extension<RequestStorage>,
    Path((place_id, amenity_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let mut session = storage.session().await?;
    let mut place = session.get::<Place>(&place_id).cloned().ok_or(ApiError::NotFound)?;
    if session.get::<Amenity>(&amenity_id).is_none() || !place.unlink_amenity(&amenity_id) {
        return Err(ApiError::NotFound);
    }
    persist(&mut session, place.into()).await?;
    Ok(Json(json!({})))
}
