use axum::{http::StatusCode, Extension, Json};
use models::{Model, NewAmenity};
use serde_json::Value;

use super::resource::persist;
use crate::errors::ApiError;
use crate::payload::Payload;
use crate::session::RequestStorage;

pub async fn create_amenity(
    Extension(storage): Extension<RequestStorage>,
    payload: Payload,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let amenity = payload.parse::<NewAmenity>()?.into_amenity()?;
    let record = amenity.to_record();
    let mut session = storage.session().await?;
    persist(&mut session, amenity.into()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
