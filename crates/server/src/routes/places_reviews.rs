use axum::{extract::Path, http::StatusCode, Extension, Json};
use models::{Model, NewReview, Place, User};
use serde_json::Value;

use super::resource::{persist, records};
use crate::errors::ApiError;
use crate::payload::Payload;
use crate::session::RequestStorage;

pub async fn list_reviews(
    Extension(storage): Extension<RequestStorage>,
    Path(place_id): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let session = storage.session().await?;
    if session.get::<Place>(&place_id).is_none() {
        return Err(ApiError::NotFound);
    }
    Ok(records(session.reviews_of(&place_id)))
}

/// Place 404, then payload checks (`text`, `user_id`), then author 404.
pub async fn create_review(
    Extension(storage): Extension<RequestStorage>,
    Path(place_id): Path<String>,
    payload: Payload,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut session = storage.session().await?;
    if session.get::<Place>(&place_id).is_none() {
        return Err(ApiError::NotFound);
    }
    let review = payload.parse::<NewReview>()?.into_review(&place_id)?;
    if session.get::<User>(&review.user_id).is_none() {
        return Err(ApiError::NotFound);
    }
    let record = review.to_record();
    persist(&mut session, review.into()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
