use axum::{Extension, Json};
use common::types::{Stats, Status};
use models::EntityKind;

use crate::errors::ApiError;
use crate::session::RequestStorage;

pub async fn status() -> Json<Status> {
    Json(Status::ok())
}

pub async fn stats(Extension(storage): Extension<RequestStorage>) -> Result<Json<Stats>, ApiError> {
    let session = storage.session().await?;
    let count = |kind| session.count(Some(kind));
    Ok(Json(Stats {
        amenities: count(EntityKind::Amenity),
        cities: count(EntityKind::City),
        places: count(EntityKind::Place),
        reviews: count(EntityKind::Review),
        states: count(EntityKind::State),
        users: count(EntityKind::User),
    }))
}
