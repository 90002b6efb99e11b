//! Handlers shared by every resource kind: list, show, update and delete.

use axum::{extract::Path, Extension, Json};
use models::{Entity, Model, Patch};
use serde_json::{json, Value};
use service::Session;

use crate::errors::ApiError;
use crate::payload::Payload;
use crate::session::RequestStorage;

pub(crate) fn records<'a, M: Model>(items: impl IntoIterator<Item = &'a M>) -> Json<Vec<Value>> {
    Json(items.into_iter().map(Model::to_record).collect())
}

/// Stage `entity` and commit the session.
pub(crate) async fn persist(session: &mut Session, entity: Entity) -> Result<(), ApiError> {
    session.add(entity);
    session.save().await?;
    Ok(())
}

pub async fn list<M: Model>(
    Extension(storage): Extension<RequestStorage>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let session = storage.session().await?;
    Ok(records(session.all::<M>()))
}

pub async fn show<M: Model>(
    Extension(storage): Extension<RequestStorage>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let session = storage.session().await?;
    let item = session.get::<M>(&id).ok_or(ApiError::NotFound)?;
    Ok(Json(item.to_record()))
}

/// 404 before the payload is looked at; immutable keys are dropped by the patch.
pub async fn update<P: Patch>(
    Extension(storage): Extension<RequestStorage>,
    Path(id): Path<String>,
    payload: Payload,
) -> Result<Json<Value>, ApiError> {
    let mut session = storage.session().await?;
    let mut target = session.get::<P::Target>(&id).cloned().ok_or(ApiError::NotFound)?;
    payload.parse::<P>()?.apply_to(&mut target);
    let record = target.to_record();
    persist(&mut session, target.into_entity()).await?;
    Ok(Json(record))
}

pub async fn destroy<M: Model>(
    Extension(storage): Extension<RequestStorage>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let mut session = storage.session().await?;
    if !session.delete(M::KIND, &id) {
        return Err(ApiError::NotFound);
    }
    session.save().await?;
    Ok(Json(json!({})))
}
