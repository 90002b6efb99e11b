use std::{cmp::Reverse, collections::HashMap};

use async_trait::async_trait;
use configs::DatabaseConfig;
use migration::{Migrator, MigratorTrait};
use models::{
    tables::{amenity, city, place, place_amenity, review, state, user},
    Amenity, City, Entity, EntityKey, EntityKind, Review, State, User,
};
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, IntoActiveModel, QueryFilter, TransactionTrait,
};
use tracing::{info, instrument};

use super::backend::{ChangeSet, StorageBackend};
use crate::errors::StorageError;

/// Relational backend over SeaORM (PostgreSQL or SQLite).
///
/// Each commit runs in a single transaction: deletes children-first, then
/// upserts parents-first so foreign keys hold at every statement.
#[derive(Clone)]
pub struct DbBackend {
    db: DatabaseConnection,
}

impl DbBackend {
    /// Connect with the pool settings from config and bring the schema up to date.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, StorageError> {
        let db = models::db::connect_with_config(cfg)
            .await
            .map_err(|e| StorageError::Db(e.to_string()))?;
        Self::with_connection(db).await
    }

    pub async fn with_connection(db: DatabaseConnection) -> Result<Self, StorageError> {
        Migrator::up(&db, None).await?;
        info!("database migrations applied");
        Ok(Self { db })
    }

    pub fn connection(&self) -> &DatabaseConnection { &self.db }
}

#[async_trait]
impl StorageBackend for DbBackend {
    fn name(&self) -> &'static str { "db" }

    async fn load(&self) -> Result<Vec<Entity>, StorageError> {
        let mut entities = Vec::new();

        for m in state::Entity::find().all(&self.db).await? {
            entities.push(State::try_from(m)?.into());
        }
        for m in city::Entity::find().all(&self.db).await? {
            entities.push(City::try_from(m)?.into());
        }
        for m in amenity::Entity::find().all(&self.db).await? {
            entities.push(Amenity::try_from(m)?.into());
        }
        for m in user::Entity::find().all(&self.db).await? {
            entities.push(User::try_from(m)?.into());
        }
        for m in review::Entity::find().all(&self.db).await? {
            entities.push(Review::try_from(m)?.into());
        }

        let mut links: HashMap<String, Vec<String>> = HashMap::new();
        for link in place_amenity::Entity::find().all(&self.db).await? {
            links.entry(link.place_id).or_default().push(link.amenity_id);
        }
        for m in place::Entity::find().all(&self.db).await? {
            let amenity_ids = links.remove(&m.id).unwrap_or_default();
            entities.push(m.into_place(amenity_ids)?.into());
        }

        Ok(entities)
    }

    #[instrument(skip_all, fields(upserts = changes.upserts.len(), deletes = changes.deletes.len()))]
    async fn commit(&self, changes: ChangeSet) -> Result<(), StorageError> {
        let ChangeSet { mut upserts, mut deletes } = changes;
        deletes.sort_by_key(|key| Reverse(key.kind.dependency_rank()));
        upserts.sort_by_key(|entity| entity.kind().dependency_rank());

        let txn = self.db.begin().await?;
        for key in &deletes {
            delete_one(&txn, key).await?;
        }
        for entity in &upserts {
            upsert_one(&txn, entity).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), StorageError> {
        self.db.clone().close().await?;
        info!("database pool closed");
        Ok(())
    }
}

async fn delete_one(txn: &DatabaseTransaction, key: &EntityKey) -> Result<(), DbErr> {
    let id = key.id.clone();
    match key.kind {
        EntityKind::State => {
            state::Entity::delete_by_id(id).exec(txn).await?;
        }
        EntityKind::City => {
            city::Entity::delete_by_id(id).exec(txn).await?;
        }
        EntityKind::Amenity => {
            place_amenity::Entity::delete_many()
                .filter(place_amenity::Column::AmenityId.eq(id.clone()))
                .exec(txn)
                .await?;
            amenity::Entity::delete_by_id(id).exec(txn).await?;
        }
        EntityKind::User => {
            user::Entity::delete_by_id(id).exec(txn).await?;
        }
        EntityKind::Place => {
            place_amenity::Entity::delete_many()
                .filter(place_amenity::Column::PlaceId.eq(id.clone()))
                .exec(txn)
                .await?;
            place::Entity::delete_by_id(id).exec(txn).await?;
        }
        EntityKind::Review => {
            review::Entity::delete_by_id(id).exec(txn).await?;
        }
    }
    Ok(())
}

async fn upsert_one(txn: &DatabaseTransaction, entity: &Entity) -> Result<(), DbErr> {
    match entity {
        Entity::State(s) => {
            upsert::<state::Entity, _>(
                txn,
                state::ActiveModel::from(s),
                state::Column::Id,
                [state::Column::CreatedAt, state::Column::UpdatedAt, state::Column::Name, state::Column::Extra],
            )
            .await
        }
        Entity::City(c) => {
            upsert::<city::Entity, _>(
                txn,
                city::ActiveModel::from(c),
                city::Column::Id,
                [
                    city::Column::CreatedAt,
                    city::Column::UpdatedAt,
                    city::Column::StateId,
                    city::Column::Name,
                    city::Column::Extra,
                ],
            )
            .await
        }
        Entity::Amenity(a) => {
            upsert::<amenity::Entity, _>(
                txn,
                amenity::ActiveModel::from(a),
                amenity::Column::Id,
                [amenity::Column::CreatedAt, amenity::Column::UpdatedAt, amenity::Column::Name, amenity::Column::Extra],
            )
            .await
        }
        Entity::User(u) => {
            upsert::<user::Entity, _>(
                txn,
                user::ActiveModel::from(u),
                user::Column::Id,
                [
                    user::Column::CreatedAt,
                    user::Column::UpdatedAt,
                    user::Column::Email,
                    user::Column::Password,
                    user::Column::FirstName,
                    user::Column::LastName,
                    user::Column::Extra,
                ],
            )
            .await
        }
        Entity::Review(r) => {
            upsert::<review::Entity, _>(
                txn,
                review::ActiveModel::from(r),
                review::Column::Id,
                [
                    review::Column::CreatedAt,
                    review::Column::UpdatedAt,
                    review::Column::PlaceId,
                    review::Column::UserId,
                    review::Column::Text,
                    review::Column::Extra,
                ],
            )
            .await
        }
        Entity::Place(p) => {
            upsert::<place::Entity, _>(
                txn,
                place::ActiveModel::from(p),
                place::Column::Id,
                [
                    place::Column::CreatedAt,
                    place::Column::UpdatedAt,
                    place::Column::CityId,
                    place::Column::UserId,
                    place::Column::Name,
                    place::Column::Description,
                    place::Column::NumberRooms,
                    place::Column::NumberBathrooms,
                    place::Column::MaxGuest,
                    place::Column::PriceByNight,
                    place::Column::Latitude,
                    place::Column::Longitude,
                    place::Column::Extra,
                ],
            )
            .await?;

            // links are rewritten wholesale from the place's amenity list
            place_amenity::Entity::delete_many()
                .filter(place_amenity::Column::PlaceId.eq(p.base.id.clone()))
                .exec(txn)
                .await?;
            if !p.amenity_ids.is_empty() {
                place_amenity::Entity::insert_many(
                    p.amenity_ids.iter().map(|amenity_id| place_amenity::link(&p.base.id, amenity_id)),
                )
                .exec_without_returning(txn)
                .await?;
            }
            Ok(())
        }
    }
}

async fn upsert<E, C>(
    txn: &DatabaseTransaction,
    model: E::ActiveModel,
    id: E::Column,
    columns: C,
) -> Result<(), DbErr>
where
    E: EntityTrait,
    E::ActiveModel: ActiveModelTrait<Entity = E>,
    E::Model: IntoActiveModel<E::ActiveModel>,
    C: IntoIterator<Item = E::Column>,
{
    E::insert(model)
        .on_conflict(OnConflict::column(id).update_columns(columns).to_owned())
        .exec_without_returning(txn)
        .await?;
    Ok(())
}
