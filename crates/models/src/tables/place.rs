use sea_orm::{entity::prelude::*, Set};

use crate::base::{extra_from_json, BaseFields};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "places")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub city_id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub number_rooms: i64,
    pub number_bathrooms: i64,
    pub max_guest: i64,
    pub price_by_night: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub extra: Json,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { City, User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::City => Entity::belongs_to(super::city::Entity)
                .from(Column::CityId)
                .to(super::city::Column::Id)
                .into(),
            Relation::User => Entity::belongs_to(super::user::Entity)
                .from(Column::UserId)
                .to(super::user::Column::Id)
                .into(),
        }
    }
}

impl Related<super::amenity::Entity> for Entity {
    fn to() -> RelationDef { super::place_amenity::Relation::Amenity.def() }

    fn via() -> Option<RelationDef> {
        Some(super::place_amenity::Relation::Place.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&crate::Place> for ActiveModel {
    fn from(p: &crate::Place) -> Self {
        Self {
            id: Set(p.base.id.clone()),
            created_at: Set(p.base.created_at),
            updated_at: Set(p.base.updated_at),
            city_id: Set(p.city_id.clone()),
            user_id: Set(p.user_id.clone()),
            name: Set(p.name.clone()),
            description: Set(p.description.clone()),
            number_rooms: Set(p.number_rooms),
            number_bathrooms: Set(p.number_bathrooms),
            max_guest: Set(p.max_guest),
            price_by_night: Set(p.price_by_night),
            latitude: Set(p.latitude),
            longitude: Set(p.longitude),
            extra: Set(Json::Object(p.extra.clone())),
        }
    }
}

impl Model {
    /// Amenity links live in `place_amenity`; the caller supplies them.
    pub fn into_place(self, amenity_ids: Vec<String>) -> Result<crate::Place, ModelError> {
        Ok(crate::Place {
            base: BaseFields { id: self.id, created_at: self.created_at, updated_at: self.updated_at },
            city_id: self.city_id,
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            number_rooms: self.number_rooms,
            number_bathrooms: self.number_bathrooms,
            max_guest: self.max_guest,
            price_by_night: self.price_by_night,
            latitude: self.latitude,
            longitude: self.longitude,
            amenity_ids,
            extra: extra_from_json(self.extra)?,
        })
    }
}
