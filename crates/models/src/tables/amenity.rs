use sea_orm::{entity::prelude::*, Set};

use crate::base::{extra_from_json, BaseFields};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "amenities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub name: String,
    pub extra: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&crate::Amenity> for ActiveModel {
    fn from(a: &crate::Amenity) -> Self {
        Self {
            id: Set(a.base.id.clone()),
            created_at: Set(a.base.created_at),
            updated_at: Set(a.base.updated_at),
            name: Set(a.name.clone()),
            extra: Set(Json::Object(a.extra.clone())),
        }
    }
}

impl TryFrom<Model> for crate::Amenity {
    type Error = ModelError;

    fn try_from(m: Model) -> Result<Self, ModelError> {
        Ok(Self {
            base: BaseFields { id: m.id, created_at: m.created_at, updated_at: m.updated_at },
            name: m.name,
            extra: extra_from_json(m.extra)?,
        })
    }
}
