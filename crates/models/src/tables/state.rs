use sea_orm::{entity::prelude::*, Set};

use crate::base::{extra_from_json, BaseFields};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "states")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub name: String,
    pub extra: Json,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { City }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::City => Entity::has_many(super::city::Entity).into(),
        }
    }
}

impl Related<super::city::Entity> for Entity {
    fn to() -> RelationDef { Relation::City.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&crate::State> for ActiveModel {
    fn from(s: &crate::State) -> Self {
        Self {
            id: Set(s.base.id.clone()),
            created_at: Set(s.base.created_at),
            updated_at: Set(s.base.updated_at),
            name: Set(s.name.clone()),
            extra: Set(Json::Object(s.extra.clone())),
        }
    }
}

impl TryFrom<Model> for crate::State {
    type Error = ModelError;

    fn try_from(m: Model) -> Result<Self, ModelError> {
        Ok(Self {
            base: BaseFields { id: m.id, created_at: m.created_at, updated_at: m.updated_at },
            name: m.name,
            extra: extra_from_json(m.extra)?,
        })
    }
}
