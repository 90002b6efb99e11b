use sea_orm::{entity::prelude::*, Set};

use crate::base::{extra_from_json, BaseFields};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub state_id: String,
    pub name: String,
    pub extra: Json,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { State }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::State => Entity::belongs_to(super::state::Entity)
                .from(Column::StateId)
                .to(super::state::Column::Id)
                .into(),
        }
    }
}

impl Related<super::state::Entity> for Entity {
    fn to() -> RelationDef { Relation::State.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&crate::City> for ActiveModel {
    fn from(c: &crate::City) -> Self {
        Self {
            id: Set(c.base.id.clone()),
            created_at: Set(c.base.created_at),
            updated_at: Set(c.base.updated_at),
            state_id: Set(c.state_id.clone()),
            name: Set(c.name.clone()),
            extra: Set(Json::Object(c.extra.clone())),
        }
    }
}

impl TryFrom<Model> for crate::City {
    type Error = ModelError;

    fn try_from(m: Model) -> Result<Self, ModelError> {
        Ok(Self {
            base: BaseFields { id: m.id, created_at: m.created_at, updated_at: m.updated_at },
            state_id: m.state_id,
            name: m.name,
            extra: extra_from_json(m.extra)?,
        })
    }
}
