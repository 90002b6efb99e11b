use sea_orm::{entity::prelude::*, Set};

use crate::base::{extra_from_json, BaseFields};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub place_id: String,
    pub user_id: String,
    pub text: String,
    pub extra: Json,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Place, User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Place => Entity::belongs_to(super::place::Entity)
                .from(Column::PlaceId)
                .to(super::place::Column::Id)
                .into(),
            Relation::User => Entity::belongs_to(super::user::Entity)
                .from(Column::UserId)
                .to(super::user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&crate::Review> for ActiveModel {
    fn from(r: &crate::Review) -> Self {
        Self {
            id: Set(r.base.id.clone()),
            created_at: Set(r.base.created_at),
            updated_at: Set(r.base.updated_at),
            place_id: Set(r.place_id.clone()),
            user_id: Set(r.user_id.clone()),
            text: Set(r.text.clone()),
            extra: Set(Json::Object(r.extra.clone())),
        }
    }
}

impl TryFrom<Model> for crate::Review {
    type Error = ModelError;

    fn try_from(m: Model) -> Result<Self, ModelError> {
        Ok(Self {
            base: BaseFields { id: m.id, created_at: m.created_at, updated_at: m.updated_at },
            place_id: m.place_id,
            user_id: m.user_id,
            text: m.text,
            extra: extra_from_json(m.extra)?,
        })
    }
}
