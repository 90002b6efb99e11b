use sea_orm::{entity::prelude::*, Set};

use crate::base::{extra_from_json, BaseFields};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub extra: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&crate::User> for ActiveModel {
    fn from(u: &crate::User) -> Self {
        Self {
            id: Set(u.base.id.clone()),
            created_at: Set(u.base.created_at),
            updated_at: Set(u.base.updated_at),
            email: Set(u.email.clone()),
            password: Set(u.password.clone()),
            first_name: Set(u.first_name.clone()),
            last_name: Set(u.last_name.clone()),
            extra: Set(Json::Object(u.extra.clone())),
        }
    }
}

impl TryFrom<Model> for crate::User {
    type Error = ModelError;

    fn try_from(m: Model) -> Result<Self, ModelError> {
        Ok(Self {
            base: BaseFields { id: m.id, created_at: m.created_at, updated_at: m.updated_at },
            email: m.email,
            password: m.password,
            first_name: m.first_name,
            last_name: m.last_name,
            extra: extra_from_json(m.extra)?,
        })
    }
}
