use serde::{Deserialize, Serialize};

use crate::base::{lenient, strip_keys, BaseFields, Extra, RESERVED_FIELDS};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub base: BaseFields,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewUser {
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub last_name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl NewUser {
    /// `email` is checked before `password`.
    pub fn into_user(self) -> Result<User, ModelError> {
        let email = self.email.ok_or(ModelError::Missing("email"))?;
        let password = self.password.ok_or(ModelError::Missing("password"))?;
        let mut extra = self.extra;
        strip_keys(&mut extra, RESERVED_FIELDS);
        Ok(User {
            base: BaseFields::new(),
            email,
            password,
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            extra,
        })
    }
}

/// Partial update for `PUT /users/{id}`. The email is fixed after creation.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserPatch {
    #[serde(default, deserialize_with = "lenient::text")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub last_name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl UserPatch {
    pub const IGNORED: &'static [&'static str] =
        &["id", "created_at", "updated_at", "__class__", "email"];

    pub fn apply(self, user: &mut User) {
        if let Some(password) = self.password {
            user.password = password;
        }
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
        let mut extra = self.extra;
        strip_keys(&mut extra, Self::IGNORED);
        user.extra.extend(extra);
        user.base.touch();
    }
}
