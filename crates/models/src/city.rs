use serde::{Deserialize, Serialize};

use crate::base::{lenient, strip_keys, BaseFields, Extra};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(flatten)]
    pub base: BaseFields,
    pub state_id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Create payload for `POST /states/{state_id}/cities`. The parent id comes
/// from the path, never from the body.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewCity {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl NewCity {
    pub fn into_city(self, state_id: &str) -> Result<City, ModelError> {
        let name = self.name.ok_or(ModelError::Missing("name"))?;
        let mut extra = self.extra;
        strip_keys(&mut extra, CityPatch::IGNORED);
        Ok(City { base: BaseFields::new(), state_id: state_id.to_string(), name, extra })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CityPatch {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl CityPatch {
    pub const IGNORED: &'static [&'static str] =
        &["id", "created_at", "updated_at", "__class__", "state_id"];

    pub fn apply(self, city: &mut City) {
        if let Some(name) = self.name {
            city.name = name;
        }
        let mut extra = self.extra;
        strip_keys(&mut extra, Self::IGNORED);
        city.extra.extend(extra);
        city.base.touch();
    }
}
