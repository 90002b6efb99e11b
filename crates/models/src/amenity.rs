use serde::{Deserialize, Serialize};

use crate::base::{lenient, strip_keys, BaseFields, Extra, RESERVED_FIELDS};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    #[serde(flatten)]
    pub base: BaseFields,
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewAmenity {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl NewAmenity {
    pub fn into_amenity(self) -> Result<Amenity, ModelError> {
        let name = self.name.ok_or(ModelError::Missing("name"))?;
        let mut extra = self.extra;
        strip_keys(&mut extra, RESERVED_FIELDS);
        Ok(Amenity { base: BaseFields::new(), name, extra })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AmenityPatch {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl AmenityPatch {
    pub const IGNORED: &'static [&'static str] = RESERVED_FIELDS;

    pub fn apply(self, amenity: &mut Amenity) {
        if let Some(name) = self.name {
            amenity.name = name;
        }
        let mut extra = self.extra;
        strip_keys(&mut extra, Self::IGNORED);
        amenity.extra.extend(extra);
        amenity.base.touch();
    }
}
