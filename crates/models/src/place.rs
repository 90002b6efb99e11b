use serde::{Deserialize, Serialize};

use crate::base::{lenient, strip_keys, BaseFields, Extra};
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(flatten)]
    pub base: BaseFields,
    pub city_id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub number_rooms: i64,
    #[serde(default)]
    pub number_bathrooms: i64,
    #[serde(default)]
    pub max_guest: i64,
    #[serde(default)]
    pub price_by_night: i64,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// Linked amenities; edited only through the place-amenity endpoints.
    #[serde(default)]
    pub amenity_ids: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Place {
    pub fn has_amenity(&self, amenity_id: &str) -> bool {
        self.amenity_ids.iter().any(|id| id == amenity_id)
    }

    /// Returns `false` when the amenity was already linked.
    pub fn link_amenity(&mut self, amenity_id: &str) -> bool {
        if self.has_amenity(amenity_id) {
            return false;
        }
        self.amenity_ids.push(amenity_id.to_string());
        true
    }

    /// Returns `false` when the amenity was not linked.
    pub fn unlink_amenity(&mut self, amenity_id: &str) -> bool {
        let before = self.amenity_ids.len();
        self.amenity_ids.retain(|id| id != amenity_id);
        before != self.amenity_ids.len()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewPlace {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub number_rooms: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub number_bathrooms: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub max_guest: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub price_by_night: Option<i64>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl NewPlace {
    /// `name` is checked before `user_id`; the owner's existence is the
    /// caller's concern.
    pub fn into_place(self, city_id: &str) -> Result<Place, ModelError> {
        let name = self.name.ok_or(ModelError::Missing("name"))?;
        let user_id = self.user_id.ok_or(ModelError::Missing("user_id"))?;
        let mut extra = self.extra;
        strip_keys(&mut extra, PlacePatch::IGNORED);
        Ok(Place {
            base: BaseFields::new(),
            city_id: city_id.to_string(),
            user_id,
            name,
            description: self.description.unwrap_or_default(),
            number_rooms: self.number_rooms.unwrap_or_default(),
            number_bathrooms: self.number_bathrooms.unwrap_or_default(),
            max_guest: self.max_guest.unwrap_or_default(),
            price_by_night: self.price_by_night.unwrap_or_default(),
            latitude: self.latitude.unwrap_or_default(),
            longitude: self.longitude.unwrap_or_default(),
            amenity_ids: Vec::new(),
            extra,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlacePatch {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub number_rooms: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub number_bathrooms: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub max_guest: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub price_by_night: Option<i64>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl PlacePatch {
    pub const IGNORED: &'static [&'static str] = &[
        "id",
        "created_at",
        "updated_at",
        "__class__",
        "user_id",
        "city_id",
        "amenity_ids",
        "amenities",
    ];

    pub fn apply(self, place: &mut Place) {
        if let Some(v) = self.name { place.name = v; }
        if let Some(v) = self.description { place.description = v; }
        if let Some(v) = self.number_rooms { place.number_rooms = v; }
        if let Some(v) = self.number_bathrooms { place.number_bathrooms = v; }
        if let Some(v) = self.max_guest { place.max_guest = v; }
        if let Some(v) = self.price_by_night { place.price_by_night = v; }
        if let Some(v) = self.latitude { place.latitude = v; }
        if let Some(v) = self.longitude { place.longitude = v; }
        let mut extra = self.extra;
        strip_keys(&mut extra, Self::IGNORED);
        place.extra.extend(extra);
        place.base.touch();
    }
}
