//! The closed set of entity kinds and the type-erased `Entity` used by storage.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::base::BaseFields;
use crate::{
    Amenity, AmenityPatch, City, CityPatch, Place, PlacePatch, Review, ReviewPatch, State,
    StatePatch, User, UserPatch,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Amenity,
    City,
    Place,
    Review,
    State,
    User,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Amenity,
        EntityKind::City,
        EntityKind::Place,
        EntityKind::Review,
        EntityKind::State,
        EntityKind::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Amenity => "Amenity",
            EntityKind::City => "City",
            EntityKind::Place => "Place",
            EntityKind::Review => "Review",
            EntityKind::State => "State",
            EntityKind::User => "User",
        }
    }

    /// Position in foreign-key order: parents sort before their children.
    pub fn dependency_rank(&self) -> u8 {
        match self {
            EntityKind::State | EntityKind::User | EntityKind::Amenity => 0,
            EntityKind::City => 1,
            EntityKind::Place => 2,
            EntityKind::Review => 3,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a stored entity: kind plus id. Renders as `Kind.id`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityKey {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.id)
    }
}

/// Any entity, tagged with `__class__` when serialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__class__")]
pub enum Entity {
    Amenity(Amenity),
    City(City),
    Place(Place),
    Review(Review),
    State(State),
    User(User),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Amenity(_) => EntityKind::Amenity,
            Entity::City(_) => EntityKind::City,
            Entity::Place(_) => EntityKind::Place,
            Entity::Review(_) => EntityKind::Review,
            Entity::State(_) => EntityKind::State,
            Entity::User(_) => EntityKind::User,
        }
    }

    pub fn base(&self) -> &BaseFields {
        match self {
            Entity::Amenity(e) => &e.base,
            Entity::City(e) => &e.base,
            Entity::Place(e) => &e.base,
            Entity::Review(e) => &e.base,
            Entity::State(e) => &e.base,
            Entity::User(e) => &e.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::new(self.kind(), self.id())
    }

    /// Serialized record form, including `__class__`.
    pub fn to_record(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Typed access to one variant of `Entity`.
pub trait Model: Clone + Serialize + Send + Sync + 'static {
    const KIND: EntityKind;

    fn base(&self) -> &BaseFields;
    fn base_mut(&mut self) -> &mut BaseFields;
    fn from_entity(entity: &Entity) -> Option<&Self>;
    fn into_entity(self) -> Entity;

    fn id(&self) -> &str {
        &self.base().id
    }

    fn key(&self) -> EntityKey {
        EntityKey::new(Self::KIND, self.id())
    }

    /// Serialized record form, including `__class__`.
    fn to_record(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Value::Object(map) = &mut value {
            map.insert("__class__".into(), Value::String(Self::KIND.as_str().into()));
        }
        value
    }
}

macro_rules! impl_model {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl Model for $ty {
                const KIND: EntityKind = EntityKind::$ty;

                fn base(&self) -> &BaseFields { &self.base }
                fn base_mut(&mut self) -> &mut BaseFields { &mut self.base }

                fn from_entity(entity: &Entity) -> Option<&Self> {
                    match entity {
                        Entity::$ty(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn into_entity(self) -> Entity { Entity::$ty(self) }
            }

            impl From<$ty> for Entity {
                fn from(value: $ty) -> Self { Entity::$ty(value) }
            }
        )+
    };
}

impl_model!(Amenity, City, Place, Review, State, User);

/// Typed partial update targeting one kind.
pub trait Patch: DeserializeOwned + Send + 'static {
    type Target: Model;

    fn apply_to(self, target: &mut Self::Target);
}

macro_rules! impl_patch {
    ($($patch:ident => $ty:ident),+ $(,)?) => {
        $(
            impl Patch for $patch {
                type Target = $ty;

                fn apply_to(self, target: &mut $ty) { self.apply(target) }
            }
        )+
    };
}

impl_patch!(
    AmenityPatch => Amenity,
    CityPatch => City,
    PlacePatch => Place,
    ReviewPatch => Review,
    StatePatch => State,
    UserPatch => User,
);
