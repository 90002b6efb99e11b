//! Entity model: the six resource kinds, their typed create inputs and
//! partial updates, and the relational table mappings.

pub mod errors;
pub mod base;
pub mod entity;
pub mod db;
pub mod tables;

mod amenity;
mod city;
mod place;
mod review;
mod state;
mod user;

pub use amenity::{Amenity, AmenityPatch, NewAmenity};
pub use base::BaseFields;
pub use city::{City, CityPatch, NewCity};
pub use entity::{Entity, EntityKey, EntityKind, Model, Patch};
pub use place::{NewPlace, Place, PlacePatch};
pub use review::{NewReview, Review, ReviewPatch};
pub use state::{NewState, State, StatePatch};
pub use user::{NewUser, User, UserPatch};
