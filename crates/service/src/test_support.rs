#![cfg(test)]
//! Fixture builders shared by the service unit tests.
use std::path::PathBuf;

use models::{
    base::from_payload, Amenity, City, Model, NewAmenity, NewCity, NewPlace, NewReview, NewState,
    NewUser, Place, Review, State, User,
};
use serde_json::{json, Value};

fn payload(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("fixture payload must be an object"),
    }
}

/// Path to a not-yet-existing JSON file in a fresh temp directory.
pub fn temp_file() -> PathBuf {
    std::env::temp_dir()
        .join(format!("hbnb_store_{}", uuid::Uuid::new_v4()))
        .join("file.json")
}

pub fn state(name: &str) -> State {
    from_payload::<NewState>(payload(json!({ "name": name }))).unwrap().into_state().unwrap()
}

pub fn city(state: &State, name: &str) -> City {
    from_payload::<NewCity>(payload(json!({ "name": name }))).unwrap().into_city(state.id()).unwrap()
}

pub fn amenity(name: &str) -> Amenity {
    from_payload::<NewAmenity>(payload(json!({ "name": name }))).unwrap().into_amenity().unwrap()
}

pub fn user(email: &str) -> User {
    from_payload::<NewUser>(payload(json!({ "email": email, "password": "pwd" })))
        .unwrap()
        .into_user()
        .unwrap()
}

pub fn place(city: &City, owner: &User, name: &str) -> Place {
    from_payload::<NewPlace>(payload(json!({ "name": name, "user_id": owner.id() })))
        .unwrap()
        .into_place(city.id())
        .unwrap()
}

pub fn review(place: &Place, author: &User, text: &str) -> Review {
    from_payload::<NewReview>(payload(json!({ "text": text, "user_id": author.id() })))
        .unwrap()
        .into_review(place.id())
        .unwrap()
}
