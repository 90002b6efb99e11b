//! SeaORM table mappings used by the relational storage backend.
//!
//! Each module pairs a table `Model` with conversions to and from the
//! backend-agnostic entity in the crate root. Unknown attributes live in the
//! `extra` JSON column.

pub mod amenity;
pub mod city;
pub mod place;
pub mod place_amenity;
pub mod review;
pub mod state;
pub mod user;
