use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct Status {
    pub status: &'static str,
}

impl Status {
    pub fn ok() -> Self { Self { status: "OK" } }
}

/// Per-kind entity counts reported by `/stats`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub amenities: usize,
    pub cities: usize,
    pub places: usize,
    pub reviews: usize,
    pub states: usize,
    pub users: usize,
}
