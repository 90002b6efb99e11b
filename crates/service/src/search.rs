//! `places_search`: filter places by state, city and amenity membership.

use std::collections::{HashMap, HashSet};

use models::{Amenity, City, Model, Place, State};
use serde::Deserialize;
use serde_json::Value;

use crate::storage::Session;

/// Body of `POST /places_search`. Every list is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub states: Option<Vec<String>>,
    #[serde(default)]
    pub cities: Option<Vec<String>>,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
}

fn ids(list: &Option<Vec<String>>) -> &[String] {
    list.as_deref().unwrap_or_default()
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        ids(&self.states).is_empty() && ids(&self.cities).is_empty() && ids(&self.amenities).is_empty()
    }
}

/// Places matching `criteria`.
///
/// States and cities contribute by union (each place once, first match
/// order). Amenities narrow that set, or the full set when states and cities
/// selected nothing, to places carrying every requested amenity.
pub fn places_search<'s>(session: &'s Session, criteria: &SearchCriteria) -> Vec<&'s Place> {
    if criteria.is_empty() {
        return session.all::<Place>();
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut selected: Vec<&Place> = Vec::new();
    let mut take = |place: &'s Place| {
        if seen.insert(place.id()) {
            selected.push(place);
        }
    };

    let states = ids(&criteria.states);
    let cities = ids(&criteria.cities);
    if !states.is_empty() || !cities.is_empty() {
        let places_by_city = group_by(session.all::<Place>(), |p| p.city_id.as_str());
        let mut by_city = |city_id: &str| {
            places_by_city.get(city_id).into_iter().flatten().copied().for_each(&mut take);
        };

        if !states.is_empty() {
            let cities_by_state = group_by(session.all::<City>(), |c| c.state_id.as_str());
            for state_id in states {
                if session.get::<State>(state_id).is_none() {
                    continue;
                }
                for city in cities_by_state.get(state_id.as_str()).into_iter().flatten() {
                    by_city(city.id());
                }
            }
        }
        for city_id in cities {
            by_city(city_id);
        }
    }

    let wanted = ids(&criteria.amenities);
    if wanted.is_empty() {
        return selected;
    }
    if wanted.iter().any(|id| session.get::<Amenity>(id).is_none()) {
        return Vec::new();
    }
    if selected.is_empty() {
        selected = session.all::<Place>();
    }
    selected.retain(|place| wanted.iter().all(|id| place.has_amenity(id)));
    selected
}

/// Bucket `items` by a parent id, keeping their order within each bucket.
fn group_by<'s, M>(items: Vec<&'s M>, parent: impl Fn(&'s M) -> &'s str) -> HashMap<&'s str, Vec<&'s M>> {
    let mut groups: HashMap<&str, Vec<&M>> = HashMap::new();
    for item in items {
        groups.entry(parent(item)).or_default().push(item);
    }
    groups
}

/// Search result form of a place: its record without the amenity links.
pub fn search_record(place: &Place) -> Value {
    let mut record = place.to_record();
    if let Value::Object(map) = &mut record {
        map.remove("amenity_ids");
        map.remove("amenities");
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageEngine;
    use crate::test_support::{amenity, city, place, state, user};
    use models::Entity;

    struct World {
        engine: StorageEngine,
        california: String,
        nevada: String,
        sf: String,
        reno: String,
        wifi: String,
        pool: String,
        /// [sf_loft (wifi+pool), sf_flat (wifi), la_house (pool), reno_cabin (none)]
        places: [String; 4],
    }

    async fn world() -> Result<World, anyhow::Error> {
        let engine = StorageEngine::memory();
        let mut session = engine.open().await?;
        let owner = user("owner@hbnb.io");
        let california = state("California");
        let nevada = state("Nevada");
        let sf = city(&california, "San Francisco");
        let la = city(&california, "Los Angeles");
        let reno = city(&nevada, "Reno");
        let wifi = amenity("Wifi");
        let pool = amenity("Pool");

        let mut sf_loft = place(&sf, &owner, "SF Loft");
        sf_loft.link_amenity(wifi.id());
        sf_loft.link_amenity(pool.id());
        let mut sf_flat = place(&sf, &owner, "SF Flat");
        sf_flat.link_amenity(wifi.id());
        let mut la_house = place(&la, &owner, "LA House");
        la_house.link_amenity(pool.id());
        let reno_cabin = place(&reno, &owner, "Reno Cabin");

        let out = World {
            engine: engine.clone(),
            california: california.id().to_string(),
            nevada: nevada.id().to_string(),
            sf: sf.id().to_string(),
            reno: reno.id().to_string(),
            wifi: wifi.id().to_string(),
            pool: pool.id().to_string(),
            places: [
                sf_loft.id().to_string(),
                sf_flat.id().to_string(),
                la_house.id().to_string(),
                reno_cabin.id().to_string(),
            ],
        };
        for entity in [
            Entity::from(owner),
            california.into(),
            nevada.into(),
            sf.into(),
            la.into(),
            reno.into(),
            wifi.into(),
            pool.into(),
            sf_loft.into(),
            sf_flat.into(),
            la_house.into(),
            reno_cabin.into(),
        ] {
            session.add(entity);
        }
        session.save().await?;
        Ok(out)
    }

    fn criteria(states: &[&String], cities: &[&String], amenities: &[&String]) -> SearchCriteria {
        let list = |v: &[&String]| -> Option<Vec<String>> { Some(v.iter().map(|s| s.to_string()).collect()) };
        SearchCriteria { states: list(states), cities: list(cities), amenities: list(amenities) }
    }

    fn sorted_ids(found: Vec<&Place>) -> Vec<String> {
        let mut ids: Vec<String> = found.into_iter().map(|p| p.id().to_string()).collect();
        ids.sort();
        ids
    }

    fn expect(ids: &[&String]) -> Vec<String> {
        let mut ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        ids.sort();
        ids
    }

    #[tokio::test]
    async fn empty_criteria_returns_every_place() -> Result<(), anyhow::Error> {
        let w = world().await?;
        let session = w.engine.open().await?;
        assert_eq!(places_search(&session, &SearchCriteria::default()).len(), 4);
        assert_eq!(places_search(&session, &criteria(&[], &[], &[])).len(), 4);
        Ok(())
    }

    #[tokio::test]
    async fn states_select_places_of_their_cities() -> Result<(), anyhow::Error> {
        let w = world().await?;
        let session = w.engine.open().await?;
        let [loft, flat, house, _] = &w.places;
        let found = places_search(&session, &criteria(&[&w.california], &[], &[]));
        assert_eq!(sorted_ids(found), expect(&[loft, flat, house]));
        Ok(())
    }

    #[tokio::test]
    async fn state_and_city_overlap_is_deduplicated() -> Result<(), anyhow::Error> {
        let w = world().await?;
        let session = w.engine.open().await?;
        let [loft, flat, house, cabin] = &w.places;
        let found = places_search(&session, &criteria(&[&w.california], &[&w.sf, &w.reno], &[]));
        assert_eq!(sorted_ids(found), expect(&[loft, flat, house, cabin]));

        let found = places_search(&session, &criteria(&[&w.california, &w.california], &[], &[]));
        assert_eq!(found.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_ids_are_skipped() -> Result<(), anyhow::Error> {
        let w = world().await?;
        let session = w.engine.open().await?;
        let bogus = "nope".to_string();
        let [.., cabin] = &w.places;
        let found = places_search(&session, &criteria(&[&bogus, &w.nevada], &[&bogus], &[]));
        assert_eq!(sorted_ids(found), expect(&[cabin]));
        assert!(places_search(&session, &criteria(&[&bogus], &[], &[])).is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn amenities_require_all_and_seed_from_everything() -> Result<(), anyhow::Error> {
        let w = world().await?;
        let session = w.engine.open().await?;
        let [loft, flat, house, _] = &w.places;

        let found = places_search(&session, &criteria(&[], &[], &[&w.wifi, &w.pool]));
        assert_eq!(sorted_ids(found), expect(&[loft]));

        let found = places_search(&session, &criteria(&[], &[], &[&w.pool]));
        assert_eq!(sorted_ids(found), expect(&[loft, house]));

        let found = places_search(&session, &criteria(&[], &[&w.sf], &[&w.wifi]));
        assert_eq!(sorted_ids(found), expect(&[loft, flat]));

        // nothing selected by the unknown state, so amenities start from all places
        let bogus = "nope".to_string();
        let found = places_search(&session, &criteria(&[&bogus], &[], &[&w.pool]));
        assert_eq!(sorted_ids(found), expect(&[loft, house]));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_amenity_matches_nothing() -> Result<(), anyhow::Error> {
        let w = world().await?;
        let session = w.engine.open().await?;
        let bogus = "nope".to_string();
        assert!(places_search(&session, &criteria(&[], &[], &[&w.wifi, &bogus])).is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn search_record_strips_amenity_links() -> Result<(), anyhow::Error> {
        let w = world().await?;
        let session = w.engine.open().await?;
        let loft = session.get::<Place>(&w.places[0]).expect("loft");
        let record = search_record(loft);
        assert!(record.get("amenity_ids").is_none());
        assert_eq!(record["__class__"], "Place");
        assert_eq!(record["name"], "SF Loft");
        Ok(())
    }
}
