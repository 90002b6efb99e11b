use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use models::{Amenity, City, Entity, EntityKey, EntityKind, Model, Place, Review};
use tracing::{debug, instrument, warn};

use super::backend::{ChangeSet, StorageBackend};
use crate::errors::StorageError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Upsert,
    Delete,
}

/// Per-request working copy of the whole collection.
///
/// Reads are served from the snapshot taken at open time. Writes stay pending
/// until `save`; `close` (or drop) discards whatever was not saved.
pub struct Session {
    backend: Arc<dyn StorageBackend>,
    objects: HashMap<EntityKey, Entity>,
    pending: HashMap<EntityKey, Pending>,
    closed: bool,
}

impl Session {
    pub(crate) fn new(backend: Arc<dyn StorageBackend>, entities: Vec<Entity>) -> Self {
        let objects = entities.into_iter().map(|e| (e.key(), e)).collect();
        Self { backend, objects, pending: HashMap::new(), closed: false }
    }

    pub fn get<M: Model>(&self, id: &str) -> Option<&M> {
        self.objects.get(&EntityKey::new(M::KIND, id)).and_then(M::from_entity)
    }

    pub fn get_entity(&self, kind: EntityKind, id: &str) -> Option<&Entity> {
        self.objects.get(&EntityKey::new(kind, id))
    }

    /// Every entity of one kind, oldest first.
    pub fn all<M: Model>(&self) -> Vec<&M> {
        let mut items: Vec<&M> = self.objects.values().filter_map(M::from_entity).collect();
        items.sort_by(|a, b| {
            (a.base().created_at, a.id()).cmp(&(b.base().created_at, b.id()))
        });
        items
    }

    /// Entities of `kind`, or of every kind when `None`, oldest first.
    pub fn entities(&self, kind: Option<EntityKind>) -> Vec<&Entity> {
        let mut items: Vec<&Entity> = self
            .objects
            .values()
            .filter(|e| kind.map_or(true, |k| e.kind() == k))
            .collect();
        items.sort_by(|a, b| (a.base().created_at, a.id()).cmp(&(b.base().created_at, b.id())));
        items
    }

    pub fn count(&self, kind: Option<EntityKind>) -> usize {
        match kind {
            None => self.objects.len(),
            Some(k) => self.objects.keys().filter(|key| key.kind == k).count(),
        }
    }

    /// Insert or replace; durable only after `save`.
    pub fn add(&mut self, entity: impl Into<Entity>) {
        let entity = entity.into();
        let key = entity.key();
        self.objects.insert(key.clone(), entity);
        self.pending.insert(key, Pending::Upsert);
    }

    /// Remove an entity together with everything that depends on it.
    ///
    /// States take their cities, cities their places, places their reviews.
    /// Users take the places they own and the reviews they wrote. Amenities
    /// are unlinked from every place. Returns `false` when nothing matched.
    pub fn delete(&mut self, kind: EntityKind, id: &str) -> bool {
        let root = EntityKey::new(kind, id);
        if !self.objects.contains_key(&root) {
            return false;
        }

        let doomed = self.cascade_from(root);
        for key in &doomed {
            self.objects.remove(key);
            self.pending.insert(key.clone(), Pending::Delete);
        }

        if kind == EntityKind::Amenity {
            let mut touched = Vec::new();
            for entity in self.objects.values_mut() {
                if let Entity::Place(place) = entity {
                    if place.unlink_amenity(id) {
                        touched.push(place.key());
                    }
                }
            }
            for key in touched {
                self.pending.insert(key, Pending::Upsert);
            }
        }

        debug!(%kind, id, removed = doomed.len(), "entity deleted");
        true
    }

    fn cascade_from(&self, root: EntityKey) -> Vec<EntityKey> {
        let mut seen: HashSet<EntityKey> = HashSet::new();
        let mut ordered = Vec::new();
        let mut queue = vec![root];

        while let Some(key) = queue.pop() {
            if !seen.insert(key.clone()) {
                continue;
            }
            match key.kind {
                EntityKind::State => {
                    queue.extend(self.cities_of(&key.id).into_iter().map(Model::key));
                }
                EntityKind::City => {
                    queue.extend(self.places_of(&key.id).into_iter().map(Model::key));
                }
                EntityKind::Place => {
                    queue.extend(self.reviews_of(&key.id).into_iter().map(Model::key));
                }
                EntityKind::User => {
                    queue.extend(
                        self.all::<Place>().into_iter().filter(|p| p.user_id == key.id).map(Model::key),
                    );
                    queue.extend(
                        self.all::<Review>().into_iter().filter(|r| r.user_id == key.id).map(Model::key),
                    );
                }
                EntityKind::Amenity | EntityKind::Review => {}
            }
            ordered.push(key);
        }
        ordered
    }

    pub fn cities_of(&self, state_id: &str) -> Vec<&City> {
        self.all::<City>().into_iter().filter(|c| c.state_id == state_id).collect()
    }

    pub fn places_of(&self, city_id: &str) -> Vec<&Place> {
        self.all::<Place>().into_iter().filter(|p| p.city_id == city_id).collect()
    }

    pub fn reviews_of(&self, place_id: &str) -> Vec<&Review> {
        self.all::<Review>().into_iter().filter(|r| r.place_id == place_id).collect()
    }

    /// Linked amenities that still exist, in link order.
    pub fn amenities_of(&self, place: &Place) -> Vec<&Amenity> {
        place.amenity_ids.iter().filter_map(|id| self.get::<Amenity>(id)).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Commit pending changes. A no-op when nothing is pending; on failure
    /// the changes stay pending.
    #[instrument(skip(self), fields(backend = self.backend.name(), pending = self.pending.len()))]
    pub async fn save(&mut self) -> Result<(), StorageError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let mut changes = ChangeSet::default();
        for (key, op) in &self.pending {
            match op {
                Pending::Delete => changes.deletes.push(key.clone()),
                Pending::Upsert => {
                    if let Some(entity) = self.objects.get(key) {
                        changes.upserts.push(entity.clone());
                    }
                }
            }
        }
        self.backend.commit(changes).await?;
        self.pending.clear();
        Ok(())
    }

    /// Release the session, discarding anything not saved.
    pub fn close(mut self) {
        self.release("closed");
    }

    fn release(&mut self, how: &str) {
        if self.closed {
            return;
        }
        self.closed = true;
        if !self.pending.is_empty() {
            warn!(discarded = self.pending.len(), how, "session released with unsaved changes");
            self.pending.clear();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release("dropped");
    }
}
