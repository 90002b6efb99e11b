use std::collections::HashMap;

use async_trait::async_trait;
use models::{Entity, EntityKey};
use tokio::sync::RwLock;

use super::backend::{ChangeSet, StorageBackend};
use crate::errors::StorageError;

/// Process-memory backend for tests, benches and throwaway runs.
#[derive(Default)]
pub struct MemoryBackend {
    inner: RwLock<HashMap<EntityKey, Entity>>,
}

impl MemoryBackend {
    pub fn new() -> Self { Self::default() }

    /// Pre-populate the backend, bypassing sessions.
    pub fn with_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let map = entities.into_iter().map(|e| (e.key(), e)).collect();
        Self { inner: RwLock::new(map) }
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn name(&self) -> &'static str { "memory" }

    async fn load(&self) -> Result<Vec<Entity>, StorageError> {
        let map = self.inner.read().await;
        Ok(map.values().cloned().collect())
    }

    async fn commit(&self, changes: ChangeSet) -> Result<(), StorageError> {
        let mut map = self.inner.write().await;
        for key in &changes.deletes {
            map.remove(key);
        }
        for entity in changes.upserts {
            map.insert(entity.key(), entity);
        }
        Ok(())
    }
}
