use async_trait::async_trait;
use models::{Entity, EntityKey};

use crate::errors::StorageError;

/// Pending writes of one session, handed to the backend on `save`.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub upserts: Vec<Entity>,
    pub deletes: Vec<EntityKey>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.upserts.len() + self.deletes.len()
    }
}

/// Persistence contract shared by every backend.
///
/// `load` returns the whole logical collection; `commit` applies a change set
/// atomically where the backend can.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn load(&self) -> Result<Vec<Entity>, StorageError>;

    async fn commit(&self, changes: ChangeSet) -> Result<(), StorageError>;

    /// Release process-wide resources. Most backends hold none.
    async fn shutdown(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
