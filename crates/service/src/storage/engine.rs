use std::sync::Arc;

use configs::{AppConfig, StorageKind};
use tracing::{debug, info, instrument};

use super::{
    backend::StorageBackend, db::DbBackend, file::FileBackend, memory::MemoryBackend,
    session::Session,
};
use crate::errors::StorageError;

/// Process-wide handle on the configured backend. Cheap to clone.
#[derive(Clone)]
pub struct StorageEngine {
    backend: Arc<dyn StorageBackend>,
}

impl StorageEngine {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Build the backend selected by `storage.kind`.
    pub async fn from_config(cfg: &AppConfig) -> Result<Self, StorageError> {
        let backend: Arc<dyn StorageBackend> = match cfg.storage.kind {
            StorageKind::File => Arc::new(FileBackend::new(cfg.storage.file_path.clone())),
            StorageKind::Db => Arc::new(DbBackend::connect(&cfg.database).await?),
            StorageKind::Memory => Arc::new(MemoryBackend::new()),
        };
        info!(backend = backend.name(), "storage engine ready");
        Ok(Self::new(backend))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Load a fresh snapshot into a new session.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn open(&self) -> Result<Session, StorageError> {
        let entities = self.backend.load().await?;
        debug!(entities = entities.len(), "session opened");
        Ok(Session::new(self.backend.clone(), entities))
    }

    pub async fn shutdown(&self) -> Result<(), StorageError> {
        self.backend.shutdown().await?;
        info!(backend = self.backend.name(), "storage engine shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_file;
    use models::{Model, NewState, State};

    #[tokio::test]
    async fn file_engine_from_config_round_trips() -> Result<(), anyhow::Error> {
        let mut cfg = AppConfig::default();
        cfg.storage.kind = StorageKind::File;
        cfg.storage.file_path = temp_file();
        let engine = StorageEngine::from_config(&cfg).await?;
        assert_eq!(engine.backend_name(), "file");

        let mut session = engine.open().await?;
        let state = NewState { name: Some("Oregon".into()), ..Default::default() }.into_state()?;
        let id = state.id().to_string();
        session.add(state);
        session.save().await?;
        session.close();

        let session = engine.open().await?;
        assert_eq!(session.get::<State>(&id).map(|s| s.name.as_str()), Some("Oregon"));
        session.close();

        engine.shutdown().await?;
        let _ = tokio::fs::remove_dir_all(cfg.storage.file_path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn memory_engine_sessions_do_not_share_unsaved_state() -> Result<(), anyhow::Error> {
        let engine = StorageEngine::memory();
        let mut first = engine.open().await?;
        first.add(NewState { name: Some("Maine".into()), ..Default::default() }.into_state()?);
        first.close();

        let second = engine.open().await?;
        assert_eq!(second.count(None), 0);
        Ok(())
    }
}
