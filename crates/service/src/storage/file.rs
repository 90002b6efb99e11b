use std::{collections::BTreeMap, io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use models::Entity;
use serde_json::Value;
use tokio::{fs, sync::Mutex};
use tracing::{debug, instrument, warn};

use super::backend::{ChangeSet, StorageBackend};
use crate::errors::StorageError;

type Document = BTreeMap<String, Value>;

/// JSON document backend.
///
/// The file holds one object mapping `"<Kind>.<id>"` to the entity record.
/// Every load re-reads the file; commits re-read, patch and rewrite it through
/// a temp file so a crash never leaves a truncated document behind.
pub struct FileBackend {
    file_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileBackend {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &std::path::Path { &self.file_path }

    async fn read_document(&self) -> Result<Document, StorageError> {
        match fs::read(&self.file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Document::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(&self, doc: &Document) -> Result<(), StorageError> {
        common::env::ensure_parent_dir(&self.file_path).await?;
        let data = serde_json::to_vec(doc)?;
        let mut tmp = self.file_path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, &self.file_path).await?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    fn name(&self) -> &'static str { "file" }

    async fn load(&self) -> Result<Vec<Entity>, StorageError> {
        let doc = self.read_document().await?;
        let mut entities = Vec::with_capacity(doc.len());
        for (key, record) in doc {
            match serde_json::from_value::<Entity>(record) {
                Ok(entity) => entities.push(entity),
                Err(e) => warn!(%key, error = %e, "skipping malformed record"),
            }
        }
        Ok(entities)
    }

    #[instrument(skip_all, fields(path = %self.file_path.display(), changes = changes.len()))]
    async fn commit(&self, changes: ChangeSet) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_document().await?;
        for key in &changes.deletes {
            doc.remove(&key.to_string());
        }
        for entity in &changes.upserts {
            doc.insert(entity.key().to_string(), entity.to_record());
        }
        self.write_document(&doc).await?;
        debug!(records = doc.len(), "document written");
        Ok(())
    }
}
