//! Request-scoped storage: one lazily opened session per request, closed by
//! the middleware once the handler has produced its response.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use service::{Session, StorageEngine, StorageError};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

use crate::state::AppState;

#[derive(Clone)]
pub struct RequestStorage {
    engine: StorageEngine,
    slot: Arc<Mutex<Option<Session>>>,
}

impl RequestStorage {
    pub fn new(engine: StorageEngine) -> Self {
        Self { engine, slot: Arc::new(Mutex::new(None)) }
    }

    /// The request's session, loading it from the backend on first use.
    pub async fn session(&self) -> Result<MappedMutexGuard<'_, Session>, StorageError> {
        let mut slot = self.slot.lock().await;
        let session = match slot.take() {
            Some(session) => session,
            None => self.engine.open().await?,
        };
        Ok(MutexGuard::map(slot, move |slot| slot.insert(session)))
    }

    pub async fn is_open(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    pub async fn close(&self) {
        if let Some(session) = self.slot.lock().await.take() {
            session.close();
        }
    }
}

/// Attach a `RequestStorage` to the request and close it afterwards,
/// whatever the handler returned.
pub async fn storage_session(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let storage = RequestStorage::new(state.engine.clone());
    req.extensions_mut().insert(storage.clone());
    let response = next.run(req).await;
    storage.close().await;
    response
}
