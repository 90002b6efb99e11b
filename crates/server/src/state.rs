use service::StorageEngine;

/// Shared application state handed to the router.
#[derive(Clone)]
pub struct AppState {
    pub engine: StorageEngine,
}

impl AppState {
    pub fn new(engine: StorageEngine) -> Self { Self { engine } }
}
