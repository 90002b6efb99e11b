//! Storage abstractions for the service layer.
//!
//! `StorageEngine` lives for the whole process and opens one `Session` per
//! request. Sessions read a full snapshot from the backend and write back
//! only what changed.

pub mod backend;
pub mod db;
pub mod engine;
pub mod file;
pub mod memory;
pub mod session;

pub use backend::{ChangeSet, StorageBackend};
pub use db::DbBackend;
pub use engine::StorageEngine;
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use session::Session;
