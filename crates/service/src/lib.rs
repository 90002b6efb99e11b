//! Service layer: the storage engine every request goes through and the
//! place search built on top of it.
//! - Backends (file, database, memory) hide behind one async trait.
//! - A `Session` is the per-request working copy of the collection.

pub mod errors;
pub mod search;
pub mod storage;
#[cfg(test)]
pub mod test_support;

pub use errors::StorageError;
pub use search::{places_search, SearchCriteria};
pub use storage::{ChangeSet, Session, StorageBackend, StorageEngine};
