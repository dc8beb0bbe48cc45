//! Durable key/value storage for stats and preferences.
//!
//! Values are JSON strings under fixed string keys. Three backends share the
//! [`KeyValueStore`] trait: SQLite via diesel, a directory of JSON files, and
//! an in-process map.

mod error;
mod json_dir;
mod memory;
mod models;
mod schema;
mod sqlite;

pub use error::StoreError;
pub use json_dir::JsonDirStore;
pub use memory::MemoryStore;
pub use models::{KvEntry, NewKvEntry};
pub use sqlite::SqliteStore;

/// String-keyed storage of JSON documents.
///
/// Implementations are synchronous; every call is a complete read or write.
pub trait KeyValueStore: std::fmt::Debug {
    /// Returns the stored value, or `None` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
