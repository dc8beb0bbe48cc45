//! SQLite store built on diesel.

use chrono::Utc;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use super::{KeyValueStore, KvEntry, NewKvEntry, StoreError, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Key/value store in a single SQLite table.
///
/// A connection is established per operation, so the store is cheap to clone
/// and holds no open handle between calls.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Opens the database at `db_path`, creating it and applying pending
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path.as_ref()))]
    pub fn open(db_path: impl AsRef<str>) -> Result<Self, StoreError> {
        let store = Self {
            db_path: db_path.as_ref().to_string(),
        };
        let mut conn = store.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::new(format!("Migrations failed: {}", e)))?;
        info!(path = %store.db_path, migrations = applied.len(), "SqliteStore ready");
        Ok(store)
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Lists every stored row, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn entries(&self) -> Result<Vec<KvEntry>, StoreError> {
        let mut conn = self.connection()?;
        let entries = schema::kv_entries::table
            .order(schema::kv_entries::key.asc())
            .select(KvEntry::as_select())
            .load(&mut conn)?;
        info!(count = entries.len(), "Entries loaded");
        Ok(entries)
    }

    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| StoreError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }
}

impl KeyValueStore for SqliteStore {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection()?;
        let value = schema::kv_entries::table
            .find(key)
            .select(schema::kv_entries::value)
            .first::<String>(&mut conn)
            .optional()?;
        debug!(found = value.is_some(), "Entry lookup");
        Ok(value)
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let entry = NewKvEntry::new(key.to_string(), value.to_string(), Utc::now().naive_utc());
        diesel::replace_into(schema::kv_entries::table)
            .values(&entry)
            .execute(&mut conn)?;
        debug!("Entry written");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let removed = diesel::delete(schema::kv_entries::table.find(key)).execute(&mut conn)?;
        debug!(removed, "Entry removed");
        Ok(())
    }
}
