//! Database models for the key/value table.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use super::schema;

/// Stored key/value row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::kv_entries)]
#[diesel(primary_key(key))]
pub struct KvEntry {
    key: String,
    value: String,
    updated_at: NaiveDateTime,
}

/// Insertable row; written with `REPLACE INTO` so it doubles as an update.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::kv_entries)]
pub struct NewKvEntry {
    key: String,
    value: String,
    updated_at: NaiveDateTime,
}
