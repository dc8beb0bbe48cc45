//! Tutor configuration.
//!
//! Loaded from TOML. Every field is optional; an absent file means built-in
//! defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strum::EnumString;
use tracing::{debug, info, instrument};
use typing_tutor_core::{ProgressionRules, SHAKE_DURATION};

use crate::store::{JsonDirStore, KeyValueStore, MemoryStore, SqliteStore, StoreError};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TYPING_TUTOR_CONFIG";

/// Environment variable naming the data directory.
pub const DATA_ENV: &str = "TYPING_TUTOR_DATA";

/// SQLite database file name inside the data directory.
pub const DB_FILE: &str = "typing_tutor.db";

/// Log file name inside the data directory.
pub const LOG_FILE: &str = "typing_tutor.log";

/// Where stats and preferences are kept.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageKind {
    /// SQLite database in the data directory.
    #[default]
    Sqlite,
    /// One JSON file per record in the data directory.
    Json,
    /// Nothing is kept after exit.
    Memory,
}

/// Delays driving the play loop, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// How long a mistyped word shakes.
    shake_ms: u64,
    /// Pause between a completed word and the next one.
    next_word_ms: u64,
    /// How long the level-change notice stays up.
    level_notice_ms: u64,
    /// Delay before the new tier's label is spoken.
    level_speech_ms: u64,
    /// Delay between the victory fanfare and the spoken cheer.
    victory_cheer_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            shake_ms: SHAKE_DURATION.as_millis() as u64,
            next_word_ms: 1000,
            level_notice_ms: 3000,
            level_speech_ms: 2500,
            victory_cheer_ms: 800,
        }
    }
}

impl Timings {
    /// Shake duration.
    pub fn shake(&self) -> Duration {
        Duration::from_millis(self.shake_ms)
    }

    /// Word-to-word delay.
    pub fn next_word(&self) -> Duration {
        Duration::from_millis(self.next_word_ms)
    }

    /// Level notice duration.
    pub fn level_notice(&self) -> Duration {
        Duration::from_millis(self.level_notice_ms)
    }

    /// Deferred speech delay after a tier change.
    pub fn level_speech(&self) -> Duration {
        Duration::from_millis(self.level_speech_ms)
    }

    /// Delay before the victory cheer.
    pub fn victory_cheer(&self) -> Duration {
        Duration::from_millis(self.victory_cheer_ms)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    /// Storage backend.
    storage: StorageKind,
    /// Data directory override.
    data_dir: Option<PathBuf>,
    /// Play loop delays.
    timings: Timings,
    /// Tier change thresholds.
    progression: ProgressionRules,
}

impl TutorConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(storage = %config.storage, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid configuration.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        let r = config.progression;
        config.progression = ProgressionRules::new(
            *r.window_capacity(),
            *r.min_samples(),
            *r.promote_at(),
            *r.demote_below(),
        );
        Ok(config)
    }

    /// Resolves and loads configuration.
    ///
    /// Order: `explicit` path, then `$TYPING_TUTOR_CONFIG`, then
    /// `$XDG_CONFIG_HOME/typing_tutor/config.toml` if it exists, else
    /// defaults. An explicitly named file must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a named file cannot be loaded.
    #[instrument]
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            debug!(path = %path, "Using TYPING_TUTOR_CONFIG env var");
            return Self::from_file(path);
        }
        if let Some(path) = Self::default_config_path().filter(|p| p.is_file()) {
            return Self::from_file(path);
        }
        debug!("No config file; using defaults");
        Ok(Self::default())
    }

    /// Default config file location, when `$XDG_CONFIG_HOME` is set.
    #[instrument]
    pub fn default_config_path() -> Option<PathBuf> {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(|xdg| PathBuf::from(xdg).join("typing_tutor").join("config.toml"))
    }

    /// Returns a copy with a different storage backend.
    pub fn with_storage(mut self, storage: StorageKind) -> Self {
        self.storage = storage;
        self
    }

    /// Returns a copy with a fixed data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Data directory: the configured value, `$TYPING_TUTOR_DATA`,
    /// `$XDG_DATA_HOME/typing_tutor`, else `./.typing_tutor`.
    #[instrument(skip(self))]
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        if let Ok(dir) = std::env::var(DATA_ENV) {
            debug!(path = %dir, "Using TYPING_TUTOR_DATA env var");
            return PathBuf::from(dir);
        }
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            let dir = PathBuf::from(xdg).join("typing_tutor");
            debug!(path = %dir.display(), "Using XDG_DATA_HOME path");
            return dir;
        }
        debug!("Falling back to ./.typing_tutor");
        PathBuf::from(".typing_tutor")
    }

    /// Opens the configured storage backend.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the data directory or database cannot be
    /// prepared.
    #[instrument(skip(self), fields(storage = %self.storage))]
    pub fn open_store(&self) -> Result<Box<dyn KeyValueStore + Send>, StoreError> {
        match self.storage {
            StorageKind::Memory => Ok(Box::new(MemoryStore::new())),
            StorageKind::Json => Ok(Box::new(JsonDirStore::new(self.resolved_data_dir()))),
            StorageKind::Sqlite => {
                let dir = self.resolved_data_dir();
                std::fs::create_dir_all(&dir)?;
                let db_path = dir.join(DB_FILE);
                let db_path = db_path.to_str().ok_or_else(|| {
                    StoreError::new(format!("Non UTF-8 database path: {}", db_path.display()))
                })?;
                Ok(Box::new(SqliteStore::open(db_path)?))
            }
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config = TutorConfig::from_toml_str("").unwrap();
        assert_eq!(config, TutorConfig::default());
        assert_eq!(config.timings().shake(), Duration::from_millis(300));
    }

    #[test]
    fn test_min_samples_clamped_to_capacity() {
        let config = TutorConfig::from_toml_str(
            "[progression]\nwindow_capacity = 3\nmin_samples = 9\n",
        )
        .unwrap();
        assert_eq!(*config.progression().min_samples(), 3);
        assert_eq!(*config.progression().promote_at(), 80.0);
    }

    #[test]
    fn test_unknown_storage_rejected() {
        assert!(TutorConfig::from_toml_str("storage = \"redis\"").is_err());
    }
}
