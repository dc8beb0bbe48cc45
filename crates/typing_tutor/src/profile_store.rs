//! Stats and preferences persistence.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use typing_tutor_core::{
    Achievement, GameStats, GameSummary, PREFERENCES_KEY, PreferenceUpdate, Preferences, STATS_KEY,
};

use crate::store::{KeyValueStore, StoreError};

/// In-memory copy of the player's records, written through to a
/// [`KeyValueStore`] on every change.
///
/// Reads happen once, in [`ProfileStore::load`]. A missing or unparseable
/// record loads as its default. A failed write is logged and the in-memory
/// value is kept, so play continues without durable storage.
#[derive(Debug)]
pub struct ProfileStore {
    store: Box<dyn KeyValueStore + Send>,
    stats: GameStats,
    preferences: Preferences,
}

impl ProfileStore {
    /// Loads both records from `store`.
    #[instrument(skip(store))]
    pub fn load(store: impl KeyValueStore + Send + 'static) -> Self {
        Self::from_boxed(Box::new(store))
    }

    /// Loads both records from an already boxed store.
    #[instrument(skip(store))]
    pub fn from_boxed(store: Box<dyn KeyValueStore + Send>) -> Self {
        let stats: GameStats = load_record(store.as_ref(), STATS_KEY);
        let preferences: Preferences = load_record(store.as_ref(), PREFERENCES_KEY);
        info!(
            games = stats.total_games_played(),
            path = %preferences.last_selected_path(),
            "Profile loaded"
        );
        Self {
            store,
            stats,
            preferences,
        }
    }

    /// Current aggregate statistics.
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Current preferences.
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Folds a finished game into the stats and saves them.
    ///
    /// Returns the achievements the game unlocked.
    #[instrument(skip(self))]
    pub fn record_game(&mut self, summary: &GameSummary) -> Vec<Achievement> {
        self.record_game_at(summary, Utc::now())
    }

    /// [`ProfileStore::record_game`] with an explicit timestamp.
    #[instrument(skip(self))]
    pub fn record_game_at(&mut self, summary: &GameSummary, now: DateTime<Utc>) -> Vec<Achievement> {
        let unlocked = self.stats.record_game(summary, now);
        self.save_stats();
        unlocked
    }

    /// Zeroes every statistic, achievements included.
    #[instrument(skip(self))]
    pub fn reset_stats(&mut self) {
        info!("Resetting stats");
        self.stats = GameStats::default();
        self.save_stats();
    }

    /// Applies one preference change and saves.
    #[instrument(skip(self))]
    pub fn update_preference(&mut self, update: PreferenceUpdate) {
        self.preferences.apply(update);
        self.save_preferences();
    }

    /// Applies several preference changes with a single save.
    #[instrument(skip(self, updates))]
    pub fn update_preferences(&mut self, updates: impl IntoIterator<Item = PreferenceUpdate>) {
        let mut changed = 0usize;
        for update in updates {
            self.preferences.apply(update);
            changed += 1;
        }
        if changed > 0 {
            self.save_preferences();
        }
        debug!(changed, "Preferences updated");
    }

    fn save_stats(&self) {
        if let Err(e) = save_record(self.store.as_ref(), STATS_KEY, &self.stats) {
            warn!(error = %e, key = STATS_KEY, "Failed to save stats; keeping in-memory copy");
        }
    }

    fn save_preferences(&self) {
        if let Err(e) = save_record(self.store.as_ref(), PREFERENCES_KEY, &self.preferences) {
            warn!(error = %e, key = PREFERENCES_KEY, "Failed to save preferences; keeping in-memory copy");
        }
    }
}

/// Reads and parses `key`, falling back to the default on any failure.
#[instrument(skip(store))]
fn load_record<T>(store: &(dyn KeyValueStore + Send), key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, key, "Stored record is corrupt; using defaults");
                T::default()
            }
        },
        Ok(None) => {
            debug!(key, "No stored record; using defaults");
            T::default()
        }
        Err(e) => {
            warn!(error = %e, key, "Failed to read record; using defaults");
            T::default()
        }
    }
}

#[instrument(skip(store, value))]
fn save_record<T: Serialize>(
    store: &(dyn KeyValueStore + Send),
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use typing_tutor_core::LearningPath;

    #[test]
    fn test_missing_records_load_defaults() {
        let profile = ProfileStore::load(MemoryStore::new());
        assert_eq!(profile.stats(), &GameStats::default());
        assert_eq!(profile.preferences(), &Preferences::default());
    }

    #[test]
    fn test_corrupt_stats_load_defaults() {
        let store = MemoryStore::with_entries([(STATS_KEY, "{not json")]);
        let profile = ProfileStore::load(store);
        assert_eq!(profile.stats(), &GameStats::default());
    }

    #[test]
    fn test_partial_preferences_fill_defaults() {
        let store = MemoryStore::with_entries([(PREFERENCES_KEY, r#"{"lastSelectedPath":"fun"}"#)]);
        let profile = ProfileStore::load(store);
        assert_eq!(*profile.preferences().last_selected_path(), LearningPath::Fun);
        assert_eq!(*profile.preferences().words_per_game(), 10);
        assert_eq!(profile.preferences().player_name(), "Tatum");
    }

    #[test]
    fn test_unknown_path_loads_default_preferences() {
        let store =
            MemoryStore::with_entries([(PREFERENCES_KEY, r#"{"lastSelectedPath":"thirdGrade"}"#)]);
        let profile = ProfileStore::load(store);
        assert_eq!(profile.preferences(), &Preferences::default());
    }

    #[test]
    fn test_reset_stats_zeroes() {
        let mut profile = ProfileStore::load(MemoryStore::new());
        profile.record_game(&GameSummary::new(10, 10, 10, true));
        assert!(!profile.stats().achievements().is_empty());
        profile.reset_stats();
        assert_eq!(profile.stats(), &GameStats::default());
    }
}
