//! Durable player records: aggregate statistics and preferences.
//!
//! These are plain data with pure update rules. Loading and saving them is
//! the storage layer's job.

use crate::path::LearningPath;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::{debug, info, instrument};

/// Storage key for [`GameStats`].
pub const STATS_KEY: &str = "tatum-typing-stats";

/// Storage key for [`Preferences`].
pub const PREFERENCES_KEY: &str = "tatum-typing-preferences";

/// Rounded percentage of `part` in `whole`; 0 when `whole` is 0.
fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        0
    } else {
        (f64::from(part) / f64::from(whole) * 100.0).round().min(100.0) as u32
    }
}

/// Result of one finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GameSummary {
    words_completed: u32,
    perfect_words: u32,
    max_streak: u32,
    /// Percentage of words typed perfectly, rounded.
    accuracy: u32,
    did_win: bool,
}

impl GameSummary {
    /// Summarises a game; accuracy is derived from the word counts.
    #[instrument]
    pub fn new(words_completed: u32, perfect_words: u32, max_streak: u32, did_win: bool) -> Self {
        Self {
            words_completed,
            perfect_words,
            max_streak,
            accuracy: percent(perfect_words, words_completed),
            did_win,
        }
    }
}

/// Milestones unlocked at the end of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum Achievement {
    /// The first recorded game.
    FirstGame,
    /// A won game with every word typed perfectly.
    PerfectGame,
    /// A best streak of five perfect words or more.
    StreakOfFive,
    /// Twenty or more words in a single game.
    SuperStar,
}

impl Achievement {
    fn earned_by(self, summary: &GameSummary, stats: &GameStats) -> bool {
        match self {
            Self::FirstGame => stats.total_games_played >= 1,
            Self::PerfectGame => {
                summary.did_win
                    && summary.words_completed > 0
                    && summary.perfect_words == summary.words_completed
            }
            Self::StreakOfFive => summary.max_streak >= 5,
            Self::SuperStar => summary.words_completed >= 20,
        }
    }
}

/// Aggregate statistics across every session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default, rename_all = "camelCase")]
pub struct GameStats {
    total_games_played: u32,
    total_words_typed: u32,
    total_perfect_words: u32,
    highest_streak: u32,
    best_accuracy: u32,
    games_won: u32,
    #[serde(alias = "lastPlayedTimestamp")]
    last_played: Option<DateTime<Utc>>,
    /// Unlocked achievement identifiers, in unlock order.
    achievements: Vec<String>,
}

impl Default for GameStats {
    fn default() -> Self {
        Self {
            total_games_played: 0,
            total_words_typed: 0,
            total_perfect_words: 0,
            highest_streak: 0,
            best_accuracy: 0,
            games_won: 0,
            last_played: None,
            achievements: Vec::new(),
        }
    }
}

impl GameStats {
    /// Folds a finished game into the totals.
    ///
    /// Returns the achievements unlocked by this game.
    #[instrument(skip(self))]
    pub fn record_game(&mut self, summary: &GameSummary, now: DateTime<Utc>) -> Vec<Achievement> {
        self.total_games_played = self.total_games_played.saturating_add(1);
        self.total_words_typed = self.total_words_typed.saturating_add(summary.words_completed);
        self.total_perfect_words = self
            .total_perfect_words
            .saturating_add(summary.perfect_words);
        self.highest_streak = self.highest_streak.max(summary.max_streak);
        self.best_accuracy = self.best_accuracy.max(summary.accuracy);
        if summary.did_win {
            self.games_won = self.games_won.saturating_add(1);
        }
        self.last_played = Some(now);

        let unlocked: Vec<Achievement> = [
            Achievement::FirstGame,
            Achievement::PerfectGame,
            Achievement::StreakOfFive,
            Achievement::SuperStar,
        ]
        .into_iter()
        .filter(|a| !self.has_achievement(*a) && a.earned_by(summary, self))
        .collect();

        for achievement in &unlocked {
            info!(%achievement, "Achievement unlocked");
            self.achievements.push(achievement.to_string());
        }

        debug!(
            games = self.total_games_played,
            words = self.total_words_typed,
            "Game recorded"
        );
        unlocked
    }

    /// Whether an achievement has already been unlocked.
    pub fn has_achievement(&self, achievement: Achievement) -> bool {
        self.achievements.iter().any(|a| a == achievement.as_ref())
    }

    /// Lifetime share of perfect words, rounded; 0 before any word.
    pub fn average_accuracy(&self) -> u32 {
        percent(self.total_perfect_words, self.total_words_typed)
    }
}

/// Player preferences.
///
/// Fields missing from stored data take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    last_selected_path: LearningPath,
    sound_enabled: bool,
    words_per_game: u32,
    show_keyboard_hints: bool,
    player_name: String,
    #[serde(rename = "showUpperCaseKeyboard")]
    show_upper_case_keyboard: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            last_selected_path: LearningPath::Kindergarten,
            sound_enabled: true,
            words_per_game: 10,
            show_keyboard_hints: true,
            player_name: "Tatum".to_string(),
            show_upper_case_keyboard: false,
        }
    }
}

/// A change to a single preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceUpdate {
    /// Path preselected in the menu.
    LastSelectedPath(LearningPath),
    /// Whether sound effects and speech play.
    SoundEnabled(bool),
    /// Words in one game; at least 1.
    WordsPerGame(u32),
    /// Whether the next key is highlighted.
    ShowKeyboardHints(bool),
    /// Name used in greetings.
    PlayerName(String),
    /// Whether the on-screen keyboard shows capitals.
    ShowUpperCaseKeyboard(bool),
}

impl Preferences {
    /// Applies one update, leaving every other field untouched.
    #[instrument(skip(self))]
    pub fn apply(&mut self, update: PreferenceUpdate) {
        match update {
            PreferenceUpdate::LastSelectedPath(path) => self.last_selected_path = path,
            PreferenceUpdate::SoundEnabled(on) => self.sound_enabled = on,
            PreferenceUpdate::WordsPerGame(n) => self.words_per_game = n.max(1),
            PreferenceUpdate::ShowKeyboardHints(on) => self.show_keyboard_hints = on,
            PreferenceUpdate::PlayerName(name) => self.player_name = name,
            PreferenceUpdate::ShowUpperCaseKeyboard(on) => self.show_upper_case_keyboard = on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_accuracy_rounds() {
        assert_eq!(*GameSummary::new(3, 2, 1, true).accuracy(), 67);
        assert_eq!(*GameSummary::new(0, 0, 0, false).accuracy(), 0);
    }

    #[test]
    fn test_record_game_accumulates() {
        let mut stats = GameStats::default();
        let now = Utc::now();
        stats.record_game(&GameSummary::new(10, 8, 4, true), now);
        stats.record_game(&GameSummary::new(5, 1, 1, false), now);

        assert_eq!(*stats.total_games_played(), 2);
        assert_eq!(*stats.total_words_typed(), 15);
        assert_eq!(*stats.total_perfect_words(), 9);
        assert_eq!(*stats.highest_streak(), 4);
        assert_eq!(*stats.best_accuracy(), 80);
        assert_eq!(*stats.games_won(), 1);
        assert_eq!(*stats.last_played(), Some(now));
        assert_eq!(stats.average_accuracy(), 60);
    }

    #[test]
    fn test_achievements_unlock_once() {
        let mut stats = GameStats::default();
        let first = stats.record_game(&GameSummary::new(20, 20, 20, true), Utc::now());
        assert_eq!(first.len(), 4);
        let second = stats.record_game(&GameSummary::new(20, 20, 20, true), Utc::now());
        assert!(second.is_empty());
        assert_eq!(stats.achievements().len(), 4);
        assert!(stats.has_achievement(Achievement::SuperStar));
    }

    #[test]
    fn test_partial_preferences_fill_defaults() {
        let prefs: Preferences = serde_json::from_str(r#"{"soundEnabled": false}"#).unwrap();
        assert!(!prefs.sound_enabled());
        assert_eq!(*prefs.words_per_game(), 10);
        assert_eq!(prefs.player_name(), "Tatum");
        assert_eq!(*prefs.last_selected_path(), LearningPath::Kindergarten);
    }

    #[test]
    fn test_stats_json_uses_original_field_names() {
        let json = serde_json::to_value(GameStats::default()).unwrap();
        assert!(json.get("totalGamesPlayed").is_some());
        assert!(json.get("lastPlayed").is_some());
        let legacy: GameStats =
            serde_json::from_str(r#"{"gamesWon": 3, "lastPlayedTimestamp": null}"#).unwrap();
        assert_eq!(*legacy.games_won(), 3);
    }

    #[test]
    fn test_words_per_game_floor() {
        let mut prefs = Preferences::default();
        prefs.apply(PreferenceUpdate::WordsPerGame(0));
        assert_eq!(*prefs.words_per_game(), 1);
    }
}
