//! One player's game session: menu, playing and win screen.
//!
//! [`GameSession`] is a synchronous reducer. Each entry point returns the
//! [`Effect`]s it wants performed (events to publish, timers to arm or
//! cancel); the play loop carries them out. Fired timers come back through
//! [`GameSession::on_timer`] and are dropped when their ticket is stale.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use strum::Display;
use tracing::{debug, info, instrument, warn};
use typing_tutor_core::{
    Achievement, DifficultyProgression, FALLBACK_LEVEL, GameSummary, KeyInput, KeyOutcome,
    LearningPath, PreferenceUpdate, ProgressionRules, TierChange, TypingEngine, WordCatalog,
    streak_banner, win_message,
};

use crate::config::{Timings, TutorConfig};
use crate::profile_store::ProfileStore;
use crate::scheduler::{Timer, TimerSlot};

/// Word used when the catalog cannot supply one.
const LAST_RESORT_WORD: &str = "cat";

/// Spoken after the victory fanfare.
pub const VICTORY_CHEER: &str = "Hooray! You did it!";

/// Screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Path selection.
    Menu,
    /// Typing words.
    Playing,
    /// Win screen after the last word.
    Won,
}

/// Sound effects a front-end may play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SoundCue {
    /// Short click for a correct key.
    KeyClick,
    /// Low buzz for a wrong key.
    Error,
    /// Ding for a completed word.
    Success,
    /// Fanfare for a won game.
    Victory,
}

/// Notifications published to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A new word is on screen.
    WordAssigned {
        /// Word to type.
        word: String,
        /// Label of the current tier.
        tier_label: String,
        /// 1-based position of this word in the game.
        word_number: u32,
        /// Words in the game.
        words_per_game: u32,
    },
    /// Right key; the cursor is now at `cursor`.
    KeyCorrect {
        /// Cursor after the key.
        cursor: usize,
    },
    /// Wrong key; the word starts shaking.
    KeyError,
    /// The shake ended.
    ShakeCleared,
    /// The word was finished.
    WordComplete {
        /// Typed without mistakes.
        perfect: bool,
        /// Current run of perfect words.
        streak: u32,
    },
    /// The player moved to another tier.
    TierChanged {
        /// Direction of the move.
        change: TierChange,
        /// Label of the new tier.
        label: String,
    },
    /// The tier change notice should go away.
    NoticeHidden,
    /// Text to read aloud.
    Speak(String),
    /// Sound effect to play.
    Sound(SoundCue),
    /// The last word of the game was finished.
    GameWon {
        /// Recorded game result.
        summary: GameSummary,
        /// Win screen headline.
        message: String,
        /// Achievements this game unlocked.
        achievements: Vec<Achievement>,
    },
    /// Back on the menu. `recorded` holds the result of an unfinished game
    /// that was saved on the way out.
    ReturnedToMenu {
        /// Saved partial game, if any.
        recorded: Option<GameSummary>,
    },
}

/// Work the session asks its driver to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Publish an event.
    Emit(GameEvent),
    /// Arm a timer, replacing any in the same slot.
    Schedule {
        /// Delay before firing.
        delay: Duration,
        /// Timer to deliver.
        timer: Timer,
    },
    /// Disarm one slot.
    Cancel(TimerSlot),
    /// Disarm every slot.
    CancelAll,
}

/// Game state for one player.
#[derive(Debug)]
pub struct GameSession {
    phase: Phase,
    catalog: WordCatalog,
    progression: DifficultyProgression,
    rules: ProgressionRules,
    engine: TypingEngine,
    profile: ProfileStore,
    timings: Timings,
    rng: StdRng,
    words_override: Option<u32>,
    words_per_game: u32,
    words_completed: u32,
    perfect_words: u32,
    streak: u32,
    max_streak: u32,
    word_serial: u64,
    notice_serial: u64,
    game_serial: u64,
    notice: Option<(TierChange, String)>,
}

impl GameSession {
    /// Creates a session on the menu, seeded from the OS.
    #[instrument(skip(profile, config))]
    pub fn new(profile: ProfileStore, config: &TutorConfig) -> Self {
        Self::with_rng(profile, config, StdRng::from_entropy())
    }

    /// Creates a session with a caller-supplied random source.
    #[instrument(skip(profile, config, rng))]
    pub fn with_rng(profile: ProfileStore, config: &TutorConfig, rng: StdRng) -> Self {
        let path = *profile.preferences().last_selected_path();
        let rules = *config.progression();
        Self {
            phase: Phase::Menu,
            catalog: WordCatalog::builtin(),
            progression: DifficultyProgression::with_rules(path, rules),
            rules,
            engine: TypingEngine::new(""),
            words_per_game: *profile.preferences().words_per_game(),
            profile,
            timings: *config.timings(),
            rng,
            words_override: None,
            words_completed: 0,
            perfect_words: 0,
            streak: 0,
            max_streak: 0,
            word_serial: 0,
            notice_serial: 0,
            game_serial: 0,
            notice: None,
        }
    }

    /// Uses `words` instead of the stored preference for later games.
    pub fn set_words_override(&mut self, words: Option<u32>) {
        self.words_override = words.map(|n| n.max(1));
    }

    /// Starts a game on `path`, or on the remembered path when `None`.
    ///
    /// Choosing a path remembers it. The tier ladder starts from the entry
    /// tier. A game already in progress is saved as a loss first, as when
    /// leaving for the menu.
    #[instrument(skip(self))]
    pub fn start_game(&mut self, path: Option<LearningPath>) -> Vec<Effect> {
        self.record_unfinished();
        let remembered = *self.profile.preferences().last_selected_path();
        let path = path.unwrap_or(remembered);
        if path != remembered {
            self.profile
                .update_preference(PreferenceUpdate::LastSelectedPath(path));
        }

        self.progression = DifficultyProgression::with_rules(path, self.rules);
        info!(%path, "Starting game");

        let mut effects = vec![Effect::CancelAll];
        self.begin_round(&mut effects);
        effects
    }

    /// Starts another game from the win screen, keeping the reached tier.
    #[instrument(skip(self))]
    pub fn play_again(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Won {
            debug!(phase = %self.phase, "Play again ignored");
            return Vec::new();
        }
        self.progression.reset();
        info!(tier = self.progression.current_index(), "Playing again");

        let mut effects = vec![Effect::CancelAll];
        self.begin_round(&mut effects);
        effects
    }

    /// Leaves the game or win screen for the menu.
    ///
    /// An unfinished game with at least one completed word is saved as a
    /// loss. The tier ladder goes back to its entry tier.
    #[instrument(skip(self))]
    pub fn back_to_menu(&mut self) -> Vec<Effect> {
        let recorded = self.record_unfinished();

        self.phase = Phase::Menu;
        self.progression.reset_to_start();
        self.engine.set_target("");
        self.word_serial += 1;
        self.notice = None;

        vec![
            Effect::CancelAll,
            Effect::Emit(GameEvent::ReturnedToMenu { recorded }),
        ]
    }

    /// Replaces the current word without scoring it.
    #[instrument(skip(self))]
    pub fn skip_word(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Playing {
            return Vec::new();
        }
        let mut effects = vec![Effect::Cancel(TimerSlot::ShakeClear), Effect::Cancel(TimerSlot::NextWord)];
        self.assign_word(&mut effects);
        effects
    }

    /// Feeds one key to the typing engine.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn on_key(&mut self, key: &KeyInput) -> Vec<Effect> {
        if self.phase != Phase::Playing {
            return Vec::new();
        }

        let mut effects = Vec::new();
        match self.engine.handle_key(key) {
            KeyOutcome::Ignored => {}
            KeyOutcome::Correct { cursor } => {
                effects.push(Effect::Emit(GameEvent::KeyCorrect { cursor }));
                self.push_sound(&mut effects, SoundCue::KeyClick);
            }
            KeyOutcome::Mismatch { ticket } => {
                effects.push(Effect::Emit(GameEvent::KeyError));
                self.push_sound(&mut effects, SoundCue::Error);
                effects.push(Effect::Schedule {
                    delay: self.timings.shake(),
                    timer: Timer::ShakeClear(ticket),
                });
            }
            KeyOutcome::Completed { had_error } => {
                effects.push(Effect::Emit(GameEvent::KeyCorrect {
                    cursor: self.engine.cursor(),
                }));
                self.complete_word(!had_error, &mut effects);
            }
        }
        effects
    }

    /// Handles a fired timer. Stale timers do nothing.
    #[instrument(skip(self))]
    pub fn on_timer(&mut self, timer: Timer) -> Vec<Effect> {
        let mut effects = Vec::new();
        match timer {
            Timer::ShakeClear(ticket) => {
                if self.engine.clear_shake(ticket) {
                    effects.push(Effect::Emit(GameEvent::ShakeCleared));
                }
            }
            Timer::NextWord { word_serial } => {
                if self.phase == Phase::Playing
                    && word_serial == self.word_serial
                    && self.engine.is_complete()
                {
                    self.assign_word(&mut effects);
                } else {
                    debug!(word_serial, current = self.word_serial, "Stale next-word timer");
                }
            }
            Timer::HideNotice { notice_serial } => {
                if notice_serial == self.notice_serial && self.notice.take().is_some() {
                    effects.push(Effect::Emit(GameEvent::NoticeHidden));
                }
            }
            Timer::SpeakLevel {
                notice_serial,
                label,
            } => {
                if self.phase == Phase::Playing && notice_serial == self.notice_serial {
                    self.push_speech(&mut effects, label);
                }
            }
            Timer::Cheer { game_serial } => {
                if self.phase == Phase::Won && game_serial == self.game_serial {
                    self.push_speech(&mut effects, VICTORY_CHEER.to_string());
                }
            }
        }
        effects
    }

    fn begin_round(&mut self, effects: &mut Vec<Effect>) {
        self.phase = Phase::Playing;
        self.game_serial += 1;
        self.words_per_game = self
            .words_override
            .unwrap_or(*self.profile.preferences().words_per_game())
            .max(1);
        self.words_completed = 0;
        self.perfect_words = 0;
        self.streak = 0;
        self.max_streak = 0;
        self.notice = None;
        self.assign_word(effects);
    }

    fn assign_word(&mut self, effects: &mut Vec<Effect>) {
        let word = match self
            .catalog
            .random_word_from_levels(self.progression.current_levels(), &mut self.rng)
        {
            Ok(word) => word.to_string(),
            Err(e) => {
                warn!(error = %e, "Tier has no words; using fallback level");
                self.catalog
                    .random_word(FALLBACK_LEVEL, &mut self.rng)
                    .unwrap_or(LAST_RESORT_WORD)
                    .to_string()
            }
        };

        self.word_serial += 1;
        self.engine.set_target(&word);
        debug!(word = %word, serial = self.word_serial, "Word assigned");

        effects.push(Effect::Emit(GameEvent::WordAssigned {
            word: word.clone(),
            tier_label: self.progression.current_label().to_string(),
            word_number: self.words_completed + 1,
            words_per_game: self.words_per_game,
        }));
        self.push_speech(effects, word);
    }

    fn complete_word(&mut self, perfect: bool, effects: &mut Vec<Effect>) {
        self.words_completed += 1;
        if perfect {
            self.perfect_words += 1;
            self.streak += 1;
            self.max_streak = self.max_streak.max(self.streak);
        } else {
            self.streak = 0;
        }
        effects.push(Effect::Emit(GameEvent::WordComplete {
            perfect,
            streak: self.streak,
        }));
        self.push_sound(effects, SoundCue::Success);

        let change = self.progression.record_word(perfect);

        if self.words_completed >= self.words_per_game {
            if change != TierChange::Stay {
                effects.push(Effect::Emit(GameEvent::TierChanged {
                    change,
                    label: self.progression.current_label().to_string(),
                }));
            }
            self.win_game(effects);
            return;
        }

        if change != TierChange::Stay {
            let label = self.progression.current_label().to_string();
            self.notice_serial += 1;
            self.notice = Some((change, label.clone()));
            effects.push(Effect::Emit(GameEvent::TierChanged {
                change,
                label: label.clone(),
            }));
            effects.push(Effect::Schedule {
                delay: self.timings.level_notice(),
                timer: Timer::HideNotice {
                    notice_serial: self.notice_serial,
                },
            });
            if self.sound_enabled() {
                effects.push(Effect::Schedule {
                    delay: self.timings.level_speech(),
                    timer: Timer::SpeakLevel {
                        notice_serial: self.notice_serial,
                        label,
                    },
                });
            }
        }

        effects.push(Effect::Schedule {
            delay: self.timings.next_word(),
            timer: Timer::NextWord {
                word_serial: self.word_serial,
            },
        });
    }

    fn win_game(&mut self, effects: &mut Vec<Effect>) {
        self.phase = Phase::Won;
        self.notice = None;
        let summary = self.summary(true);
        let achievements = self.profile.record_game(&summary);
        info!(
            words = self.words_completed,
            perfect = self.perfect_words,
            accuracy = summary.accuracy(),
            "Game won"
        );

        effects.push(Effect::CancelAll);
        self.push_sound(effects, SoundCue::Victory);
        if self.sound_enabled() {
            effects.push(Effect::Schedule {
                delay: self.timings.victory_cheer(),
                timer: Timer::Cheer {
                    game_serial: self.game_serial,
                },
            });
        }
        effects.push(Effect::Emit(GameEvent::GameWon {
            summary,
            message: win_message(self.words_completed).to_string(),
            achievements,
        }));
    }

    /// Saves a game in progress with at least one completed word as a loss.
    fn record_unfinished(&mut self) -> Option<GameSummary> {
        if self.phase != Phase::Playing || self.words_completed == 0 {
            return None;
        }
        let summary = self.summary(false);
        self.profile.record_game(&summary);
        info!(words = self.words_completed, "Unfinished game recorded");
        Some(summary)
    }

    fn summary(&self, did_win: bool) -> GameSummary {
        GameSummary::new(
            self.words_completed,
            self.perfect_words,
            self.max_streak,
            did_win,
        )
    }

    fn sound_enabled(&self) -> bool {
        *self.profile.preferences().sound_enabled()
    }

    fn push_sound(&self, effects: &mut Vec<Effect>, cue: SoundCue) {
        if self.sound_enabled() {
            effects.push(Effect::Emit(GameEvent::Sound(cue)));
        }
    }

    fn push_speech(&self, effects: &mut Vec<Effect>, text: String) {
        if self.sound_enabled() {
            effects.push(Effect::Emit(GameEvent::Speak(text)));
        }
    }

    /// Current screen.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Typing state for the current word.
    pub fn engine(&self) -> &TypingEngine {
        &self.engine
    }

    /// Tier ladder and rolling window.
    pub fn progression(&self) -> &DifficultyProgression {
        &self.progression
    }

    /// Player records.
    pub fn profile(&self) -> &ProfileStore {
        &self.profile
    }

    /// Visible tier change notice, if any.
    pub fn notice(&self) -> Option<&(TierChange, String)> {
        self.notice.as_ref()
    }

    /// Words finished in this game.
    pub fn words_completed(&self) -> u32 {
        self.words_completed
    }

    /// Words finished without mistakes in this game.
    pub fn perfect_words(&self) -> u32 {
        self.perfect_words
    }

    /// Current perfect-word run.
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Best perfect-word run in this game.
    pub fn max_streak(&self) -> u32 {
        self.max_streak
    }

    /// Words needed to win this game.
    pub fn words_per_game(&self) -> u32 {
        self.words_per_game
    }

    /// Streak banner text, once the run is long enough to show.
    pub fn streak_banner(&self) -> Option<String> {
        streak_banner(self.streak)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn session() -> GameSession {
        let profile = ProfileStore::load(MemoryStore::new());
        GameSession::with_rng(profile, &TutorConfig::default(), StdRng::seed_from_u64(7))
    }

    fn type_word(session: &mut GameSession) -> Vec<Effect> {
        let word = session.engine().target().to_string();
        let mut effects = Vec::new();
        for c in word.chars() {
            effects.extend(session.on_key(&c.into()));
        }
        effects
    }

    #[test]
    fn test_start_assigns_word_from_entry_tier() {
        let mut s = session();
        let effects = s.start_game(Some(LearningPath::Beginner));
        assert_eq!(s.phase(), Phase::Playing);
        assert_eq!(s.engine().len(), 1);
        assert!(matches!(
            effects.as_slice(),
            [Effect::CancelAll, Effect::Emit(GameEvent::WordAssigned { word_number: 1, .. }), ..]
        ));
    }

    #[test]
    fn test_keys_ignored_on_menu() {
        let mut s = session();
        assert!(s.on_key(&'a'.into()).is_empty());
    }

    #[test]
    fn test_completed_word_schedules_next() {
        let mut s = session();
        s.start_game(None);
        let effects = type_word(&mut s);
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::Schedule { timer: Timer::NextWord { .. }, .. }
        )));
        assert_eq!(s.words_completed(), 1);
        assert_eq!(s.streak(), 1);
    }

    #[test]
    fn test_choosing_path_is_remembered() {
        let mut s = session();
        s.start_game(Some(LearningPath::Fun));
        assert_eq!(
            *s.profile().preferences().last_selected_path(),
            LearningPath::Fun
        );
    }
}
