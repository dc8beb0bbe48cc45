//! Typing tutor core - pure game logic for a children's typing game.
//!
//! # Architecture
//!
//! - **Catalog**: named word levels and weighted random word selection
//! - **Paths**: learning paths, each an ordered ladder of difficulty tiers
//! - **Typing**: per-word keystroke matching with cursor and shake state
//! - **Progression**: rolling-window promotion and demotion between tiers
//! - **Records**: aggregate statistics and player preferences
//!
//! Nothing in this crate performs I/O or keeps time; callers own the clock
//! and the storage.
//!
//! # Example
//!
//! ```
//! use typing_tutor_core::{DifficultyProgression, LearningPath, TierChange, TypingEngine, KeyOutcome};
//!
//! let mut progression = DifficultyProgression::new(LearningPath::Kindergarten);
//! let mut engine = TypingEngine::new("cat");
//! for c in "cat".chars() {
//!     if let KeyOutcome::Completed { had_error } = engine.handle_key(&c.into()) {
//!         assert_eq!(progression.record_word(!had_error), TierChange::Stay);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod catalog;
mod encouragement;
mod invariants;
mod path;
mod progression;
mod records;
mod typing;

// Crate-level exports - Word catalog
pub use catalog::{CatalogError, FALLBACK_LEVEL, WordCatalog, WordLevel};

// Crate-level exports - Learning paths
pub use path::{DifficultyTier, LearningPath};

// Crate-level exports - Typing engine
pub use typing::{KeyInput, KeyOutcome, SHAKE_DURATION, ShakeTicket, TypingEngine, TypingObserver};

// Crate-level exports - Difficulty progression
pub use progression::{DifficultyProgression, PerformanceWindow, ProgressionRules, TierChange};

// Crate-level exports - Invariants
pub use invariants::{
    CursorWithinWord, Invariant, InvariantSet, InvariantViolation, ProgressionInvariants,
    TierWithinLadder, WindowWithinCapacity,
};

// Crate-level exports - Durable records
pub use records::{
    Achievement, GameStats, GameSummary, PREFERENCES_KEY, PreferenceUpdate, Preferences,
    STATS_KEY,
};

// Crate-level exports - Messages
pub use encouragement::{stats_message, streak_banner, win_message};
