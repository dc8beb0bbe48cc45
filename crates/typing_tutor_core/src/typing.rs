//! Per-word typing engine.
//!
//! The engine is a synchronous reducer over discrete key events. It owns the
//! target word and a cursor into it, and reports each keystroke as a
//! [`KeyOutcome`]. The only time-based behaviour, the cosmetic "shake" after a
//! mistake, is driven from outside: a mismatch hands back a [`ShakeTicket`]
//! and whoever owns the clock calls [`TypingEngine::clear_shake`] with it once
//! the delay has elapsed.

use crate::invariants::{CursorWithinWord, Invariant};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, trace};

/// How long the word keeps shaking after a mistake.
pub const SHAKE_DURATION: Duration = Duration::from_millis(300);

/// A key event as delivered by the input layer.
///
/// Key names follow the browser convention: printable keys are named by the
/// character they produce, everything else by a multi-character name such
/// as `Shift` or `ArrowLeft`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyInput {
    /// A single printable character.
    Char(char),
    /// A control or modifier key.
    Named(String),
}

impl KeyInput {
    /// Classifies a key name.
    pub fn from_key_name(name: &str) -> Self {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Self::Char(c),
            _ => Self::Named(name.to_string()),
        }
    }

    /// Returns the character if this key types one.
    pub fn printable(&self) -> Option<char> {
        match self {
            Self::Char(c) if !c.is_control() => Some(*c),
            _ => None,
        }
    }
}

impl From<char> for KeyInput {
    fn from(c: char) -> Self {
        if c.is_control() {
            Self::Named(format!("U+{:04X}", c as u32))
        } else {
            Self::Char(c)
        }
    }
}

/// Identifies one arming of the shake-clear timer.
///
/// Only the most recent ticket clears the shake; older ones, and any ticket
/// issued before a word change, are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShakeTicket(u64);

/// Result of feeding one key to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not a printable key, or the word is already complete.
    Ignored,
    /// Right key; the cursor advanced to `cursor`.
    Correct {
        /// Cursor after advancing.
        cursor: usize,
    },
    /// Right key, and it was the last one.
    Completed {
        /// Whether any mistake was made on this word.
        had_error: bool,
    },
    /// Wrong key; the word is shaking until `ticket` is cleared.
    Mismatch {
        /// Ticket to pass to [`TypingEngine::clear_shake`] after [`SHAKE_DURATION`].
        ticket: ShakeTicket,
    },
}

/// Side-effect hooks invoked synchronously while a key is processed.
pub trait TypingObserver {
    /// Called for every correct keystroke, including the final one.
    fn on_correct_key(&mut self) {}
    /// Called for every mismatched keystroke.
    fn on_error_key(&mut self) {}
    /// Called once when the last character is typed.
    fn on_word_complete(&mut self) {}
}

/// Observer that does nothing.
impl TypingObserver for () {}

/// Matches keystrokes against a target word.
#[derive(Debug, Clone, Default)]
pub struct TypingEngine {
    target: String,
    chars: Vec<char>,
    cursor: usize,
    shaking: bool,
    shake_generation: u64,
    correct_keys: u32,
    mistakes: u32,
}

impl TypingEngine {
    /// Creates an engine for the given word.
    #[instrument(skip(target), fields(target = %target.as_ref()))]
    pub fn new(target: impl AsRef<str>) -> Self {
        let mut engine = Self::default();
        engine.set_target(target);
        engine
    }

    /// Replaces the target word.
    ///
    /// The cursor returns to the start, the shake stops at once and any
    /// outstanding [`ShakeTicket`] is invalidated. Passing an empty string
    /// parks the engine between games.
    #[instrument(skip(self, target), fields(target = %target.as_ref()))]
    pub fn set_target(&mut self, target: impl AsRef<str>) {
        let target = target.as_ref();
        self.target = target.to_string();
        self.chars = target.chars().collect();
        self.cursor = 0;
        self.shaking = false;
        self.shake_generation += 1;
        self.correct_keys = 0;
        self.mistakes = 0;
        debug!(len = self.chars.len(), "Target word set");
    }

    /// Processes one key event.
    pub fn handle_key(&mut self, key: &KeyInput) -> KeyOutcome {
        self.handle_key_with(key, &mut ())
    }

    /// Processes one key event, notifying `observer` of the result.
    #[instrument(skip(self, observer), fields(cursor = self.cursor, target = %self.target))]
    pub fn handle_key_with<O>(&mut self, key: &KeyInput, observer: &mut O) -> KeyOutcome
    where
        O: TypingObserver + ?Sized,
    {
        let Some(typed) = key.printable() else {
            trace!(?key, "Non-printable key ignored");
            return KeyOutcome::Ignored;
        };

        let Some(&expected) = self.chars.get(self.cursor) else {
            trace!("Word already complete, key ignored");
            return KeyOutcome::Ignored;
        };

        if same_letter(typed, expected) {
            observer.on_correct_key();
            self.correct_keys += 1;
            self.cursor += 1;
            debug_assert!(CursorWithinWord::holds(self), "{}", CursorWithinWord::description());

            if self.is_complete() {
                observer.on_word_complete();
                debug!(mistakes = self.mistakes, "Word complete");
                return KeyOutcome::Completed {
                    had_error: self.had_error(),
                };
            }
            KeyOutcome::Correct {
                cursor: self.cursor,
            }
        } else {
            observer.on_error_key();
            self.mistakes += 1;
            self.shaking = true;
            self.shake_generation += 1;
            debug!(%typed, %expected, "Mismatched key");
            KeyOutcome::Mismatch {
                ticket: ShakeTicket(self.shake_generation),
            }
        }
    }

    /// Stops the shake if `ticket` is the latest arming.
    ///
    /// Returns `true` if the shake was cleared by this call.
    #[instrument(skip(self))]
    pub fn clear_shake(&mut self, ticket: ShakeTicket) -> bool {
        if self.shaking && ticket.0 == self.shake_generation {
            self.shaking = false;
            true
        } else {
            false
        }
    }

    /// The current target word.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Number of characters typed correctly so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length of the target in characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Returns `true` if there is no target word.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Whether the word is currently shaking after a mistake.
    pub fn is_shaking(&self) -> bool {
        self.shaking
    }

    /// Whether every character has been typed.
    pub fn is_complete(&self) -> bool {
        !self.chars.is_empty() && self.cursor >= self.chars.len()
    }

    /// Whether any wrong key was pressed on this word.
    pub fn had_error(&self) -> bool {
        self.mistakes > 0
    }

    /// Number of wrong keys pressed on this word.
    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    /// Number of right keys pressed on this word.
    pub fn correct_keys(&self) -> u32 {
        self.correct_keys
    }

    /// The next character to type, for keyboard hints.
    pub fn next_char(&self) -> Option<char> {
        self.chars.get(self.cursor).copied()
    }

    /// The part of the word already typed.
    pub fn typed(&self) -> String {
        self.chars[..self.cursor].iter().collect()
    }

    /// The part of the word still to type.
    pub fn remaining(&self) -> String {
        self.chars[self.cursor..].iter().collect()
    }
}

fn same_letter(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        correct: u32,
        errors: u32,
        complete: u32,
    }

    impl TypingObserver for Recorder {
        fn on_correct_key(&mut self) {
            self.correct += 1;
        }
        fn on_error_key(&mut self) {
            self.errors += 1;
        }
        fn on_word_complete(&mut self) {
            self.complete += 1;
        }
    }

    #[test]
    fn test_key_classification() {
        assert_eq!(KeyInput::from_key_name("a"), KeyInput::Char('a'));
        assert_eq!(KeyInput::from_key_name("Shift"), KeyInput::Named("Shift".into()));
        assert_eq!(KeyInput::from_key_name("\n").printable(), None);
        assert_eq!(KeyInput::from_key_name("é"), KeyInput::Char('é'));
    }

    #[test]
    fn test_case_insensitive_match() {
        let mut engine = TypingEngine::new("Cat");
        assert_eq!(engine.handle_key(&'c'.into()), KeyOutcome::Correct { cursor: 1 });
        assert_eq!(engine.handle_key(&'A'.into()), KeyOutcome::Correct { cursor: 2 });
    }

    #[test]
    fn test_observer_sees_each_event() {
        let mut engine = TypingEngine::new("hi");
        let mut rec = Recorder::default();
        engine.handle_key_with(&'h'.into(), &mut rec);
        engine.handle_key_with(&'x'.into(), &mut rec);
        engine.handle_key_with(&'i'.into(), &mut rec);
        engine.handle_key_with(&'i'.into(), &mut rec);
        assert_eq!((rec.correct, rec.errors, rec.complete), (2, 1, 1));
    }

    #[test]
    fn test_only_latest_ticket_clears_shake() {
        let mut engine = TypingEngine::new("dog");
        let KeyOutcome::Mismatch { ticket: first } = engine.handle_key(&'x'.into()) else {
            panic!("expected mismatch");
        };
        let KeyOutcome::Mismatch { ticket: second } = engine.handle_key(&'y'.into()) else {
            panic!("expected mismatch");
        };
        assert!(!engine.clear_shake(first));
        assert!(engine.is_shaking());
        assert!(engine.clear_shake(second));
        assert!(!engine.is_shaking());
    }

    #[test]
    fn test_word_change_discards_pending_shake() {
        let mut engine = TypingEngine::new("dog");
        let KeyOutcome::Mismatch { ticket } = engine.handle_key(&'x'.into()) else {
            panic!("expected mismatch");
        };
        engine.set_target("cat");
        assert!(!engine.is_shaking());
        assert_eq!(engine.cursor(), 0);
        assert!(!engine.clear_shake(ticket));
        assert!(!engine.had_error());
    }

    #[test]
    fn test_split_for_display() {
        let mut engine = TypingEngine::new("sun");
        engine.handle_key(&'s'.into());
        assert_eq!(engine.typed(), "s");
        assert_eq!(engine.remaining(), "un");
        assert_eq!(engine.next_char(), Some('u'));
    }

    #[test]
    fn test_empty_target_ignores_everything() {
        let mut engine = TypingEngine::new("");
        assert_eq!(engine.handle_key(&'a'.into()), KeyOutcome::Ignored);
        assert!(!engine.is_complete());
    }
}
