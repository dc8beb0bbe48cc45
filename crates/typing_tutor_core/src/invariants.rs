//! First-class invariants for the typing and progression engines.
//!
//! Invariants are logical properties that must hold after every operation.
//! The engines check them in debug builds; tests can check them directly.

use crate::progression::DifficultyProgression;
use crate::typing::TypingEngine;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: the cursor never passes the end of the target word.
pub struct CursorWithinWord;

impl Invariant<TypingEngine> for CursorWithinWord {
    fn holds(engine: &TypingEngine) -> bool {
        engine.cursor() <= engine.len()
    }

    fn description() -> &'static str {
        "Cursor never exceeds the target word length"
    }
}

/// Invariant: the tier index points into the active ladder.
pub struct TierWithinLadder;

impl Invariant<DifficultyProgression> for TierWithinLadder {
    fn holds(progression: &DifficultyProgression) -> bool {
        progression.current < progression.tiers.len()
    }

    fn description() -> &'static str {
        "Tier index stays within the path's tier list"
    }
}

/// Invariant: the rolling window never grows past its capacity.
pub struct WindowWithinCapacity;

impl Invariant<DifficultyProgression> for WindowWithinCapacity {
    fn holds(progression: &DifficultyProgression) -> bool {
        progression.window.len() <= progression.window.capacity()
    }

    fn description() -> &'static str {
        "Performance window holds at most its capacity"
    }
}

/// All progression invariants as a composable set.
pub type ProgressionInvariants = (TierWithinLadder, WindowWithinCapacity);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LearningPath;

    #[test]
    fn test_fresh_progression_holds() {
        let p = DifficultyProgression::new(LearningPath::Kindergarten);
        assert!(ProgressionInvariants::check_all(&p).is_ok());
    }

    #[test]
    fn test_detects_corrupted_tier_index() {
        let mut p = DifficultyProgression::new(LearningPath::Kindergarten);
        p.current = 7;
        let violations = ProgressionInvariants::check_all(&p).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].description, TierWithinLadder::description());
    }

    #[test]
    fn test_cursor_invariant_after_overtyping() {
        let mut engine = TypingEngine::new("go");
        for c in "gogogo".chars() {
            engine.handle_key(&c.into());
            assert!(CursorWithinWord::holds(&engine));
        }
    }
}
