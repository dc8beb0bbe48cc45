//! Adaptive difficulty progression.
//!
//! The engine watches a short rolling window of per-word outcomes and moves
//! the player one tier up or down a learning path's ladder when the window
//! shows sustained success or sustained struggle.

use crate::invariants::{InvariantSet, ProgressionInvariants};
use crate::path::{DifficultyTier, LearningPath};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use strum::Display;
use tracing::{debug, info, instrument};

/// Thresholds governing tier changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct ProgressionRules {
    /// Most recent outcomes kept in the window.
    window_capacity: usize,
    /// Outcomes needed before any tier change is considered.
    min_samples: usize,
    /// Accuracy (percent) at or above which the player moves up.
    promote_at: f64,
    /// Accuracy (percent) below which the player moves down.
    demote_below: f64,
}

impl ProgressionRules {
    /// Creates rules with explicit thresholds.
    ///
    /// `min_samples` is capped at `window_capacity`, otherwise no tier change
    /// could ever happen.
    pub fn new(window_capacity: usize, min_samples: usize, promote_at: f64, demote_below: f64) -> Self {
        let window_capacity = window_capacity.max(1);
        Self {
            window_capacity,
            min_samples: min_samples.clamp(1, window_capacity),
            promote_at,
            demote_below,
        }
    }
}

impl Default for ProgressionRules {
    fn default() -> Self {
        Self {
            window_capacity: 5,
            min_samples: 4,
            promote_at: 80.0,
            demote_below: 40.0,
        }
    }
}

/// Outcome of recording a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TierChange {
    /// Moved one tier harder.
    LevelUp,
    /// Moved one tier easier.
    LevelDown,
    /// Tier unchanged.
    Stay,
}

/// Fixed-capacity FIFO of "was this word perfect" flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceWindow {
    outcomes: VecDeque<bool>,
    capacity: usize,
}

impl PerformanceWindow {
    /// Creates an empty window.
    pub fn new(capacity: usize) -> Self {
        Self {
            outcomes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an outcome, dropping the oldest if the window is full.
    pub fn push(&mut self, was_perfect: bool) {
        self.outcomes.push_back(was_perfect);
        while self.outcomes.len() > self.capacity {
            self.outcomes.pop_front();
        }
    }

    /// Removes every outcome.
    pub fn clear(&mut self) {
        self.outcomes.clear();
    }

    /// Number of outcomes held.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns `true` if no outcomes are held.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Maximum number of outcomes held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of perfect outcomes held.
    pub fn perfect_count(&self) -> usize {
        self.outcomes.iter().filter(|&&p| p).count()
    }

    /// Unrounded percentage of perfect outcomes; `0.0` when empty.
    pub fn ratio_percent(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.perfect_count() as f64 / self.outcomes.len() as f64 * 100.0
        }
    }

    /// Outcomes oldest first.
    pub fn outcomes(&self) -> impl Iterator<Item = bool> + '_ {
        self.outcomes.iter().copied()
    }
}

/// Tracks the player's tier on one learning path.
#[derive(Debug, Clone)]
pub struct DifficultyProgression {
    pub(crate) path: LearningPath,
    pub(crate) tiers: Vec<DifficultyTier>,
    pub(crate) current: usize,
    pub(crate) window: PerformanceWindow,
    rules: ProgressionRules,
}

impl DifficultyProgression {
    /// Starts at the entry tier of `path` with default rules.
    #[instrument]
    pub fn new(path: LearningPath) -> Self {
        Self::with_rules(path, ProgressionRules::default())
    }

    /// Starts at the entry tier of `path`.
    #[instrument]
    pub fn with_rules(path: LearningPath, rules: ProgressionRules) -> Self {
        Self::with_tiers(path, path.tiers(), rules)
    }

    /// Starts at the entry tier of a custom ladder.
    ///
    /// An empty ladder is replaced by [`LearningPath::default_ladder`].
    #[instrument(skip(tiers), fields(tier_count = tiers.len()))]
    pub fn with_tiers(path: LearningPath, tiers: Vec<DifficultyTier>, rules: ProgressionRules) -> Self {
        let tiers = if tiers.is_empty() {
            LearningPath::default_ladder()
        } else {
            tiers
        };
        info!(%path, tiers = tiers.len(), "Progression started");
        Self {
            path,
            tiers,
            current: 0,
            window: PerformanceWindow::new(rules.window_capacity),
            rules,
        }
    }

    /// Records whether the last word was typed without mistakes and applies
    /// any resulting tier change.
    ///
    /// A change clears the window, so the next change needs a fresh run of
    /// samples.
    #[instrument(skip(self), fields(path = %self.path, tier = self.current))]
    pub fn record_word(&mut self, was_perfect: bool) -> TierChange {
        self.window.push(was_perfect);

        let change = if self.window.len() < self.rules.min_samples {
            TierChange::Stay
        } else {
            let accuracy = self.window.ratio_percent();
            if accuracy >= self.rules.promote_at && self.can_level_up() {
                self.current += 1;
                self.window.clear();
                TierChange::LevelUp
            } else if accuracy < self.rules.demote_below && self.can_level_down() {
                self.current -= 1;
                self.window.clear();
                TierChange::LevelDown
            } else {
                TierChange::Stay
            }
        };

        if change == TierChange::Stay {
            debug!(window = self.window.len(), "Tier unchanged");
        } else {
            info!(%change, tier = self.current, label = %self.current_label(), "Tier changed");
        }
        self.check_invariants();
        change
    }

    /// Jumps to a tier, clamped into the ladder. Clears the window.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, index: usize) {
        self.current = index.min(self.tiers.len() - 1);
        self.window.clear();
        debug!(tier = self.current, "Difficulty set");
    }

    /// Clears the window but keeps the tier ("play again").
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.window.clear();
    }

    /// Clears the window and returns to the entry tier.
    #[instrument(skip(self))]
    pub fn reset_to_start(&mut self) {
        self.current = 0;
        self.window.clear();
    }

    /// Switches to another learning path, starting at its entry tier.
    #[instrument(skip(self), fields(from = %self.path))]
    pub fn switch_path(&mut self, path: LearningPath) {
        self.path = path;
        self.tiers = path.tiers();
        self.reset_to_start();
        info!(%path, "Learning path switched");
    }

    /// Percentage of perfect words in the window, rounded; 100 when empty.
    ///
    /// This is the display value. Tier changes use the unrounded ratio and
    /// never act on an empty window.
    pub fn accuracy(&self) -> u32 {
        if self.window.is_empty() {
            100
        } else {
            self.window.ratio_percent().round() as u32
        }
    }

    /// The active learning path.
    pub fn path(&self) -> LearningPath {
        self.path
    }

    /// The full ladder, easiest first.
    pub fn tiers(&self) -> &[DifficultyTier] {
        &self.tiers
    }

    /// Zero-based index of the active tier.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The active tier.
    pub fn current_tier(&self) -> &DifficultyTier {
        &self.tiers[self.current]
    }

    /// Word levels making up the active vocabulary.
    pub fn current_levels(&self) -> &[String] {
        self.current_tier().levels()
    }

    /// Label of the active tier.
    pub fn current_label(&self) -> &str {
        self.current_tier().label()
    }

    /// Whether a harder tier exists.
    pub fn can_level_up(&self) -> bool {
        self.current + 1 < self.tiers.len()
    }

    /// Whether an easier tier exists.
    pub fn can_level_down(&self) -> bool {
        self.current > 0
    }

    /// The rolling window.
    pub fn performance_history(&self) -> &PerformanceWindow {
        &self.window
    }

    /// The thresholds in force.
    pub fn rules(&self) -> &ProgressionRules {
        &self.rules
    }

    fn check_invariants(&self) {
        debug_assert!(
            ProgressionInvariants::check_all(self).is_ok(),
            "Progression invariants violated"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(progression: &mut DifficultyProgression, outcomes: &[bool]) -> Vec<TierChange> {
        outcomes.iter().map(|&p| progression.record_word(p)).collect()
    }

    #[test]
    fn test_window_keeps_most_recent() {
        let mut window = PerformanceWindow::new(5);
        for p in [false, false, true, true, true, true, true] {
            window.push(p);
        }
        assert_eq!(window.len(), 5);
        assert_eq!(window.outcomes().collect::<Vec<_>>(), vec![true; 5]);
    }

    #[test]
    fn test_three_samples_never_change_tier() {
        let mut p = DifficultyProgression::new(LearningPath::Beginner);
        let changes = feed(&mut p, &[true, true, true]);
        assert!(changes.iter().all(|c| *c == TierChange::Stay));
        assert_eq!(p.current_index(), 0);
    }

    #[test]
    fn test_mixed_window_stays_and_is_retained() {
        let mut p = DifficultyProgression::new(LearningPath::Beginner);
        p.set_difficulty(1);
        let changes = feed(&mut p, &[true, true, false, false]);
        assert_eq!(changes[3], TierChange::Stay);
        assert_eq!(p.performance_history().len(), 4);
    }

    #[test]
    fn test_threshold_boundaries() {
        // 4 of 5 perfect is exactly 80%: promote.
        let mut p = DifficultyProgression::new(LearningPath::Beginner);
        let changes = feed(&mut p, &[false, true, true, true]);
        assert_eq!(changes[3], TierChange::Stay);
        assert_eq!(p.record_word(true), TierChange::LevelUp);

        // 2 of 5 perfect is exactly 40%: not below the demotion threshold.
        let mut p = DifficultyProgression::new(LearningPath::Beginner);
        p.set_difficulty(2);
        feed(&mut p, &[true, true, false, false]);
        assert_eq!(p.record_word(false), TierChange::Stay);
        assert_eq!(p.current_index(), 2);
    }

    #[test]
    fn test_set_difficulty_clamps() {
        let mut p = DifficultyProgression::new(LearningPath::Fun);
        p.set_difficulty(99);
        assert_eq!(p.current_index(), 2);
        p.set_difficulty(0);
        assert_eq!(p.current_index(), 0);
    }

    #[test]
    fn test_switch_path_resets_state() {
        let mut p = DifficultyProgression::new(LearningPath::Beginner);
        p.set_difficulty(2);
        p.record_word(true);
        p.switch_path(LearningPath::FirstGrade);
        assert_eq!(p.current_index(), 0);
        assert!(p.performance_history().is_empty());
        assert_eq!(p.current_levels(), &["cvc", "kindergarten"]);
    }

    #[test]
    fn test_accuracy_is_rounded() {
        let mut p = DifficultyProgression::new(LearningPath::Beginner);
        feed(&mut p, &[true, true, false]);
        assert_eq!(p.accuracy(), 67);
    }

    #[test]
    fn test_custom_rules_cap_min_samples() {
        let rules = ProgressionRules::new(3, 10, 80.0, 40.0);
        assert_eq!(*rules.min_samples(), 3);
        let mut p = DifficultyProgression::with_rules(LearningPath::Fun, rules);
        assert_eq!(feed(&mut p, &[true, true, true])[2], TierChange::LevelUp);
    }
}
