//! Tests for adaptive difficulty progression.

use typing_tutor_core::{DifficultyProgression, LearningPath, TierChange};

fn feed(progression: &mut DifficultyProgression, outcomes: &[bool]) -> TierChange {
    let mut last = TierChange::Stay;
    for &p in outcomes {
        last = progression.record_word(p);
    }
    last
}

#[test]
fn test_window_holds_min_n_five_most_recent() {
    let mut p = DifficultyProgression::new(LearningPath::SecondGrade);
    let outcomes = [true, false, true, false, false, true, false];
    for (n, &o) in outcomes.iter().enumerate() {
        p.record_word(o);
        assert_eq!(p.performance_history().len(), (n + 1).min(5));
    }
    let held: Vec<bool> = p.performance_history().outcomes().collect();
    assert_eq!(held, outcomes[2..].to_vec());
}

#[test]
fn test_four_perfect_words_level_up_unless_at_top() {
    let mut p = DifficultyProgression::new(LearningPath::Beginner);
    assert_eq!(feed(&mut p, &[true; 4]), TierChange::LevelUp);

    p.set_difficulty(2);
    assert_eq!(feed(&mut p, &[true; 4]), TierChange::Stay);
    assert_eq!(p.current_index(), 2);
}

#[test]
fn test_four_missed_words_level_down_unless_at_bottom() {
    let mut p = DifficultyProgression::new(LearningPath::Beginner);
    assert_eq!(feed(&mut p, &[false; 4]), TierChange::Stay);
    assert_eq!(p.current_index(), 0);

    p.set_difficulty(1);
    assert_eq!(feed(&mut p, &[false; 4]), TierChange::LevelDown);
    assert_eq!(p.current_index(), 0);
}

#[test]
fn test_half_perfect_always_stays() {
    for tier in 0..3 {
        let mut p = DifficultyProgression::new(LearningPath::Fun);
        p.set_difficulty(tier);
        assert_eq!(feed(&mut p, &[true, true, false, false]), TierChange::Stay);
        assert_eq!(p.current_index(), tier);
    }
}

#[test]
fn test_accuracy_reports_100_after_tier_change() {
    let mut p = DifficultyProgression::new(LearningPath::Kindergarten);
    feed(&mut p, &[true; 4]);
    assert!(p.performance_history().is_empty());
    assert_eq!(p.accuracy(), 100);
}

#[test]
fn test_accuracy_query_does_not_mutate() {
    let mut p = DifficultyProgression::new(LearningPath::Kindergarten);
    feed(&mut p, &[true, false, true]);
    let before: Vec<bool> = p.performance_history().outcomes().collect();
    assert_eq!(p.accuracy(), 67);
    assert_eq!(p.accuracy(), 67);
    let after: Vec<bool> = p.performance_history().outcomes().collect();
    assert_eq!(before, after);
}

#[test]
fn test_kindergarten_scenario() {
    let mut p = DifficultyProgression::new(LearningPath::Kindergarten);
    assert_eq!(p.current_levels(), &["twoLetter", "cvc"]);
    let entry_label = p.current_label().to_string();

    let changes: Vec<TierChange> = (0..4).map(|_| p.record_word(true)).collect();
    assert_eq!(
        changes,
        vec![TierChange::Stay, TierChange::Stay, TierChange::Stay, TierChange::LevelUp]
    );
    assert_eq!(p.current_index(), 1);
    assert!(p.performance_history().is_empty());
    assert_eq!(p.current_label(), "🎒 Kindergarten");
    assert_ne!(p.current_label(), entry_label);
}

#[test]
fn test_reset_to_start_from_tier_two() {
    let mut p = DifficultyProgression::new(LearningPath::Beginner);
    feed(&mut p, &[true; 4]);
    feed(&mut p, &[true; 4]);
    assert_eq!(p.current_index(), 2);
    p.record_word(false);

    p.reset_to_start();
    assert_eq!(p.current_index(), 0);
    assert!(p.performance_history().is_empty());
}

#[test]
fn test_reset_keeps_tier() {
    let mut p = DifficultyProgression::new(LearningPath::Beginner);
    feed(&mut p, &[true; 4]);
    p.record_word(true);
    p.reset();
    assert_eq!(p.current_index(), 1);
    assert!(p.performance_history().is_empty());
}

#[test]
fn test_tier_change_needs_fresh_samples() {
    let mut p = DifficultyProgression::new(LearningPath::Beginner);
    feed(&mut p, &[true; 4]);
    // Three more perfect words are not enough for a second promotion.
    assert_eq!(feed(&mut p, &[true; 3]), TierChange::Stay);
    assert_eq!(p.current_index(), 1);
    assert_eq!(p.record_word(true), TierChange::LevelUp);
}

#[test]
fn test_single_tier_path_never_moves() {
    let mut p = DifficultyProgression::new(LearningPath::SecondGrade);
    assert!(!p.can_level_up());
    assert!(!p.can_level_down());
    assert_eq!(feed(&mut p, &[true; 5]), TierChange::Stay);
    assert_eq!(feed(&mut p, &[false; 5]), TierChange::Stay);
}
