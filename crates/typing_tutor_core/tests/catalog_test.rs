//! Tests for word selection from the catalog.

use rand::SeedableRng;
use rand::rngs::StdRng;
use typing_tutor_core::{LearningPath, WordCatalog, WordLevel};

#[test]
fn test_selection_weighted_by_occurrence() {
    let catalog = WordCatalog::new(vec![
        WordLevel::new("a", ["x"]),
        WordLevel::new("b", ["y", "y", "y"]),
    ]);
    let mut rng = StdRng::seed_from_u64(2024);

    let trials = 20_000;
    let ys = (0..trials)
        .filter(|_| catalog.random_word_from_levels(&["a", "b"], &mut rng) == Ok("y"))
        .count();

    let ratio = ys as f64 / trials as f64;
    assert!((ratio - 0.75).abs() < 0.02, "ratio was {ratio}");
}

#[test]
fn test_selection_stays_within_tier_vocabulary() {
    let catalog = WordCatalog::builtin();
    let mut rng = StdRng::seed_from_u64(9);
    for path in [LearningPath::Beginner, LearningPath::Fun, LearningPath::FirstGrade] {
        for tier in path.tiers() {
            let pool = catalog.combined_words(tier.levels());
            for _ in 0..50 {
                let word = catalog
                    .random_word_from_levels(tier.levels(), &mut rng)
                    .expect("tier has words");
                assert!(pool.contains(&word));
            }
        }
    }
}

#[test]
fn test_level_names_in_catalog_order() {
    let catalog = WordCatalog::builtin();
    let names = catalog.level_names();
    assert_eq!(names.first(), Some(&"letters"));
    assert_eq!(names.len(), 8);
}
