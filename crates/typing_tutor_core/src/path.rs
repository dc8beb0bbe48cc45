//! Learning paths and their difficulty ladders.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::instrument;

/// One rung of a path's difficulty ladder.
///
/// The union of `levels` is the active vocabulary while the player is on
/// this tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct DifficultyTier {
    /// Stable tier identifier, e.g. `simple`.
    name: String,
    /// Label shown (and spoken) when the tier becomes active.
    label: String,
    /// Word level identifiers making up this tier's vocabulary.
    levels: Vec<String>,
}

impl DifficultyTier {
    /// Creates a tier.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        levels: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            levels: levels.into_iter().map(Into::into).collect(),
        }
    }
}

/// A named ladder of tiers chosen from the menu.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum LearningPath {
    /// Letters first, then two-letter words, then CVC words.
    Beginner,
    /// Simple words, then the full kindergarten mix.
    #[default]
    Kindergarten,
    /// Theme words: animals and colors.
    Fun,
    /// Kindergarten sight words, then first-grade sight words.
    FirstGrade,
    /// Offered by the menu without a dedicated ladder.
    SecondGrade,
}

const INTERMEDIATE_MIX: [&str; 6] = ["twoLetter", "cvc", "kindergarten", "animals", "colors", "family"];

impl LearningPath {
    /// Returns the ordered tier ladder for this path, easiest first.
    #[instrument]
    pub fn tiers(self) -> Vec<DifficultyTier> {
        match self {
            Self::Beginner => vec![
                DifficultyTier::new("letters", "🔤 Letters", ["letters"]),
                DifficultyTier::new("twoLetter", "✌️ Two Letters", ["letters", "twoLetter"]),
                DifficultyTier::new("simple", "🌟 Simple Words", ["twoLetter", "cvc"]),
            ],
            Self::Fun => vec![
                DifficultyTier::new("animals", "🐶 Animals Only", ["animals"]),
                DifficultyTier::new("colors", "🎨 Colors Only", ["colors"]),
                DifficultyTier::new("mixed", "🌈 Animals & Colors", ["animals", "colors"]),
            ],
            Self::Kindergarten => vec![
                DifficultyTier::new("simple", "🌟 Simple Words", ["twoLetter", "cvc"]),
                DifficultyTier::new("intermediate", "🎒 Kindergarten", INTERMEDIATE_MIX),
            ],
            Self::FirstGrade => vec![
                DifficultyTier::new("intermediate", "🎒 Kindergarten", ["cvc", "kindergarten"]),
                DifficultyTier::new(
                    "advanced",
                    "🚀 1st Grade",
                    ["cvc", "kindergarten", "firstGrade"],
                ),
            ],
            Self::SecondGrade => Self::default_ladder(),
        }
    }

    /// Ladder for paths without a dedicated one.
    pub fn default_ladder() -> Vec<DifficultyTier> {
        vec![DifficultyTier::new(
            "intermediate",
            "🎒 Kindergarten",
            INTERMEDIATE_MIX,
        )]
    }
}
