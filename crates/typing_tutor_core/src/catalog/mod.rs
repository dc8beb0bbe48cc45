//! Word catalog: named levels of words and random selection across them.

mod words;

use derive_getters::Getters;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Level used when a single-level lookup names an unknown level.
pub const FALLBACK_LEVEL: &str = "kindergarten";

/// A named bucket of words, e.g. `cvc` or `kindergarten`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct WordLevel {
    /// Level identifier.
    name: String,
    /// Words in catalog order (lowercase, non-empty).
    words: Vec<String>,
}

impl WordLevel {
    /// Creates a level from any list of words.
    pub fn new(name: impl Into<String>, words: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

/// Errors raised by word selection.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CatalogError {
    /// The requested levels contained no words at all.
    #[display("No words available in levels {:?}", _0)]
    EmptySelection(#[error(not(source))] Vec<String>),
}

/// Immutable mapping from level name to its words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCatalog {
    levels: Vec<WordLevel>,
}

impl WordCatalog {
    /// Creates a catalog from explicit levels.
    #[instrument(skip(levels), fields(count = levels.len()))]
    pub fn new(levels: Vec<WordLevel>) -> Self {
        Self { levels }
    }

    /// The compiled-in catalog shipped with the game.
    #[instrument]
    pub fn builtin() -> Self {
        let levels = words::BUILTIN_LEVELS
            .iter()
            .map(|(name, list)| WordLevel::new(*name, list.iter().copied()))
            .collect();
        Self { levels }
    }

    /// Returns the words for a level, or `None` for an unknown level.
    pub fn words(&self, level: &str) -> Option<&[String]> {
        self.levels
            .iter()
            .find(|l| l.name == level)
            .map(|l| l.words.as_slice())
    }

    /// All level names in catalog order.
    pub fn level_names(&self) -> Vec<&str> {
        self.levels.iter().map(|l| l.name.as_str()).collect()
    }

    /// Concatenates the words of the given levels in the order supplied.
    ///
    /// Duplicates are kept. Unknown levels contribute nothing.
    pub fn combined_words<S: AsRef<str>>(&self, levels: &[S]) -> Vec<&str> {
        levels
            .iter()
            .flat_map(|level| {
                let words = self.words(level.as_ref());
                if words.is_none() {
                    debug!(level = level.as_ref(), "Unknown level ignored");
                }
                words.unwrap_or_default().iter().map(String::as_str)
            })
            .collect()
    }

    /// Picks a random word from the union of the given levels.
    ///
    /// A word that appears in several levels (or several times in one level)
    /// is proportionally more likely to be chosen.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptySelection`] if the levels are empty or all
    /// unknown.
    #[instrument(skip(self, levels, rng), fields(level_count = levels.len()))]
    pub fn random_word_from_levels<S, R>(&self, levels: &[S], rng: &mut R) -> Result<&str, CatalogError>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let combined = self.combined_words(levels);
        if combined.is_empty() {
            warn!("Word selection requested from an empty level set");
            return Err(CatalogError::EmptySelection(
                levels.iter().map(|l| l.as_ref().to_string()).collect(),
            ));
        }

        let word = combined[rng.gen_range(0..combined.len())];
        debug!(word, pool = combined.len(), "Word selected");
        Ok(word)
    }

    /// Picks a random word from a single level.
    ///
    /// An unknown level yields the first word of [`FALLBACK_LEVEL`].
    #[instrument(skip(self, rng))]
    pub fn random_word<R: Rng + ?Sized>(&self, level: &str, rng: &mut R) -> Option<&str> {
        match self.words(level) {
            Some(list) if !list.is_empty() => Some(list[rng.gen_range(0..list.len())].as_str()),
            _ => {
                warn!(level, fallback = FALLBACK_LEVEL, "Level not found, using fallback");
                self.words(FALLBACK_LEVEL)
                    .and_then(|list| list.first())
                    .map(String::as_str)
            }
        }
    }
}

impl Default for WordCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_builtin_levels_are_lowercase_and_non_empty() {
        let catalog = WordCatalog::builtin();
        for name in catalog.level_names() {
            let words = catalog.words(name).unwrap();
            assert!(!words.is_empty(), "level {name} is empty");
            for w in words {
                assert!(!w.is_empty());
                assert_eq!(w, &w.to_lowercase());
            }
        }
    }

    #[test]
    fn test_combined_keeps_order_and_duplicates() {
        let catalog = WordCatalog::new(vec![
            WordLevel::new("a", ["x", "z"]),
            WordLevel::new("b", ["x"]),
        ]);
        assert_eq!(catalog.combined_words(&["b", "a"]), vec!["x", "x", "z"]);
    }

    #[test]
    fn test_unknown_level_contributes_nothing() {
        let catalog = WordCatalog::new(vec![WordLevel::new("a", ["x"])]);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(catalog.random_word_from_levels(&["nope", "a"], &mut rng), Ok("x"));
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let catalog = WordCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let empty: [&str; 0] = [];
        assert!(catalog.random_word_from_levels(&empty, &mut rng).is_err());
        assert_eq!(
            catalog.random_word_from_levels(&["missing"], &mut rng),
            Err(CatalogError::EmptySelection(vec!["missing".to_string()]))
        );
    }

    #[test]
    fn test_empty_selection_error_has_no_source() {
        let err: Box<dyn std::error::Error> =
            Box::new(CatalogError::EmptySelection(vec!["missing".to_string()]));
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "No words available in levels [\"missing\"]");
    }

    #[test]
    fn test_random_word_unknown_level_falls_back() {
        let catalog = WordCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(catalog.random_word("dinosaurs", &mut rng), Some("a"));
    }
}
