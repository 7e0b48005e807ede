//! Category supply
//!
//! A match asks a [`CategorySource`] for a fresh category at the start of
//! every round. The bundled [`CategoryDeck`] draws uniformly among the
//! categories of the requested difficulty that have not been played yet.

use itertools::Itertools;

use crate::feud::config::{Category, Difficulty};

/// Supplier of round categories
pub trait CategorySource {
    /// Draws an unplayed category of `difficulty`, or `None` when exhausted
    fn next_category(&mut self, difficulty: Difficulty) -> Option<Category>;

    /// Whether an unplayed category of `difficulty` is left
    fn has_remaining(&self, difficulty: Difficulty) -> bool;
}

/// A fixed pool of categories, each drawn at most once
#[derive(Debug, Clone)]
pub struct CategoryDeck {
    categories: Vec<Category>,
    played: Vec<bool>,
    rng: fastrand::Rng,
}

impl CategoryDeck {
    /// Creates a deck over `categories` with a randomly seeded generator
    pub fn new(categories: Vec<Category>) -> Self {
        Self::with_rng(categories, fastrand::Rng::new())
    }

    /// Creates a deck over `categories` with the given generator
    pub fn with_rng(categories: Vec<Category>, rng: fastrand::Rng) -> Self {
        let played = vec![false; categories.len()];
        Self {
            categories,
            played,
            rng,
        }
    }

    fn eligible(&self, difficulty: Difficulty) -> impl Iterator<Item = usize> + '_ {
        self.categories
            .iter()
            .zip(&self.played)
            .positions(move |(category, played)| !played && category.difficulty() == difficulty)
    }

    /// Number of unplayed categories of `difficulty`
    pub fn remaining(&self, difficulty: Difficulty) -> usize {
        self.eligible(difficulty).count()
    }
}

impl CategorySource for CategoryDeck {
    fn next_category(&mut self, difficulty: Difficulty) -> Option<Category> {
        let candidates = self.eligible(difficulty).collect_vec();
        let index = *self.rng.choice(&candidates)?;
        self.played[index] = true;
        log::debug!(
            "drew category {:?}, {} left",
            self.categories[index].label(),
            candidates.len() - 1
        );
        Some(self.categories[index].clone())
    }

    fn has_remaining(&self, difficulty: Difficulty) -> bool {
        self.eligible(difficulty).next().is_some()
    }
}
