//! The answer board of a round
//!
//! A [`Board`] holds the ranked answers of the current category together
//! with whether each one has been revealed. Revealing is one-way: once an
//! answer is shown it stays shown for the rest of the round.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::matcher::{AnswerMatcher, clean_answer};

/// An immutable answer definition
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Canonical answer text
    pub text: String,
    /// Points awarded for revealing this answer by guessing it
    pub points: u64,
    /// Alternative texts that also count as this answer
    pub accepted: Vec<String>,
    /// Decoration shown next to the answer
    pub emoji: Option<String>,
}

impl Answer {
    /// Iterates over the canonical text followed by every accepted alternative
    pub fn spellings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.text.as_str()).chain(self.accepted.iter().map(String::as_str))
    }
}

/// An answer on the board and whether it has been revealed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedAnswer {
    /// The answer definition
    pub answer: Answer,
    /// Whether the answer is currently shown
    pub revealed: bool,
}

/// What the presentation needs to render one board slot
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    /// 1-based rank of the slot
    pub rank: usize,
    /// Answer text, only present once revealed
    pub text: Option<String>,
    /// Point value, only present once revealed
    pub points: Option<u64>,
    /// Decoration, only present once revealed
    pub emoji: Option<String>,
}

/// The ranked set of answers for a round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    answers: Vec<RevealedAnswer>,
}

impl Board {
    /// Creates a fully hidden board from answers in rank order
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: answers
                .into_iter()
                .map(|answer| RevealedAnswer {
                    answer,
                    revealed: false,
                })
                .collect(),
        }
    }

    /// Returns every slot in rank order
    pub fn answers(&self) -> &[RevealedAnswer] {
        &self.answers
    }

    /// Returns the number of answers not yet revealed
    pub fn unrevealed_count(&self) -> usize {
        self.answers.iter().filter(|a| !a.revealed).count()
    }

    /// Whether every answer has been revealed
    pub fn is_cleared(&self) -> bool {
        self.unrevealed_count() == 0
    }

    /// Finds a revealed answer the guess spells, synonyms included
    pub fn find_revealed(&self, guess: &str) -> Option<&Answer> {
        self.find_revealed_by(guess, true)
    }

    /// Finds a revealed answer whose canonical text the guess spells
    pub fn find_revealed_text(&self, guess: &str) -> Option<&Answer> {
        self.find_revealed_by(guess, false)
    }

    fn find_revealed_by(&self, guess: &str, synonyms: bool) -> Option<&Answer> {
        let guess = clean_answer(guess);
        if guess.is_empty() {
            return None;
        }
        let checked = if synonyms { usize::MAX } else { 1 };
        self.answers
            .iter()
            .filter(|a| a.revealed)
            .map(|a| &a.answer)
            .find(|answer| {
                answer
                    .spellings()
                    .take(checked)
                    .any(|s| clean_answer(s) == guess)
            })
    }

    /// Runs the matcher over the unrevealed answers and returns the rank index of the match
    pub fn match_guess(&self, guess: &str, matcher: &dyn AnswerMatcher) -> Option<usize> {
        let (ranks, candidates): (Vec<usize>, Vec<&Answer>) = self
            .answers
            .iter()
            .enumerate()
            .filter(|(_, a)| !a.revealed)
            .map(|(rank, a)| (rank, &a.answer))
            .unzip();

        matcher
            .match_guess(guess, &candidates)
            .and_then(|index| ranks.get(index).copied())
    }

    /// Reveals the answer at `rank`, returning it if it was hidden
    ///
    /// Revealing an already revealed answer does nothing and returns `None`.
    pub fn reveal(&mut self, rank: usize) -> Option<&Answer> {
        let slot = self.answers.get_mut(rank)?;
        if slot.revealed {
            return None;
        }
        slot.revealed = true;
        Some(&slot.answer)
    }

    /// Returns the rank of the highest scoring hidden answer
    pub fn next_hidden(&self) -> Option<usize> {
        self.answers
            .iter()
            .enumerate()
            .filter(|(_, a)| !a.revealed)
            .max_by(|(ra, a), (rb, b)| a.answer.points.cmp(&b.answer.points).then(rb.cmp(ra)))
            .map(|(rank, _)| rank)
    }

    /// Returns what the presentation may show of each slot
    pub fn view(&self) -> Vec<SlotView> {
        self.answers
            .iter()
            .enumerate()
            .map(|(rank, a)| {
                if a.revealed {
                    SlotView {
                        rank: rank + 1,
                        text: Some(a.answer.text.clone()),
                        points: Some(a.answer.points),
                        emoji: a.answer.emoji.clone(),
                    }
                } else {
                    SlotView {
                        rank: rank + 1,
                        text: None,
                        points: None,
                        emoji: None,
                    }
                }
            })
            .collect()
    }
}
