//! Category and round configuration
//!
//! This module defines the validated configuration structures a match is
//! built from: the [`Category`] data supplied by the category provider and
//! the [`RoundOptions`] controlling strikes, pacing, and the face-off
//! minigame.

use std::time::Duration;

use garde::Validate;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::constants::{category::*, round};

use super::{
    board::{Answer, Board},
    minigame::MinigameKind,
};

/// Validation result type for duration validation
type ValidationResult = garde::Result;

/// Validates that a duration falls within specified bounds.
///
/// This is a custom validation function for use with the `garde` crate.
/// It checks if the duration in seconds is within the inclusive range
/// defined by `MIN_SECONDS` and `MAX_SECONDS`.
///
/// # Errors
///
/// Returns a `garde::Error` if the duration is outside the specified bounds.
pub fn validate_duration<const MIN_SECONDS: u64, const MAX_SECONDS: u64>(
    val: &Duration,
    _ctx: &(),
) -> ValidationResult {
    if (MIN_SECONDS..=MAX_SECONDS).contains(&val.as_secs()) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "outside of bounds [{MIN_SECONDS},{MAX_SECONDS}]",
        )))
    }
}

/// Validates an interval that drives a repeating timer.
///
/// # Errors
///
/// Returns a `garde::Error` if the interval is zero or longer than
/// `MAX_SECONDS`.
pub fn validate_interval<const MAX_SECONDS: u64>(val: &Duration, ctx: &()) -> ValidationResult {
    if val.is_zero() {
        return Err(garde::Error::new("interval must not be zero"));
    }
    validate_duration::<0, MAX_SECONDS>(val, ctx)
}

/// Validates an optional duration, accepting `None`.
///
/// # Errors
///
/// Returns a `garde::Error` if the duration is present and invalid.
pub fn validate_optional_interval<const MAX_SECONDS: u64>(
    val: &Option<Duration>,
    ctx: &(),
) -> ValidationResult {
    val.as_ref()
        .map_or(Ok(()), |val| validate_interval::<MAX_SECONDS>(val, ctx))
}

/// How hard a category is, used by the category provider to filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Common everyday answers
    #[default]
    Easy,
    /// Somewhat less obvious answers
    NotSoEasy,
    /// Obscure answers
    Hard,
    /// Answers almost nobody guesses
    DeathMode,
}

#[skip_serializing_none]
/// A single answer as supplied by the category provider
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnswerConfig {
    /// Canonical answer text shown on the board
    #[garde(length(chars, min = 1, max = MAX_ANSWER_LENGTH))]
    text: String,
    /// Decoration shown next to the answer
    #[garde(skip)]
    emoji: Option<String>,
    /// Alternative spellings and synonyms that also count as this answer
    #[garde(length(max = MAX_ACCEPTED_COUNT), inner(length(chars, max = MAX_ANSWER_LENGTH)))]
    #[serde(default)]
    accepted: Vec<String>,
    /// Explicit point value, defaults to the value implied by the answer's rank
    #[garde(range(min = 1, max = MAX_POINTS))]
    points: Option<u64>,
}

impl AnswerConfig {
    /// Creates an answer without decoration or explicit points
    pub fn new<S: Into<String>>(text: S, accepted: Vec<String>) -> Self {
        Self {
            text: text.into(),
            emoji: None,
            accepted,
            points: None,
        }
    }

    /// Sets an explicit point value, overriding the rank-derived one
    #[must_use]
    pub fn with_points(mut self, points: u64) -> Self {
        self.points = Some(points);
        self
    }

    /// Sets the decoration shown next to the answer
    #[must_use]
    pub fn with_emoji<S: Into<String>>(mut self, emoji: S) -> Self {
        self.emoji = Some(emoji.into());
        self
    }
}

/// A survey category: a question label and its ranked answers
///
/// Answers are listed from most to least popular. Point values must be
/// strictly decreasing by rank; this is a contract of the category provider
/// and is not checked here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Category {
    /// What the survey asked
    #[garde(length(chars, min = MIN_LABEL_LENGTH, max = MAX_LABEL_LENGTH))]
    label: String,
    /// How hard the category is
    #[garde(skip)]
    difficulty: Difficulty,
    /// Ranked answers, most popular first
    #[garde(length(min = 1, max = ANSWERS_COUNT), dive)]
    answers: Vec<AnswerConfig>,
}

impl Category {
    /// Creates a category from its label, difficulty, and ranked answers
    pub fn new<S: Into<String>>(
        label: S,
        difficulty: Difficulty,
        answers: Vec<AnswerConfig>,
    ) -> Self {
        Self {
            label: label.into(),
            difficulty,
            answers,
        }
    }

    /// Returns the survey label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the category difficulty
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Builds a fresh, fully hidden board from this category
    ///
    /// Answers without an explicit point value are worth
    /// `ANSWERS_COUNT - rank`, so the top answer of a full board is worth 10
    /// and the last one 1.
    pub fn to_board(&self) -> Board {
        Board::new(
            self.answers
                .iter()
                .enumerate()
                .map(|(rank, answer)| Answer {
                    text: answer.text.clone(),
                    points: answer
                        .points
                        .unwrap_or(ANSWERS_COUNT.saturating_sub(rank) as u64),
                    accepted: answer.accepted.clone(),
                    emoji: answer.emoji.clone(),
                })
                .collect(),
        )
    }
}

fn default_max_strikes() -> usize {
    round::MAX_STRIKES
}

fn default_strike_out_settle() -> Duration {
    Duration::from_millis(round::STRIKE_OUT_SETTLE_MS)
}

fn default_steal_fail_settle() -> Duration {
    Duration::from_millis(round::STEAL_FAIL_SETTLE_MS)
}

fn default_reveal_finish() -> Duration {
    Duration::from_millis(round::REVEAL_FINISH_MS)
}

/// Settings for a single round
///
/// A zero delay means the corresponding transition happens immediately
/// instead of being scheduled.
#[serde_with::serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoundOptions {
    /// Wrong guesses that end the active team's turn
    #[garde(range(min = 1, max = round::MAX_STRIKES_LIMIT))]
    #[serde(default = "default_max_strikes")]
    pub max_strikes: usize,
    /// Time the category label is shown before the face-off starts
    #[garde(custom(validate_duration::<0, { round::MAX_DELAY }>))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(default)]
    pub category_reveal: Duration,
    /// Pause after the final strike before control passes to the other team
    #[garde(custom(validate_duration::<0, { round::MAX_DELAY }>))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(default = "default_strike_out_settle")]
    pub strike_out_settle: Duration,
    /// Pause after a failed steal before the board is revealed
    #[garde(custom(validate_duration::<0, { round::MAX_DELAY }>))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(default = "default_steal_fail_settle")]
    pub steal_fail_settle: Duration,
    /// Pause after the last answer is revealed before the round is over
    #[garde(custom(validate_duration::<0, { round::MAX_DELAY }>))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(default = "default_reveal_finish")]
    pub reveal_finish: Duration,
    /// Interval between automatic reveal steps, `None` for manual stepping
    #[garde(custom(validate_optional_interval::<{ round::MAX_DELAY }>))]
    #[serde_as(as = "Option<serde_with::DurationMilliSeconds<u64>>")]
    #[serde(default)]
    pub auto_reveal: Option<Duration>,
    /// Face-off buzz-in minigame
    #[garde(dive)]
    #[serde(default)]
    pub minigame: MinigameKind,
}

impl Default for RoundOptions {
    fn default() -> Self {
        Self {
            max_strikes: default_max_strikes(),
            category_reveal: Duration::ZERO,
            strike_out_settle: default_strike_out_settle(),
            steal_fail_settle: default_steal_fail_settle(),
            reveal_finish: default_reveal_finish(),
            auto_reveal: None,
            minigame: MinigameKind::default(),
        }
    }
}

impl RoundOptions {
    /// Options with every delay set to zero, so all transitions are immediate
    pub fn instant() -> Self {
        Self {
            strike_out_settle: Duration::ZERO,
            steal_fail_settle: Duration::ZERO,
            reveal_finish: Duration::ZERO,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    pub fn create_test_category() -> Category {
        Category::new(
            "Name a food people eat at parties",
            Difficulty::Easy,
            vec![
                AnswerConfig::new("Pizza", vec!["pizzas".to_string()]),
                AnswerConfig::new("Chips", vec!["crisps".to_string()]),
                AnswerConfig::new("Cake", vec![]),
            ],
        )
    }

    #[test]
    fn test_category_validation() {
        assert!(create_test_category().validate().is_ok());
    }

    #[test]
    fn test_category_empty_label() {
        let mut category = create_test_category();
        category.label = String::new();
        assert!(category.validate().is_err());
    }

    #[test]
    fn test_category_without_answers() {
        let mut category = create_test_category();
        category.answers.clear();
        assert!(category.validate().is_err());
    }

    #[test]
    fn test_category_too_many_answers() {
        let mut category = create_test_category();
        category.answers = vec![AnswerConfig::new("Answer", vec![]); ANSWERS_COUNT + 1];
        assert!(category.validate().is_err());
    }

    #[test]
    fn test_answer_text_too_long() {
        let mut category = create_test_category();
        category.answers[0] = AnswerConfig::new("a".repeat(MAX_ANSWER_LENGTH + 1), vec![]);
        assert!(category.validate().is_err());
    }

    #[test]
    fn test_answer_zero_points_rejected() {
        let mut category = create_test_category();
        category.answers[0] = AnswerConfig::new("Pizza", vec![]).with_points(0);
        assert!(category.validate().is_err());
    }

    #[test]
    fn test_answer_points_upper_bound() {
        let mut category = create_test_category();
        category.answers[0] = AnswerConfig::new("Pizza", vec![]).with_points(MAX_POINTS);
        assert!(category.validate().is_ok());
        category.answers[0] = AnswerConfig::new("Pizza", vec![]).with_points(MAX_POINTS + 1);
        assert!(category.validate().is_err());
        category.answers[0] = AnswerConfig::new("Pizza", vec![]).with_points(u64::MAX);
        assert!(category.validate().is_err());
    }

    #[test]
    fn test_to_board_rank_points() {
        let board = create_test_category().to_board();
        let points: Vec<u64> = board.answers().iter().map(|a| a.answer.points).collect();
        assert_eq!(points, vec![10, 9, 8]);
        assert!(board.answers().iter().all(|a| !a.revealed));
    }

    #[test]
    fn test_to_board_explicit_points() {
        let category = Category::new(
            "Name something hot",
            Difficulty::Hard,
            vec![
                AnswerConfig::new("Sun", vec![]).with_points(42),
                AnswerConfig::new("Fire", vec![]).with_emoji("🔥"),
            ],
        );
        let board = category.to_board();
        assert_eq!(board.answers()[0].answer.points, 42);
        assert_eq!(board.answers()[1].answer.points, 9);
        assert_eq!(board.answers()[1].answer.emoji.as_deref(), Some("🔥"));
    }

    #[test]
    fn test_category_deserialization_defaults() {
        let json = r#"{"label":"Name a pet","difficulty":"Easy","answers":[{"text":"Dog"}]}"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert!(category.validate().is_ok());
        assert_eq!(category.to_board().answers()[0].answer.points, 10);
        assert!(category.to_board().answers()[0].answer.accepted.is_empty());
    }

    #[test]
    fn test_round_options_default_validation() {
        assert!(RoundOptions::default().validate().is_ok());
        assert!(RoundOptions::instant().validate().is_ok());
    }

    #[test]
    fn test_round_options_strikes_out_of_range() {
        let mut options = RoundOptions::default();
        options.max_strikes = 0;
        assert!(options.validate().is_err());
        options.max_strikes = round::MAX_STRIKES_LIMIT + 1;
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_round_options_delay_too_long() {
        let mut options = RoundOptions::default();
        options.steal_fail_settle = Duration::from_secs(round::MAX_DELAY + 1);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_round_options_zero_auto_reveal_rejected() {
        let mut options = RoundOptions::default();
        options.auto_reveal = Some(Duration::ZERO);
        assert!(options.validate().is_err());
        options.auto_reveal = Some(Duration::from_millis(700));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_round_options_deserialization_defaults() {
        let options: RoundOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.max_strikes, round::MAX_STRIKES);
        assert_eq!(
            options.strike_out_settle,
            Duration::from_millis(round::STRIKE_OUT_SETTLE_MS)
        );
        assert_eq!(options.category_reveal, Duration::ZERO);
        assert!(options.auto_reveal.is_none());
        assert!(matches!(options.minigame, MinigameKind::Classic));
    }
}
