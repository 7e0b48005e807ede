//! Free text answer matching
//!
//! A guess is resolved against the answers still hidden on the board. The
//! default [`ExactMatcher`] compares trimmed, lowercased text against each
//! answer's canonical text and accepted alternatives. When two answers share
//! a spelling the one ranked higher on the board wins.

use super::board::Answer;

/// Normalizes an answer string for comparison
///
/// # Returns
/// * Cleaned answer string (trimmed and lowercased)
pub fn clean_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Resolves a guess against candidate answers
///
/// Implementations other than [`ExactMatcher`] (for example a semantic
/// matcher) may be substituted, but the round only relies on this contract.
pub trait AnswerMatcher {
    /// Returns the index in `candidates` of the single matched answer
    ///
    /// `candidates` are the unrevealed answers in rank order. A blank guess
    /// must never match.
    fn match_guess(&self, guess: &str, candidates: &[&Answer]) -> Option<usize>;

    /// Returns the canonical text of the matched answer
    fn match_text<'a>(&self, guess: &str, candidates: &[&'a Answer]) -> Option<&'a str> {
        self.match_guess(guess, candidates)
            .and_then(|index| candidates.get(index))
            .map(|answer| answer.text.as_str())
    }
}

/// Case-insensitive exact matching on canonical text and accepted alternatives
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl AnswerMatcher for ExactMatcher {
    fn match_guess(&self, guess: &str, candidates: &[&Answer]) -> Option<usize> {
        let guess = clean_answer(guess);

        if guess.is_empty() {
            return None;
        }

        candidates
            .iter()
            .position(|answer| answer.spellings().any(|s| clean_answer(s) == guess))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn answer(text: &str, points: u64, accepted: &[&str]) -> Answer {
        Answer {
            text: text.to_string(),
            points,
            accepted: accepted.iter().map(ToString::to_string).collect(),
            emoji: None,
        }
    }

    fn create_test_answers() -> Vec<Answer> {
        vec![
            answer("Dog", 10, &["puppy", "doggo"]),
            answer("Cat", 9, &["kitty", "kitten"]),
            answer("Goldfish", 8, &["fish"]),
        ]
    }

    #[test]
    fn test_clean_answer() {
        assert_eq!(clean_answer("  Paris  "), "paris");
        assert_eq!(clean_answer("PARIS"), "paris");
        assert_eq!(clean_answer("   hello WORLD   "), "hello world");
    }

    #[test]
    fn test_matches_canonical_text_case_insensitive() {
        let answers = create_test_answers();
        let candidates: Vec<&Answer> = answers.iter().collect();
        assert_eq!(ExactMatcher.match_text(" cAt ", &candidates), Some("Cat"));
        assert_eq!(ExactMatcher.match_guess("GOLDFISH", &candidates), Some(2));
    }

    #[test]
    fn test_matches_synonym_returns_canonical() {
        let answers = create_test_answers();
        let candidates: Vec<&Answer> = answers.iter().collect();
        assert_eq!(ExactMatcher.match_text("Kitten", &candidates), Some("Cat"));
        assert_eq!(ExactMatcher.match_text("fish ", &candidates), Some("Goldfish"));
    }

    #[test]
    fn test_no_partial_matching() {
        let answers = create_test_answers();
        let candidates: Vec<&Answer> = answers.iter().collect();
        assert_eq!(ExactMatcher.match_guess("gold", &candidates), None);
        assert_eq!(ExactMatcher.match_guess("dogs", &candidates), None);
        assert_eq!(ExactMatcher.match_guess("hot dog", &candidates), None);
    }

    #[test]
    fn test_blank_guess_never_matches() {
        let answers = vec![answer("", 10, &[" "])];
        let candidates: Vec<&Answer> = answers.iter().collect();
        assert_eq!(ExactMatcher.match_guess("", &candidates), None);
        assert_eq!(ExactMatcher.match_guess("   \t", &candidates), None);
    }

    #[test]
    fn test_overlap_resolves_to_higher_rank() {
        let answers = vec![
            answer("Couch", 10, &["sofa"]),
            answer("Sofa", 9, &[]),
        ];
        let candidates: Vec<&Answer> = answers.iter().collect();
        assert_eq!(ExactMatcher.match_text("sofa", &candidates), Some("Couch"));

        let lower_only: Vec<&Answer> = answers.iter().skip(1).collect();
        assert_eq!(ExactMatcher.match_text("sofa", &lower_only), Some("Sofa"));
    }

    #[test]
    fn test_every_spelling_matches_exactly_once() {
        let answers = create_test_answers();
        let candidates: Vec<&Answer> = answers.iter().collect();
        for (index, answer) in answers.iter().enumerate() {
            for spelling in answer.spellings() {
                assert_eq!(
                    ExactMatcher.match_guess(&spelling.to_uppercase(), &candidates),
                    Some(index)
                );
            }
        }
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(ExactMatcher.match_guess("dog", &[]), None);
    }
}
