//! Match scoring
//!
//! This module accumulates round outcomes into running team totals and
//! decides the match winner once the rounds are exhausted.

use enum_map::EnumMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{feud::round::RoundOutcome, team::Team};

/// Final result of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// One team finished with more points
    Winner(Team),
    /// Both teams finished level
    Tie,
}

/// Score information sent to the presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreMessage {
    /// Current totals
    pub totals: EnumMap<Team, u64>,
    /// Totals before the most recent round
    pub previous: EnumMap<Team, u64>,
    /// Rounds won by each team
    pub rounds_won: EnumMap<Team, usize>,
}

/// Serialization helper for Scoreboard struct
#[derive(Deserialize)]
struct ScoreboardSerde {
    history: Vec<RoundOutcome>,
}

/// Running team totals together with the outcome of every round played
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "ScoreboardSerde")]
pub struct Scoreboard {
    /// Outcome of each completed round, in order
    history: Vec<RoundOutcome>,

    /// Current totals (cached)
    #[serde(skip)]
    totals: EnumMap<Team, u64>,
}

fn sum_outcomes<'a, I: Iterator<Item = &'a RoundOutcome>>(outcomes: I) -> EnumMap<Team, u64> {
    outcomes.fold(EnumMap::default(), |mut totals, outcome| {
        totals[outcome.winner] = totals[outcome.winner].saturating_add(outcome.points);
        totals
    })
}

impl From<ScoreboardSerde> for Scoreboard {
    /// Rebuilds the cached totals from the round history
    fn from(serde: ScoreboardSerde) -> Self {
        Self {
            totals: sum_outcomes(serde.history.iter()),
            history: serde.history,
        }
    }
}

impl Scoreboard {
    /// Adds the points of a finished round to the winner's total
    pub fn add_round(&mut self, outcome: RoundOutcome) {
        self.totals[outcome.winner] = self.totals[outcome.winner].saturating_add(outcome.points);
        self.history.push(outcome);
    }

    /// Running total of `team`
    pub fn total(&self, team: Team) -> u64 {
        self.totals[team]
    }

    /// Running totals of both teams
    pub fn totals(&self) -> EnumMap<Team, u64> {
        self.totals
    }

    /// Totals as they were before the most recent round
    pub fn previous_totals(&self) -> EnumMap<Team, u64> {
        sum_outcomes(self.history.iter().rev().skip(1))
    }

    /// Outcomes of the completed rounds, in order
    pub fn history(&self) -> &[RoundOutcome] {
        &self.history
    }

    /// Number of completed rounds
    pub fn rounds_played(&self) -> usize {
        self.history.len()
    }

    /// Number of rounds won by each team
    pub fn rounds_won(&self) -> EnumMap<Team, usize> {
        let counts = self.history.iter().counts_by(|outcome| outcome.winner);
        EnumMap::from_fn(|team| counts.get(&team).copied().unwrap_or_default())
    }

    /// The team with more points, or a tie when level
    pub fn leader(&self) -> MatchOutcome {
        let (one, two) = (self.totals[Team::One], self.totals[Team::Two]);
        match one.cmp(&two) {
            std::cmp::Ordering::Greater => MatchOutcome::Winner(Team::One),
            std::cmp::Ordering::Less => MatchOutcome::Winner(Team::Two),
            std::cmp::Ordering::Equal => MatchOutcome::Tie,
        }
    }

    /// Score information for the presentation
    pub fn score_message(&self) -> ScoreMessage {
        ScoreMessage {
            totals: self.totals(),
            previous: self.previous_totals(),
            rounds_won: self.rounds_won(),
        }
    }
}
