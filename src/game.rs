//! Core match logic and state management
//!
//! This module contains the match shell that strings rounds together: it
//! draws a category for every round, routes input and alarms to the round in
//! progress, folds finished rounds into the scoreboard, and ends the match
//! once the configured number of rounds has been played or the categories
//! run out.

use std::fmt::Debug;

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    AlarmMessage,
    constants::game::ROUND_OPTIONS,
    deck::CategorySource,
    feud::{
        self,
        config::{Difficulty, RoundOptions},
        minigame::BellId,
        round::{self, Choice, Round, RoundOutcome},
    },
    leaderboard::{MatchOutcome, ScoreMessage, Scoreboard},
    session::Tunnel,
    team::Team,
};

/// Errors surfaced by the match shell
#[derive(Error, Debug)]
pub enum Error {
    /// The round rejected the action
    #[error(transparent)]
    Round(#[from] feud::Error),
    /// No unplayed category of the selected difficulty is left
    #[error("no eligible category is left")]
    NoEligibleCategory,
    /// The match options failed validation
    #[error("invalid options: {0}")]
    InvalidOptions(garde::Report),
    /// The category source supplied a malformed category
    #[error("invalid category: {0}")]
    InvalidCategory(garde::Report),
    /// The message does not apply to the current match state
    #[error("not allowed {0}")]
    InvalidState(&'static str),
}

/// Validates the number of rounds in a match
fn validate_total_rounds(val: &usize, _ctx: &()) -> garde::Result {
    if ROUND_OPTIONS.contains(val) {
        Ok(())
    } else {
        Err(garde::Error::new(format!("must be one of {ROUND_OPTIONS:?}")))
    }
}

fn default_total_rounds() -> usize {
    ROUND_OPTIONS[0]
}

/// Configuration options for a match
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Options {
    /// Difficulty categories are drawn from
    #[garde(skip)]
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Number of rounds in the match
    #[garde(custom(validate_total_rounds))]
    #[serde(default = "default_total_rounds")]
    pub total_rounds: usize,
    /// Settings applied to every round
    #[garde(dive)]
    #[serde(default)]
    pub round: RoundOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            total_rounds: default_total_rounds(),
            round: RoundOptions::default(),
        }
    }
}

/// Represents the current phase of the match
#[derive(Debug)]
pub enum State {
    /// Created but not started
    Waiting,
    /// A round is in progress
    Round(Box<Round>),
    /// Between rounds, after `completed` rounds
    Intermission {
        /// Rounds finished so far
        completed: usize,
    },
    /// The match has ended
    Done(MatchOutcome),
}

/// Input from the presentation or the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IncomingMessage {
    /// A team buzzed in, as decided outside the engine
    Buzzed(Team),
    /// A team pressed its face-off button
    Press(Team),
    /// A bell was struck during the face-off
    StrikeBell(BellId),
    /// A team submitted a guess
    Guess {
        /// The guessing team
        team: Team,
        /// The guess text
        text: String,
    },
    /// The host marked the team's answer as wrong
    Wrong(Team),
    /// The face-off winner decided to play or pass
    Choose {
        /// The deciding team
        team: Team,
        /// The decision
        choice: Choice,
    },
    /// Show the next answer during the round reveal
    AdvanceReveal,
    /// Replace the current category with a fresh one
    SkipCategory,
    /// Start the next round
    Next,
}

/// Messages sent to the presentation about the match as a whole
#[derive(Debug, Serialize, Clone)]
pub enum UpdateMessage {
    /// An action was rejected, with a message to show
    Rejected(String),
    /// A round began
    RoundStarted {
        /// 1-based number of the round
        number: usize,
        /// Rounds in the match
        total: usize,
    },
    /// A round ended and its points were banked
    RoundOver {
        /// Winner and points of the round
        outcome: RoundOutcome,
        /// Updated scores
        scores: ScoreMessage,
    },
    /// The match ended
    MatchOver {
        /// Match winner or tie
        outcome: MatchOutcome,
        /// Final scores
        scores: ScoreMessage,
        /// Whether the match was cut short because the categories ran out
        exhausted: bool,
    },
}

/// Full snapshot of the match for a freshly attached presentation
#[derive(Debug, Serialize, Clone)]
pub enum SyncMessage {
    /// The match has not started
    Waiting {
        /// Rounds in the match
        total: usize,
    },
    /// A round is in progress
    Round {
        /// 1-based number of the round
        number: usize,
        /// Rounds in the match
        total: usize,
        /// Current scores
        scores: ScoreMessage,
        /// State of the round
        round: round::SyncMessage,
    },
    /// Between rounds
    Intermission {
        /// Rounds finished so far
        completed: usize,
        /// Rounds in the match
        total: usize,
        /// Current scores
        scores: ScoreMessage,
    },
    /// The match ended
    Done {
        /// Match winner or tie
        outcome: MatchOutcome,
        /// Final scores
        scores: ScoreMessage,
    },
}

/// A feud match between two teams
pub struct Game<C: CategorySource> {
    /// Match configuration
    options: Options,
    /// Supplier of round categories
    source: C,
    /// Banked points of every finished round
    pub scoreboard: Scoreboard,
    /// Current phase of the match
    pub state: State,
    /// Rounds started so far, skipped categories not counted
    rounds_started: usize,
}

impl<C: CategorySource> Debug for Game<C> {
    /// Custom debug implementation that leaves out the category source
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("options", &self.options)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<C: CategorySource> Game<C> {
    /// Creates a new match
    ///
    /// # Arguments
    ///
    /// * `options` - Match configuration
    /// * `source` - Supplier of round categories
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOptions`] if the options fail validation.
    pub fn new(options: Options, source: C) -> Result<Self, Error> {
        options.validate().map_err(Error::InvalidOptions)?;
        Ok(Self {
            options,
            source,
            scoreboard: Scoreboard::default(),
            state: State::Waiting,
            rounds_started: 0,
        })
    }

    /// Returns the match configuration
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the round in progress, if any
    pub fn round(&self) -> Option<&Round> {
        match &self.state {
            State::Round(round) => Some(round),
            _ => None,
        }
    }

    /// Whether the current category may be skipped
    ///
    /// Requires a round still in its category reveal or face-off and an
    /// unplayed category to replace it with.
    pub fn can_skip(&self) -> bool {
        self.round().is_some_and(Round::can_skip)
            && self.source.has_remaining(self.options.difficulty)
    }

    /// Whether the match has ended
    pub fn is_done(&self) -> bool {
        matches!(self.state, State::Done(_))
    }

    /// Starts the match with its first round
    ///
    /// # Arguments
    ///
    /// * `schedule_message` - Function to schedule delayed messages
    /// * `tunnel` - Presentation sink
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] if the match has already started,
    /// and [`Error::NoEligibleCategory`] if no category could be drawn, in
    /// which case the match is over.
    ///
    /// # Type Parameters
    ///
    /// * `T` - Type implementing the Tunnel trait
    /// * `S` - Function type for scheduling alarm messages
    pub fn play<T: Tunnel, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        mut schedule_message: S,
        tunnel: &T,
    ) -> Result<(), Error> {
        if !matches!(self.state, State::Waiting) {
            return Err(Error::InvalidState("once the match has started"));
        }
        log::info!(
            "match started: {} rounds of {:?}",
            self.options.total_rounds,
            self.options.difficulty
        );
        self.start_round(&mut schedule_message, tunnel)
    }

    /// Draws a category and starts a round with it
    fn start_round<T: Tunnel, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        schedule_message: &mut S,
        tunnel: &T,
    ) -> Result<(), Error> {
        let mut round = self.draw_round(tunnel)?;
        self.rounds_started += 1;

        tunnel.send_message(
            &UpdateMessage::RoundStarted {
                number: self.rounds_started,
                total: self.options.total_rounds,
            }
            .into(),
        );
        round.play(schedule_message, tunnel)?;
        self.state = State::Round(Box::new(round));
        Ok(())
    }

    /// Builds a round from the next category, ending the match if none is left
    fn draw_round<T: Tunnel>(&mut self, tunnel: &T) -> Result<Round, Error> {
        let Some(category) = self.source.next_category(self.options.difficulty) else {
            log::warn!(
                "no {:?} categories left, ending the match early",
                self.options.difficulty
            );
            self.finish_match(true, tunnel);
            return Err(Error::NoEligibleCategory);
        };
        category.validate().map_err(Error::InvalidCategory)?;
        Ok(Round::new(&category, self.options.round.clone()))
    }

    /// Replaces the round in progress with a fresh category
    fn skip_category<T: Tunnel, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        schedule_message: &mut S,
        tunnel: &T,
    ) -> Result<(), Error> {
        let State::Round(current) = &self.state else {
            return Err(Error::InvalidState("outside a round"));
        };
        if !current.can_skip() {
            return Err(feud::Error::InvalidPhase(current.kind()).into());
        }
        log::info!("skipping category {:?}", current.label());

        let mut round = self.draw_round(tunnel)?;
        round.play(schedule_message, tunnel)?;
        self.state = State::Round(Box::new(round));
        Ok(())
    }

    /// Banks the round once it is over and moves the match along
    fn check_round_over<T: Tunnel>(&mut self, tunnel: &T) {
        let Some(outcome) = self.round().and_then(Round::outcome) else {
            return;
        };

        self.scoreboard.add_round(outcome);
        tunnel.send_message(
            &UpdateMessage::RoundOver {
                outcome,
                scores: self.scoreboard.score_message(),
            }
            .into(),
        );

        let completed = self.scoreboard.rounds_played();
        if completed >= self.options.total_rounds {
            self.finish_match(false, tunnel);
        } else {
            self.state = State::Intermission { completed };
        }
    }

    /// Ends the match with the current leader
    fn finish_match<T: Tunnel>(&mut self, exhausted: bool, tunnel: &T) {
        let outcome = self.scoreboard.leader();
        log::info!("match over: {outcome:?}");
        self.state = State::Done(outcome);
        tunnel.send_message(
            &UpdateMessage::MatchOver {
                outcome,
                scores: self.scoreboard.score_message(),
                exhausted,
            }
            .into(),
        );
    }

    /// Handles input from the presentation or the host
    ///
    /// Rejected actions are also reported to the presentation as
    /// [`UpdateMessage::Rejected`].
    ///
    /// # Arguments
    ///
    /// * `message` - The incoming message
    /// * `schedule_message` - Function to schedule delayed messages
    /// * `tunnel` - Presentation sink
    ///
    /// # Errors
    ///
    /// Returns the reason the action was rejected.
    ///
    /// # Type Parameters
    ///
    /// * `T` - Type implementing the Tunnel trait
    /// * `S` - Function type for scheduling alarm messages
    pub fn receive_message<T: Tunnel, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        message: IncomingMessage,
        mut schedule_message: S,
        tunnel: &T,
    ) -> Result<(), Error> {
        let result = self.handle_message(message, &mut schedule_message, tunnel);
        if let Err(error) = &result
            && !matches!(error, Error::NoEligibleCategory)
        {
            log::debug!("rejected: {error}");
            tunnel.send_message(&UpdateMessage::Rejected(error.to_string()).into());
        }
        result
    }

    fn handle_message<T: Tunnel, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        message: IncomingMessage,
        schedule_message: &mut S,
        tunnel: &T,
    ) -> Result<(), Error> {
        match message {
            IncomingMessage::Next => match self.state {
                State::Intermission { .. } => self.start_round(schedule_message, tunnel),
                _ => Err(Error::InvalidState("before the round is over")),
            },
            IncomingMessage::SkipCategory => self.skip_category(schedule_message, tunnel),
            message => {
                let State::Round(round) = &mut self.state else {
                    return Err(Error::InvalidState("outside a round"));
                };
                match message {
                    IncomingMessage::Buzzed(team) => round.buzz(team, tunnel),
                    IncomingMessage::Press(team) => round.press(team, tunnel),
                    IncomingMessage::StrikeBell(bell) => round.strike_bell(bell, tunnel),
                    IncomingMessage::Guess { team, text } => {
                        round.submit_guess(team, &text, schedule_message, tunnel)
                    }
                    IncomingMessage::Wrong(team) => {
                        round.declare_wrong(team, schedule_message, tunnel)
                    }
                    IncomingMessage::Choose { team, choice } => round.choose(team, choice, tunnel),
                    IncomingMessage::AdvanceReveal => round.advance_reveal(schedule_message, tunnel),
                    IncomingMessage::Next | IncomingMessage::SkipCategory => Ok(()),
                }?;
                self.check_round_over(tunnel);
                Ok(())
            }
        }
    }

    /// Handles scheduled alarm messages
    ///
    /// Alarms are delivered to the round in progress when they were
    /// scheduled by it. Alarms of a replaced or finished round are dropped.
    ///
    /// # Arguments
    ///
    /// * `message` - The alarm message to process
    /// * `schedule_message` - Function to schedule delayed messages
    /// * `tunnel` - Presentation sink
    ///
    /// # Type Parameters
    ///
    /// * `T` - Type implementing the Tunnel trait
    /// * `S` - Function type for scheduling alarm messages
    pub fn receive_alarm<T: Tunnel, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        message: &AlarmMessage,
        mut schedule_message: S,
        tunnel: &T,
    ) {
        match &mut self.state {
            State::Round(round) if round.id() == message.round() => {
                round.receive_alarm(message, &mut schedule_message, tunnel);
                self.check_round_over(tunnel);
            }
            _ => log::warn!("dropping stale alarm for round {}", message.round()),
        }
    }

    /// Returns the message necessary to synchronize a presentation
    pub fn state_message(&self) -> SyncMessage {
        let total = self.options.total_rounds;
        let scores = self.scoreboard.score_message();
        match &self.state {
            State::Waiting => SyncMessage::Waiting { total },
            State::Round(round) => SyncMessage::Round {
                number: self.rounds_started,
                total,
                scores,
                round: round.state_message(),
            },
            State::Intermission { completed } => SyncMessage::Intermission {
                completed: *completed,
                total,
                scores,
            },
            State::Done(outcome) => SyncMessage::Done {
                outcome: *outcome,
                scores,
            },
        }
    }

    /// Sends the full snapshot through `tunnel`
    pub fn update_session<T: Tunnel>(&self, tunnel: &T) {
        tunnel.send_state(&self.state_message().into());
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::{
        deck::CategoryDeck,
        feud::{
            config::{AnswerConfig, Category},
            minigame::{MinigameKind, QuickDrawOptions},
            round::PhaseKind,
        },
        round_id::RoundId,
        session::mocks::*,
    };

    fn category(label: &str, difficulty: Difficulty) -> Category {
        Category::new(
            label,
            difficulty,
            vec![
                AnswerConfig::new("Alpha", vec!["a".to_string()]),
                AnswerConfig::new("Beta", vec!["b".to_string()]),
                AnswerConfig::new("Gamma", vec![]),
            ],
        )
    }

    fn create_test_deck(easy: usize) -> CategoryDeck {
        let mut categories = (0..easy)
            .map(|i| category(&format!("Easy {i}"), Difficulty::Easy))
            .collect::<Vec<_>>();
        categories.push(category("Hard", Difficulty::Hard));
        CategoryDeck::with_rng(categories, fastrand::Rng::with_seed(5))
    }

    fn instant_options(total_rounds: usize) -> Options {
        Options {
            total_rounds,
            round: RoundOptions::instant(),
            ..Options::default()
        }
    }

    fn create_test_game(total_rounds: usize, easy: usize) -> Game<CategoryDeck> {
        Game::new(instant_options(total_rounds), create_test_deck(easy)).unwrap()
    }

    fn send(game: &mut Game<CategoryDeck>, message: IncomingMessage, tunnel: &MockTunnel) {
        game.receive_message(message, noop_scheduler(), tunnel)
            .unwrap();
    }

    /// Plays a round that `team` wins with Alpha, Beta and Gamma
    fn win_round(game: &mut Game<CategoryDeck>, team: Team, tunnel: &MockTunnel) {
        send(game, IncomingMessage::Buzzed(team), tunnel);
        send(
            game,
            IncomingMessage::Guess {
                team,
                text: "Alpha".to_string(),
            },
            tunnel,
        );
        send(game, IncomingMessage::Wrong(team.other()), tunnel);
        send(
            game,
            IncomingMessage::Choose {
                team,
                choice: Choice::Play,
            },
            tunnel,
        );
        for text in ["b", "Gamma"] {
            send(
                game,
                IncomingMessage::Guess {
                    team,
                    text: text.to_string(),
                },
                tunnel,
            );
        }
    }

    /// Plays a round nobody scores in, awarded to `team`
    fn pointless_round(game: &mut Game<CategoryDeck>, team: Team, tunnel: &MockTunnel) {
        send(game, IncomingMessage::Buzzed(team), tunnel);
        send(game, IncomingMessage::Wrong(team), tunnel);
        send(game, IncomingMessage::Wrong(team.other()), tunnel);
        send(
            game,
            IncomingMessage::Choose {
                team,
                choice: Choice::Play,
            },
            tunnel,
        );
        for _ in 0..3 {
            send(game, IncomingMessage::Wrong(team), tunnel);
        }
        send(game, IncomingMessage::Wrong(team.other()), tunnel);
        while game.round().is_some() {
            send(game, IncomingMessage::AdvanceReveal, tunnel);
        }
    }

    #[test]
    fn test_options_validation() {
        assert!(Options::default().validate().is_ok());
        for total_rounds in [0, 1, 4, 6, 8] {
            let result = Game::new(instant_options(total_rounds), create_test_deck(3));
            assert!(matches!(result, Err(Error::InvalidOptions(_))));
        }
        for total_rounds in ROUND_OPTIONS {
            assert!(Game::new(instant_options(total_rounds), create_test_deck(3)).is_ok());
        }
    }

    #[test]
    fn test_options_deserialization_defaults() {
        let options: Options = serde_json::from_str("{}").unwrap();
        assert_eq!(options.total_rounds, 3);
        assert_eq!(options.difficulty, Difficulty::Easy);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_play_starts_first_round() {
        let tunnel = MockTunnel::default();
        let mut game = create_test_game(3, 3);
        game.play(noop_scheduler(), &tunnel).unwrap();
        assert_eq!(game.round().map(Round::kind), Some(PhaseKind::FaceOff));
        assert!(tunnel.contains("RoundStarted"));
        assert!(matches!(
            game.play(noop_scheduler(), &tunnel),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn test_full_match_winner() {
        let tunnel = MockTunnel::default();
        let mut game = create_test_game(3, 3);
        game.play(noop_scheduler(), &tunnel).unwrap();

        win_round(&mut game, Team::One, &tunnel);
        assert!(matches!(game.state, State::Intermission { completed: 1 }));
        assert_eq!(game.scoreboard.total(Team::One), 27);

        send(&mut game, IncomingMessage::Next, &tunnel);
        win_round(&mut game, Team::Two, &tunnel);
        send(&mut game, IncomingMessage::Next, &tunnel);
        win_round(&mut game, Team::One, &tunnel);

        assert!(matches!(game.state, State::Done(MatchOutcome::Winner(Team::One))));
        assert_eq!(game.scoreboard.total(Team::One), 54);
        assert_eq!(game.scoreboard.total(Team::Two), 27);
        assert!(tunnel.contains("MatchOver"));
        assert!(game.is_done());
    }

    #[test]
    fn test_full_match_tie() {
        let tunnel = MockTunnel::default();
        let mut game = create_test_game(3, 3);
        game.play(noop_scheduler(), &tunnel).unwrap();

        win_round(&mut game, Team::One, &tunnel);
        send(&mut game, IncomingMessage::Next, &tunnel);
        win_round(&mut game, Team::Two, &tunnel);
        send(&mut game, IncomingMessage::Next, &tunnel);
        pointless_round(&mut game, Team::One, &tunnel);

        assert!(matches!(game.state, State::Done(MatchOutcome::Tie)));
        assert_eq!(game.scoreboard.rounds_played(), 3);
    }

    #[test]
    fn test_categories_exhausted_ends_match() {
        let tunnel = MockTunnel::default();
        let mut game = create_test_game(5, 1);
        game.play(noop_scheduler(), &tunnel).unwrap();
        win_round(&mut game, Team::Two, &tunnel);

        let result = game.receive_message(IncomingMessage::Next, noop_scheduler(), &tunnel);
        assert!(matches!(result, Err(Error::NoEligibleCategory)));
        assert!(matches!(game.state, State::Done(MatchOutcome::Winner(Team::Two))));
        assert!(tunnel.contains("\"exhausted\":true"));
        assert!(!tunnel.contains("Rejected"));
    }

    #[test]
    fn test_no_category_at_start() {
        let tunnel = MockTunnel::default();
        let options = Options {
            difficulty: Difficulty::DeathMode,
            ..instant_options(3)
        };
        let mut game = Game::new(options, create_test_deck(3)).unwrap();
        assert!(matches!(
            game.play(noop_scheduler(), &tunnel),
            Err(Error::NoEligibleCategory)
        ));
        assert!(matches!(game.state, State::Done(MatchOutcome::Tie)));
    }

    #[test]
    fn test_invalid_category_rejected() {
        let tunnel = MockTunnel::default();
        let deck = CategoryDeck::new(vec![Category::new("", Difficulty::Easy, vec![])]);
        let mut game = Game::new(instant_options(3), deck).unwrap();
        assert!(matches!(
            game.play(noop_scheduler(), &tunnel),
            Err(Error::InvalidCategory(_))
        ));
    }

    #[test]
    fn test_rejected_action_reported() {
        let tunnel = MockTunnel::default();
        let mut game = create_test_game(3, 3);
        game.play(noop_scheduler(), &tunnel).unwrap();

        let result = game.receive_message(
            IncomingMessage::Guess {
                team: Team::One,
                text: "Alpha".to_string(),
            },
            noop_scheduler(),
            &tunnel,
        );
        assert!(matches!(result, Err(Error::Round(feud::Error::NoActiveTeam))));
        assert!(tunnel.contains("Rejected"));
        assert_eq!(game.round().map(Round::round_points), Some(0));
    }

    #[test]
    fn test_next_during_round_rejected() {
        let tunnel = MockTunnel::default();
        let mut game = create_test_game(3, 3);
        assert!(matches!(
            game.receive_message(IncomingMessage::Buzzed(Team::One), noop_scheduler(), &tunnel),
            Err(Error::InvalidState(_))
        ));
        game.play(noop_scheduler(), &tunnel).unwrap();
        assert!(matches!(
            game.receive_message(IncomingMessage::Next, noop_scheduler(), &tunnel),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn test_skip_category_replaces_round() {
        let tunnel = MockTunnel::default();
        let mut game = create_test_game(3, 3);
        game.play(noop_scheduler(), &tunnel).unwrap();
        let first = game.round().map(Round::id).unwrap();
        let first_label = game.round().map(|r| r.label().to_string()).unwrap();
        assert!(game.can_skip());

        send(&mut game, IncomingMessage::SkipCategory, &tunnel);
        let second = game.round().unwrap();
        assert_ne!(second.id(), first);
        assert_ne!(second.label(), first_label);
        assert_eq!(second.kind(), PhaseKind::FaceOff);
        assert!(matches!(game.state_message(), SyncMessage::Round { number: 1, .. }));
    }

    #[test]
    fn test_cannot_skip_last_category() {
        let tunnel = MockTunnel::default();
        let mut game = create_test_game(3, 1);
        game.play(noop_scheduler(), &tunnel).unwrap();
        assert!(!game.can_skip());
    }

    #[test]
    fn test_skip_without_replacement_ends_match() {
        let tunnel = MockTunnel::default();
        let mut game = create_test_game(3, 1);
        game.play(noop_scheduler(), &tunnel).unwrap();
        tunnel.clear();

        let result = game.receive_message(IncomingMessage::SkipCategory, noop_scheduler(), &tunnel);
        assert!(matches!(result, Err(Error::NoEligibleCategory)));
        assert!(matches!(game.state, State::Done(MatchOutcome::Tie)));
        assert!(tunnel.contains("\"exhausted\":true"));
        assert!(!tunnel.contains("Rejected"));
    }

    #[test]
    fn test_skip_not_allowed_after_face_off() {
        let tunnel = MockTunnel::default();
        let mut game = create_test_game(3, 3);
        game.play(noop_scheduler(), &tunnel).unwrap();
        send(&mut game, IncomingMessage::Buzzed(Team::One), &tunnel);
        send(&mut game, IncomingMessage::Wrong(Team::One), &tunnel);
        send(&mut game, IncomingMessage::Wrong(Team::Two), &tunnel);
        assert!(!game.can_skip());
        assert!(matches!(
            game.receive_message(IncomingMessage::SkipCategory, noop_scheduler(), &tunnel),
            Err(Error::Round(feud::Error::InvalidPhase(PhaseKind::PlayOrPass)))
        ));
    }

    #[test]
    fn test_skip_drops_outstanding_alarms() {
        let tunnel = MockTunnel::default();
        let (scheduled, schedule) = mock_scheduler();
        let options = Options {
            round: RoundOptions {
                minigame: MinigameKind::QuickDraw(QuickDrawOptions::default()),
                ..RoundOptions::instant()
            },
            ..instant_options(3)
        };
        let mut game = Game::new(options, create_test_deck(3)).unwrap();
        game.play(schedule, &tunnel).unwrap();
        let stale = take(&scheduled);
        assert_eq!(stale.len(), 1);

        send(&mut game, IncomingMessage::SkipCategory, &tunnel);
        tunnel.clear();
        game.receive_alarm(&stale[0].0, noop_scheduler(), &tunnel);
        assert!(!tunnel.contains("Draw"));

        send(&mut game, IncomingMessage::Press(Team::One), &tunnel);
        assert_eq!(game.round().and_then(Round::dinger), Some(Team::Two));
    }

    #[test]
    fn test_alarms_drive_round_to_completion() {
        let tunnel = MockTunnel::default();
        let (scheduled, mut schedule) = mock_scheduler();
        let options = Options {
            round: RoundOptions::default(),
            ..instant_options(3)
        };
        let mut game = Game::new(options, create_test_deck(3)).unwrap();
        game.play(&mut schedule, &tunnel).unwrap();

        for message in [
            IncomingMessage::Buzzed(Team::One),
            IncomingMessage::Wrong(Team::One),
            IncomingMessage::Wrong(Team::Two),
            IncomingMessage::Choose {
                team: Team::One,
                choice: Choice::Play,
            },
            IncomingMessage::Wrong(Team::One),
            IncomingMessage::Wrong(Team::One),
            IncomingMessage::Wrong(Team::One),
        ] {
            game.receive_message(message, &mut schedule, &tunnel).unwrap();
        }
        assert_eq!(game.round().map(Round::kind), Some(PhaseKind::MainRound));

        let pending = take(&scheduled);
        assert_eq!(pending.len(), 1);
        game.receive_alarm(&pending[0].0, &mut schedule, &tunnel);
        assert_eq!(game.round().map(Round::kind), Some(PhaseKind::StealAttempt));

        game.receive_message(
            IncomingMessage::Guess {
                team: Team::Two,
                text: "Alpha".to_string(),
            },
            &mut schedule,
            &tunnel,
        )
        .unwrap();
        for _ in 0..2 {
            game.receive_message(IncomingMessage::AdvanceReveal, &mut schedule, &tunnel)
                .unwrap();
        }
        assert_eq!(game.round().map(Round::kind), Some(PhaseKind::RoundReveal));

        let pending = take(&scheduled);
        assert_eq!(pending.len(), 1);
        game.receive_alarm(&pending[0].0, &mut schedule, &tunnel);
        assert!(matches!(game.state, State::Intermission { completed: 1 }));
        assert_eq!(game.scoreboard.total(Team::Two), 10);
        assert_eq!(game.scoreboard.total(Team::One), 0);
    }

    #[test]
    fn test_alarm_for_unknown_round_dropped() {
        let tunnel = MockTunnel::default();
        let mut game = create_test_game(3, 3);
        game.play(noop_scheduler(), &tunnel).unwrap();
        tunnel.clear();
        let alarm: AlarmMessage = round::AlarmMessage::ToFaceOff {
            round: RoundId::new(),
        }
        .into();
        game.receive_alarm(&alarm, noop_scheduler(), &tunnel);
        assert!(tunnel.messages().is_empty());
    }

    #[test]
    fn test_state_message() {
        let tunnel = MockTunnel::default();
        let mut game = create_test_game(3, 3);
        assert!(matches!(game.state_message(), SyncMessage::Waiting { total: 3 }));

        game.play(noop_scheduler(), &tunnel).unwrap();
        match game.state_message() {
            SyncMessage::Round { number, round, .. } => {
                assert_eq!(number, 1);
                assert_eq!(round.phase, PhaseKind::FaceOff);
            }
            other => panic!("unexpected {other:?}"),
        }

        win_round(&mut game, Team::One, &tunnel);
        assert!(matches!(
            game.state_message(),
            SyncMessage::Intermission { completed: 1, .. }
        ));

        game.update_session(&tunnel);
        assert_eq!(tunnel.states().len(), 1);
        assert!(tunnel.states()[0].contains("Intermission"));
    }
}
