//! The round state machine
//!
//! A round walks through a fixed sequence of phases:
//!
//! ```text
//! CategoryReveal → FaceOff → PlayOrPass → MainRound ⇄ StealAttempt → RoundReveal → RoundOver
//! ```
//!
//! Each phase carries only the data that is meaningful in it, so for example
//! strikes exist only during [`Phase::MainRound`] and [`Phase::StealAttempt`]
//! and a choosing team only during [`Phase::PlayOrPass`]. Timed transitions
//! are scheduled as alarms carrying the round's [`RoundId`]; alarms from any
//! other round, or that no longer apply to the current phase, are ignored.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::{
    Error,
    board::{Board, SlotView},
    config::{Category, RoundOptions},
    face_off::{FaceOff, Slot},
    matcher::{AnswerMatcher, ExactMatcher},
    minigame::{Arbiter, BellId},
    strikes::StrikeTracker,
};
use crate::{constants::round::STEAL_STRIKES, round_id::RoundId, session::Tunnel, team::Team};

/// Decision of the team that won the face-off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Choice {
    /// Keep control of the board
    Play,
    /// Hand control of the board to the other team
    Pass,
}

/// The phase of a round without its payload
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum PhaseKind {
    /// The category label is shown
    #[display("category reveal")]
    CategoryReveal,
    /// Teams buzz in and make their opening guesses
    #[display("face-off")]
    FaceOff,
    /// The face-off winner decides who plays
    #[display("play or pass")]
    PlayOrPass,
    /// The active team guesses until the board is cleared or it strikes out
    #[display("main round")]
    MainRound,
    /// The other team gets a single guess to steal the points
    #[display("steal attempt")]
    StealAttempt,
    /// The remaining answers are shown without scoring
    #[display("round reveal")]
    RoundReveal,
    /// The round is finished
    #[display("round over")]
    RoundOver,
}

/// The current phase of a round together with its data
#[derive(Debug, Clone)]
pub enum Phase {
    /// The category label is shown before play starts
    CategoryReveal,
    /// Buzz-in and opening guesses
    FaceOff(FaceOff),
    /// Waiting for the face-off winner to play or pass
    PlayOrPass {
        /// The team that won the face-off
        choosing: Team,
    },
    /// The active team has control of the board
    MainRound {
        /// The team guessing
        active: Team,
        /// Wrong guesses so far
        strikes: StrikeTracker,
    },
    /// The team without control tries to steal
    StealAttempt {
        /// The team attempting the steal
        stealing: Team,
        /// The single strike available to the stealing team
        strikes: StrikeTracker,
        /// Whether the steal guess has been used
        spent: bool,
    },
    /// Remaining answers are exposed one at a time
    RoundReveal {
        /// The team that takes the round points
        winner: Team,
    },
    /// The round has ended
    RoundOver {
        /// The team that takes the round points
        winner: Team,
    },
}

impl Phase {
    /// Returns the payload-free phase discriminant
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::CategoryReveal => PhaseKind::CategoryReveal,
            Self::FaceOff(_) => PhaseKind::FaceOff,
            Self::PlayOrPass { .. } => PhaseKind::PlayOrPass,
            Self::MainRound { .. } => PhaseKind::MainRound,
            Self::StealAttempt { .. } => PhaseKind::StealAttempt,
            Self::RoundReveal { .. } => PhaseKind::RoundReveal,
            Self::RoundOver { .. } => PhaseKind::RoundOver,
        }
    }
}

/// What a finished round hands to the scoreboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// The team awarded the points
    pub winner: Team,
    /// Points scored during the round
    pub points: u64,
}

/// Messages sent to the presentation as the round progresses
#[serde_with::serde_as]
#[skip_serializing_none]
#[derive(Debug, Serialize, Clone)]
pub enum UpdateMessage {
    /// A new round with a hidden board
    CategoryAnnouncement {
        /// Identity of the round
        round: RoundId,
        /// The survey label
        label: String,
        /// Hidden board slots
        board: Vec<SlotView>,
    },
    /// The phase changed
    Phase {
        /// The new phase
        phase: PhaseKind,
        /// The team in control, if any
        active: Option<Team>,
        /// The team deciding whether to play, if any
        choosing: Option<Team>,
    },
    /// A team buzzed in first during the face-off
    Buzzed {
        /// The dinger
        team: Team,
        /// Time from the start of the face-off to the buzz
        #[serde_as(as = "Option<serde_with::DurationMilliSeconds<u64>>")]
        reaction: Option<Duration>,
    },
    /// An answer was turned over
    AnswerRevealed {
        /// The revealed slot
        slot: SlotView,
        /// Whether the answer's points went to the round total
        scored: bool,
        /// Round total after the reveal
        round_points: u64,
    },
    /// A guess did not match any hidden answer
    Miss {
        /// The team that guessed
        team: Team,
    },
    /// The strike count changed
    Strikes {
        /// The team that received the strike
        team: Team,
        /// Strikes so far
        count: usize,
        /// Strikes allowed
        threshold: usize,
    },
}

/// Full snapshot of a round for a freshly attached presentation
#[skip_serializing_none]
#[derive(Debug, Serialize, Clone)]
pub struct SyncMessage {
    /// Identity of the round
    pub round: RoundId,
    /// The survey label
    pub label: String,
    /// Board slots, hidden ones without text
    pub board: Vec<SlotView>,
    /// Points scored so far
    pub round_points: u64,
    /// Current phase
    pub phase: PhaseKind,
    /// Team in control, if any
    pub active: Option<Team>,
    /// Team deciding whether to play, if any
    pub choosing: Option<Team>,
    /// Face-off dinger, if any
    pub dinger: Option<Team>,
    /// Team expected to make the next face-off guess
    pub turn: Option<Team>,
    /// Strikes so far in the current phase
    pub strikes: Option<usize>,
    /// Team taking the round points, once decided
    pub winner: Option<Team>,
}

/// Timed transitions of a round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// The category reveal is over
    ToFaceOff {
        /// Round that scheduled the alarm
        round: RoundId,
    },
    /// The pause after the final strike is over
    StrikeOutSettled {
        /// Round that scheduled the alarm
        round: RoundId,
    },
    /// The pause after a failed steal is over
    StealFailSettled {
        /// Round that scheduled the alarm
        round: RoundId,
    },
    /// Reveal the next answer
    RevealStep {
        /// Round that scheduled the alarm
        round: RoundId,
    },
    /// The pause after the last answer is over
    RevealFinished {
        /// Round that scheduled the alarm
        round: RoundId,
    },
}

impl AlarmMessage {
    /// Returns the round that scheduled this alarm
    pub fn round(&self) -> RoundId {
        match self {
            Self::ToFaceOff { round }
            | Self::StrikeOutSettled { round }
            | Self::StealFailSettled { round }
            | Self::RevealStep { round }
            | Self::RevealFinished { round } => *round,
        }
    }
}

/// One round of a feud match
pub struct Round {
    id: RoundId,
    label: String,
    board: Board,
    round_points: u64,
    phase: Phase,
    options: RoundOptions,
    matcher: Box<dyn AnswerMatcher>,
}

impl fmt::Debug for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Round")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("board", &self.board)
            .field("round_points", &self.round_points)
            .field("phase", &self.phase)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Round {
    /// Creates a round for `category` with a fresh identity and a hidden board
    pub fn new(category: &Category, options: RoundOptions) -> Self {
        Self {
            id: RoundId::new(),
            label: category.label().to_owned(),
            board: category.to_board(),
            round_points: 0,
            phase: Phase::CategoryReveal,
            options,
            matcher: Box::new(ExactMatcher),
        }
    }

    /// Replaces the matcher used to resolve guesses
    #[must_use]
    pub fn with_matcher(mut self, matcher: Box<dyn AnswerMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Identity of this round
    pub fn id(&self) -> RoundId {
        self.id
    }

    /// The survey label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The answer board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Points scored so far
    pub fn round_points(&self) -> u64 {
        self.round_points
    }

    /// The current phase
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The current phase discriminant
    pub fn kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    /// The team in control of the board
    ///
    /// Absent until play or pass is decided. Once the round winner is known
    /// it is the winner.
    pub fn active_team(&self) -> Option<Team> {
        match self.phase {
            Phase::MainRound { active, .. } => Some(active),
            Phase::StealAttempt { stealing, .. } => Some(stealing),
            Phase::RoundReveal { winner } | Phase::RoundOver { winner } => Some(winner),
            Phase::CategoryReveal | Phase::FaceOff(_) | Phase::PlayOrPass { .. } => None,
        }
    }

    /// The face-off winner while it decides to play or pass
    pub fn choosing_team(&self) -> Option<Team> {
        match self.phase {
            Phase::PlayOrPass { choosing } => Some(choosing),
            _ => None,
        }
    }

    /// The face-off dinger while in the face-off
    pub fn dinger(&self) -> Option<Team> {
        match &self.phase {
            Phase::FaceOff(face_off) => face_off.dinger(),
            _ => None,
        }
    }

    /// Strikes in the current phase, zero outside the guessing phases
    pub fn strikes(&self) -> usize {
        match &self.phase {
            Phase::MainRound { strikes, .. } | Phase::StealAttempt { strikes, .. } => {
                strikes.count()
            }
            _ => 0,
        }
    }

    /// The team taking the round points, once decided
    pub fn winner(&self) -> Option<Team> {
        match self.phase {
            Phase::RoundReveal { winner } | Phase::RoundOver { winner } => Some(winner),
            _ => None,
        }
    }

    /// The result of the round once it is over
    pub fn outcome(&self) -> Option<RoundOutcome> {
        match self.phase {
            Phase::RoundOver { winner } => Some(RoundOutcome {
                winner,
                points: self.round_points,
            }),
            _ => None,
        }
    }

    /// Whether the round has reached its terminal phase
    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::RoundOver { .. })
    }

    /// Whether the category may still be swapped for another one
    pub fn can_skip(&self) -> bool {
        matches!(self.phase, Phase::CategoryReveal | Phase::FaceOff(_))
    }

    fn phase_message(&self) -> UpdateMessage {
        UpdateMessage::Phase {
            phase: self.kind(),
            active: self.active_team(),
            choosing: self.choosing_team(),
        }
    }

    fn change_phase<T: Tunnel>(&mut self, phase: Phase, tunnel: &T) {
        log::debug!(
            "round {}: {} -> {}",
            self.id,
            self.phase.kind(),
            phase.kind()
        );
        self.phase = phase;
        tunnel.send_message(&self.phase_message().into());
    }

    fn face_off_mut(&mut self) -> Result<&mut FaceOff, Error> {
        match &mut self.phase {
            Phase::FaceOff(face_off) => Ok(face_off),
            other => Err(Error::InvalidPhase(other.kind())),
        }
    }

    /// Starts the round by announcing the category
    ///
    /// The face-off begins after the configured category reveal, or
    /// immediately if it is zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPhase`] if the round has already moved past
    /// the category reveal.
    pub fn play<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        schedule_message: &mut S,
        tunnel: &T,
    ) -> Result<(), Error> {
        if !matches!(self.phase, Phase::CategoryReveal) {
            return Err(Error::InvalidPhase(self.kind()));
        }

        log::info!("round {} started: {}", self.id, self.label);
        tunnel.send_message(
            &UpdateMessage::CategoryAnnouncement {
                round: self.id,
                label: self.label.clone(),
                board: self.board.view(),
            }
            .into(),
        );
        tunnel.send_message(&self.phase_message().into());

        if self.options.category_reveal.is_zero() {
            self.start_face_off(schedule_message, tunnel);
        } else {
            schedule_message(
                AlarmMessage::ToFaceOff { round: self.id }.into(),
                self.options.category_reveal,
            );
        }
        Ok(())
    }

    fn start_face_off<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        schedule_message: &mut S,
        tunnel: &T,
    ) {
        self.change_phase(
            Phase::FaceOff(FaceOff::new(self.options.minigame.to_minigame())),
            tunnel,
        );
        let id = self.id;
        if let Phase::FaceOff(face_off) = &mut self.phase {
            face_off.minigame_mut().start(id, schedule_message, tunnel);
        }
    }

    /// Records `team` as the face-off dinger
    ///
    /// This is the entry point for buzz-ins arbitrated outside the round.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPhase`] outside the face-off and
    /// [`Error::AlreadyBuzzed`] if the dinger is already known.
    pub fn buzz<T: Tunnel>(&mut self, team: Team, tunnel: &T) -> Result<(), Error> {
        let face_off = self.face_off_mut()?;
        face_off.set_dinger(team)?;
        let reaction = face_off.reaction();

        log::debug!("round {}: {team} buzzed in", self.id);
        tunnel.send_message(&UpdateMessage::Buzzed { team, reaction }.into());
        Ok(())
    }

    /// Forwards a team's button press to the face-off minigame
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPhase`] outside the face-off and
    /// [`Error::AlreadyBuzzed`] if the dinger is already known.
    pub fn press<T: Tunnel>(&mut self, team: Team, tunnel: &T) -> Result<(), Error> {
        let face_off = self.face_off_mut()?;
        if face_off.dinger().is_some() {
            return Err(Error::AlreadyBuzzed);
        }
        let resolved = face_off.minigame_mut().press(team, tunnel);
        match resolved {
            Some(dinger) => self.buzz(dinger, tunnel),
            None => Ok(()),
        }
    }

    /// Forwards a bell strike to the face-off minigame
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPhase`] outside the face-off and
    /// [`Error::AlreadyBuzzed`] if the dinger is already known.
    pub fn strike_bell<T: Tunnel>(&mut self, bell: BellId, tunnel: &T) -> Result<(), Error> {
        let face_off = self.face_off_mut()?;
        if face_off.dinger().is_some() {
            return Err(Error::AlreadyBuzzed);
        }
        let resolved = face_off.minigame_mut().strike(bell, tunnel);
        match resolved {
            Some(dinger) => self.buzz(dinger, tunnel),
            None => Ok(()),
        }
    }

    /// Checks that `team` may guess in the current phase
    fn authorize(&self, team: Team) -> Result<(), Error> {
        match &self.phase {
            Phase::CategoryReveal | Phase::PlayOrPass { .. } => Err(Error::NoActiveTeam),
            Phase::FaceOff(face_off) => face_off.authorize(team),
            Phase::MainRound { active, strikes } => {
                if *active != team {
                    Err(Error::OutOfTurn(team))
                } else if strikes.is_out() {
                    Err(Error::StrikedOut)
                } else {
                    Ok(())
                }
            }
            Phase::StealAttempt {
                stealing, spent, ..
            } => {
                if *stealing != team {
                    Err(Error::OutOfTurn(team))
                } else if *spent {
                    Err(Error::StrikedOut)
                } else {
                    Ok(())
                }
            }
            Phase::RoundReveal { .. } | Phase::RoundOver { .. } => {
                Err(Error::InvalidPhase(self.kind()))
            }
        }
    }

    /// Submits a free text guess for `team`
    ///
    /// # Errors
    ///
    /// * [`Error::NoActiveTeam`] before anyone may guess
    /// * [`Error::OutOfTurn`] if another team is up
    /// * [`Error::StrikedOut`] while control is about to pass
    /// * [`Error::EmptyGuess`] for a blank guess
    /// * [`Error::DuplicateGuess`] if the guess names a revealed answer
    /// * [`Error::InvalidPhase`] once the round winner is known
    pub fn submit_guess<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        team: Team,
        guess: &str,
        schedule_message: &mut S,
        tunnel: &T,
    ) -> Result<(), Error> {
        self.authorize(team)?;

        if guess.trim().is_empty() {
            return Err(Error::EmptyGuess);
        }

        if let Some(answer) = self.board.find_revealed_text(guess) {
            return Err(Error::DuplicateGuess(answer.text.clone()));
        }

        let rank = self.board.match_guess(guess, self.matcher.as_ref());
        if rank.is_none()
            && let Some(answer) = self.board.find_revealed(guess)
        {
            return Err(Error::DuplicateGuess(answer.text.clone()));
        }
        log::debug!("round {}: {team} guessed {guess:?}, matched {rank:?}", self.id);
        self.resolve_guess(team, rank, schedule_message, tunnel)
    }

    /// Records a wrong answer for `team` without a guess
    ///
    /// During the face-off this fills the team's slot with a miss. During the
    /// main round it is a strike, and during a steal it fails the steal.
    ///
    /// # Errors
    ///
    /// Same as [`Round::submit_guess`], except for the guess text checks.
    pub fn declare_wrong<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        team: Team,
        schedule_message: &mut S,
        tunnel: &T,
    ) -> Result<(), Error> {
        self.authorize(team)?;
        log::debug!("round {}: {team} declared wrong", self.id);
        self.resolve_guess(team, None, schedule_message, tunnel)
    }

    fn resolve_guess<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        team: Team,
        rank: Option<usize>,
        schedule_message: &mut S,
        tunnel: &T,
    ) -> Result<(), Error> {
        match self.kind() {
            PhaseKind::FaceOff => self.face_off_guess(team, rank, schedule_message, tunnel),
            PhaseKind::MainRound => {
                self.main_round_guess(team, rank, schedule_message, tunnel);
                Ok(())
            }
            PhaseKind::StealAttempt => {
                self.steal_guess(team, rank, schedule_message, tunnel);
                Ok(())
            }
            kind => Err(Error::InvalidPhase(kind)),
        }
    }

    /// Reveals the answer at `rank`, adding its points when `scored`
    fn reveal_answer<T: Tunnel>(&mut self, rank: usize, scored: bool, tunnel: &T) -> bool {
        let Some(points) = self.board.reveal(rank).map(|answer| answer.points) else {
            return false;
        };
        if scored {
            self.round_points = self.round_points.saturating_add(points);
        }
        if let Some(slot) = self.board.view().into_iter().nth(rank) {
            tunnel.send_message(
                &UpdateMessage::AnswerRevealed {
                    slot,
                    scored,
                    round_points: self.round_points,
                }
                .into(),
            );
        }
        true
    }

    /// Reveals and scores a match, or announces a miss
    fn score_or_miss<T: Tunnel>(&mut self, team: Team, rank: Option<usize>, tunnel: &T) -> bool {
        let matched = rank.is_some_and(|rank| self.reveal_answer(rank, true, tunnel));
        if !matched {
            tunnel.send_message(&UpdateMessage::Miss { team }.into());
        }
        matched
    }

    fn face_off_guess<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        team: Team,
        rank: Option<usize>,
        schedule_message: &mut S,
        tunnel: &T,
    ) -> Result<(), Error> {
        let slot = rank
            .and_then(|rank| self.board.answers().get(rank))
            .map_or(Slot::Missed, |slot| Slot::Matched(slot.answer.points));

        self.face_off_mut()?.record(team, slot)?;
        self.score_or_miss(team, rank, tunnel);

        let winner = self.face_off_mut()?.winner();
        if let Some(winner) = winner {
            log::debug!("round {}: {winner} won the face-off", self.id);
            if self.board.is_cleared() {
                self.enter_reveal(winner, schedule_message, tunnel);
            } else {
                self.change_phase(Phase::PlayOrPass { choosing: winner }, tunnel);
            }
        }
        Ok(())
    }

    fn main_round_guess<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        team: Team,
        rank: Option<usize>,
        schedule_message: &mut S,
        tunnel: &T,
    ) {
        if self.score_or_miss(team, rank, tunnel) {
            if self.board.is_cleared() {
                self.enter_reveal(team, schedule_message, tunnel);
            }
            return;
        }

        let Phase::MainRound { strikes, .. } = &mut self.phase else {
            return;
        };
        let out = strikes.record();
        let (count, threshold) = (strikes.count(), strikes.threshold());
        tunnel.send_message(
            &UpdateMessage::Strikes {
                team,
                count,
                threshold,
            }
            .into(),
        );

        if out {
            log::debug!("round {}: {team} struck out", self.id);
            if self.options.strike_out_settle.is_zero() {
                self.enter_steal(tunnel);
            } else {
                schedule_message(
                    AlarmMessage::StrikeOutSettled { round: self.id }.into(),
                    self.options.strike_out_settle,
                );
            }
        }
    }

    fn enter_steal<T: Tunnel>(&mut self, tunnel: &T) {
        let Phase::MainRound { active, strikes } = self.phase else {
            return;
        };
        if !strikes.is_out() {
            return;
        }
        self.change_phase(
            Phase::StealAttempt {
                stealing: active.other(),
                strikes: StrikeTracker::new(STEAL_STRIKES),
                spent: false,
            },
            tunnel,
        );
    }

    fn steal_guess<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        team: Team,
        rank: Option<usize>,
        schedule_message: &mut S,
        tunnel: &T,
    ) {
        if self.score_or_miss(team, rank, tunnel) {
            log::debug!("round {}: {team} stole the round", self.id);
            self.enter_reveal(team, schedule_message, tunnel);
            return;
        }

        let Phase::StealAttempt { strikes, spent, .. } = &mut self.phase else {
            return;
        };
        strikes.record();
        *spent = true;
        let (count, threshold) = (strikes.count(), strikes.threshold());
        tunnel.send_message(
            &UpdateMessage::Strikes {
                team,
                count,
                threshold,
            }
            .into(),
        );

        if self.options.steal_fail_settle.is_zero() {
            self.enter_reveal(team.other(), schedule_message, tunnel);
        } else {
            schedule_message(
                AlarmMessage::StealFailSettled { round: self.id }.into(),
                self.options.steal_fail_settle,
            );
        }
    }

    /// Lets the face-off winner play or pass
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPhase`] outside play or pass and
    /// [`Error::OutOfTurn`] if `team` did not win the face-off.
    pub fn choose<T: Tunnel>(&mut self, team: Team, choice: Choice, tunnel: &T) -> Result<(), Error> {
        let Phase::PlayOrPass { choosing } = self.phase else {
            return Err(Error::InvalidPhase(self.kind()));
        };
        if choosing != team {
            return Err(Error::OutOfTurn(team));
        }

        let active = match choice {
            Choice::Play => choosing,
            Choice::Pass => choosing.other(),
        };
        log::debug!("round {}: {team} chose {choice:?}", self.id);
        self.change_phase(
            Phase::MainRound {
                active,
                strikes: StrikeTracker::new(self.options.max_strikes),
            },
            tunnel,
        );
        Ok(())
    }

    fn enter_reveal<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        winner: Team,
        schedule_message: &mut S,
        tunnel: &T,
    ) {
        self.change_phase(Phase::RoundReveal { winner }, tunnel);

        if self.board.is_cleared() {
            self.schedule_finish(schedule_message, tunnel);
        } else if let Some(interval) = self.options.auto_reveal {
            schedule_message(AlarmMessage::RevealStep { round: self.id }.into(), interval);
        }
    }

    /// Shows the highest scoring hidden answer without adding its points
    ///
    /// Revealing the last hidden answer ends the round after the configured
    /// pause.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPhase`] outside the round reveal or when
    /// nothing is left to reveal.
    pub fn advance_reveal<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        schedule_message: &mut S,
        tunnel: &T,
    ) -> Result<(), Error> {
        self.reveal_step(false, schedule_message, tunnel)
    }

    fn reveal_step<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        automatic: bool,
        schedule_message: &mut S,
        tunnel: &T,
    ) -> Result<(), Error> {
        if !matches!(self.phase, Phase::RoundReveal { .. }) {
            return Err(Error::InvalidPhase(self.kind()));
        }
        let Some(rank) = self.board.next_hidden() else {
            return Err(Error::InvalidPhase(self.kind()));
        };

        self.reveal_answer(rank, false, tunnel);

        if self.board.is_cleared() {
            self.schedule_finish(schedule_message, tunnel);
        } else if let Some(interval) = self.options.auto_reveal.filter(|_| automatic) {
            schedule_message(AlarmMessage::RevealStep { round: self.id }.into(), interval);
        }
        Ok(())
    }

    fn schedule_finish<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        schedule_message: &mut S,
        tunnel: &T,
    ) {
        if self.options.reveal_finish.is_zero() {
            self.finish(tunnel);
        } else {
            schedule_message(
                AlarmMessage::RevealFinished { round: self.id }.into(),
                self.options.reveal_finish,
            );
        }
    }

    fn finish<T: Tunnel>(&mut self, tunnel: &T) {
        let Phase::RoundReveal { winner } = self.phase else {
            return;
        };
        log::info!(
            "round {} over: {winner} takes {} points",
            self.id,
            self.round_points
        );
        self.change_phase(Phase::RoundOver { winner }, tunnel);
    }

    /// Handles a timed event scheduled by this round or its minigame
    ///
    /// Alarms from other rounds, and alarms that no longer apply to the
    /// current phase, are ignored.
    pub fn receive_alarm<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        message: &crate::AlarmMessage,
        schedule_message: &mut S,
        tunnel: &T,
    ) {
        if message.round() != self.id {
            log::debug!("round {}: ignoring alarm for {}", self.id, message.round());
            return;
        }

        match message {
            crate::AlarmMessage::Minigame(alarm) => {
                let Phase::FaceOff(face_off) = &mut self.phase else {
                    return;
                };
                if face_off.dinger().is_some() {
                    return;
                }
                let resolved = face_off
                    .minigame_mut()
                    .receive_alarm(alarm, schedule_message, tunnel);
                if let Some(dinger) = resolved
                    && let Err(error) = self.buzz(dinger, tunnel)
                {
                    log::debug!("round {}: minigame buzz rejected: {error}", self.id);
                }
            }
            crate::AlarmMessage::Round(alarm) => match alarm {
                AlarmMessage::ToFaceOff { .. } => {
                    if matches!(self.phase, Phase::CategoryReveal) {
                        self.start_face_off(schedule_message, tunnel);
                    }
                }
                AlarmMessage::StrikeOutSettled { .. } => self.enter_steal(tunnel),
                AlarmMessage::StealFailSettled { .. } => {
                    if let Phase::StealAttempt {
                        stealing,
                        spent: true,
                        ..
                    } = self.phase
                    {
                        self.enter_reveal(stealing.other(), schedule_message, tunnel);
                    }
                }
                AlarmMessage::RevealStep { .. } => {
                    if let Err(error) = self.reveal_step(true, schedule_message, tunnel) {
                        log::debug!("round {}: reveal step skipped: {error}", self.id);
                    }
                }
                AlarmMessage::RevealFinished { .. } => self.finish(tunnel),
            },
        }
    }

    /// Returns a full snapshot of the round
    pub fn state_message(&self) -> SyncMessage {
        let (dinger, turn) = match &self.phase {
            Phase::FaceOff(face_off) => (face_off.dinger(), face_off.turn()),
            _ => (None, None),
        };
        let strikes = match self.phase {
            Phase::MainRound { .. } | Phase::StealAttempt { .. } => Some(self.strikes()),
            _ => None,
        };

        SyncMessage {
            round: self.id,
            label: self.label.clone(),
            board: self.board.view(),
            round_points: self.round_points,
            phase: self.kind(),
            active: self.active_team(),
            choosing: self.choosing_team(),
            dinger,
            turn,
            strikes,
            winner: self.winner(),
        }
    }
}
