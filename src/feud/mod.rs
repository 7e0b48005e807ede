//! Round level game logic
//!
//! This module contains everything that happens within a single round of a
//! feud match: the answer board, guess matching, strike counting, the
//! face-off and its buzz-in minigames, and the round state machine tying
//! them together.

use serde::Serialize;
use thiserror::Error;

use crate::team::Team;

pub mod board;
pub mod config;
pub mod face_off;
pub mod matcher;
pub mod minigame;
pub mod round;
pub mod strikes;

use round::PhaseKind;

/// Reasons an action is rejected by a round
///
/// A rejected action never changes the phase, the strikes, or the round
/// points, and can simply be resubmitted once valid.
#[derive(Error, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The guess spells an answer that is already showing
    #[error("{0} is already on the board!")]
    DuplicateGuess(String),
    /// Nobody is allowed to guess right now
    #[error("no team is up to guess yet")]
    NoActiveTeam,
    /// The acting team is not the one whose turn it is
    #[error("it is not {0}'s turn")]
    OutOfTurn(Team),
    /// The guess is blank
    #[error("guess is empty")]
    EmptyGuess,
    /// The action does not apply to the current phase
    #[error("not allowed during {0}")]
    InvalidPhase(PhaseKind),
    /// The team has used up its strikes and is waiting for control to pass
    #[error("out of strikes")]
    StrikedOut,
    /// The face-off buzz-in has already been decided
    #[error("someone already buzzed in")]
    AlreadyBuzzed,
}
