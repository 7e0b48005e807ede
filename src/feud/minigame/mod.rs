//! Face-off buzz-in minigames
//!
//! Before the face-off guesses, the two teams race to buzz in. Who wins the
//! race is decided by an [`Arbiter`]. There are three interchangeable
//! interaction models, selected per match through [`MinigameKind`]:
//!
//! * [`Classic`]: each team has its own button, the first press wins
//! * [`TeleportingBell`]: a bell jumps around the screen and its position at
//!   the moment it is struck decides the team
//! * [`QuickDraw`]: pressing before a randomly delayed signal loses, pressing
//!   after it wins
//!
//! Every arbiter resolves to exactly one team exactly once. Anything that
//! arrives after resolution is ignored.

pub mod bell;
pub mod classic;
pub mod quick_draw;

use std::time::Duration;

use garde::Validate;
use serde::{Deserialize, Serialize};

pub use bell::{BellId, BellOptions, BellPosition, TeleportingBell};
pub use classic::Classic;
pub use quick_draw::{QuickDraw, QuickDrawOptions};

use crate::{round_id::RoundId, session::Tunnel, team::Team};

/// Presentation cues describing the minigame's progress
#[derive(Debug, Clone, Serialize)]
pub enum UpdateMessage {
    /// The minigame has started and is in its hidden "get ready" period
    GetReady,
    /// A new bell has appeared
    BellSpawned(BellPosition),
    /// All bells have moved to new positions
    BellsMoved(Vec<BellPosition>),
    /// The quick draw signal fired, presses now win
    Draw,
    /// A team pressed before the quick draw signal and forfeited
    FalseStart(Team),
}

/// Timed events of the minigames
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// The hidden period is over, the first bell appears
    BellVisible {
        /// Round that scheduled the alarm
        round: RoundId,
    },
    /// The bells stop being static and start relocating
    BellsStartMoving {
        /// Round that scheduled the alarm
        round: RoundId,
    },
    /// Every bell relocates
    BellsRelocate {
        /// Round that scheduled the alarm
        round: RoundId,
    },
    /// Another bell spawns
    BellSpawn {
        /// Round that scheduled the alarm
        round: RoundId,
    },
    /// The quick draw signal fires
    DrawSignal {
        /// Round that scheduled the alarm
        round: RoundId,
    },
}

impl AlarmMessage {
    /// Returns the round that scheduled this alarm
    pub fn round(&self) -> RoundId {
        match self {
            Self::BellVisible { round }
            | Self::BellsStartMoving { round }
            | Self::BellsRelocate { round }
            | Self::BellSpawn { round }
            | Self::DrawSignal { round } => *round,
        }
    }
}

/// Common interface of the buzz-in interaction models
///
/// Methods returning `Option<Team>` yield `Some` exactly once, when the
/// interaction resolves.
pub trait Arbiter {
    /// Starts the interaction, scheduling any timers it needs
    fn start<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        round: RoundId,
        schedule_message: &mut S,
        tunnel: &T,
    );

    /// Handles a team pressing its own control
    fn press<T: Tunnel>(&mut self, team: Team, tunnel: &T) -> Option<Team>;

    /// Handles a bell being struck, ignored by models without bells
    fn strike<T: Tunnel>(&mut self, _bell: BellId, _tunnel: &T) -> Option<Team> {
        None
    }

    /// Handles a timed event scheduled by [`Arbiter::start`]
    fn receive_alarm<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        _message: &AlarmMessage,
        _schedule_message: &mut S,
        _tunnel: &T,
    ) -> Option<Team> {
        None
    }

    /// Returns the winner once resolved
    fn winner(&self) -> Option<Team>;
}

/// Records the first resolution and ignores every later one
pub(crate) fn resolve_once(winner: &mut Option<Team>, team: Team) -> Option<Team> {
    if winner.is_some() {
        return None;
    }
    *winner = Some(team);
    Some(team)
}

/// Which buzz-in interaction model a round uses
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub enum MinigameKind {
    /// First team to press its own button wins
    #[default]
    Classic,
    /// Teams race to strike a relocating bell on their side of the screen
    TeleportingBell(#[garde(dive)] BellOptions),
    /// Teams wait for a randomly delayed signal, pressing early loses
    QuickDraw(#[garde(dive)] QuickDrawOptions),
}

impl MinigameKind {
    /// Creates a fresh arbiter of this kind
    pub fn to_minigame(&self) -> Minigame {
        match self {
            Self::Classic => Minigame::Classic(Classic::default()),
            Self::TeleportingBell(options) => {
                Minigame::TeleportingBell(TeleportingBell::new(options.clone()))
            }
            Self::QuickDraw(options) => Minigame::QuickDraw(QuickDraw::new(options.clone())),
        }
    }
}

/// A running buzz-in interaction
#[derive(Debug, Clone, derive_more::From)]
pub enum Minigame {
    /// Simultaneous choice
    Classic(Classic),
    /// Spatial race
    TeleportingBell(TeleportingBell),
    /// Reaction race
    QuickDraw(QuickDraw),
}

impl Arbiter for Minigame {
    fn start<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        round: RoundId,
        schedule_message: &mut S,
        tunnel: &T,
    ) {
        match self {
            Self::Classic(c) => c.start(round, schedule_message, tunnel),
            Self::TeleportingBell(b) => b.start(round, schedule_message, tunnel),
            Self::QuickDraw(q) => q.start(round, schedule_message, tunnel),
        }
    }

    fn press<T: Tunnel>(&mut self, team: Team, tunnel: &T) -> Option<Team> {
        match self {
            Self::Classic(c) => c.press(team, tunnel),
            Self::TeleportingBell(b) => b.press(team, tunnel),
            Self::QuickDraw(q) => q.press(team, tunnel),
        }
    }

    fn strike<T: Tunnel>(&mut self, bell: BellId, tunnel: &T) -> Option<Team> {
        match self {
            Self::Classic(c) => c.strike(bell, tunnel),
            Self::TeleportingBell(b) => b.strike(bell, tunnel),
            Self::QuickDraw(q) => q.strike(bell, tunnel),
        }
    }

    fn receive_alarm<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        message: &AlarmMessage,
        schedule_message: &mut S,
        tunnel: &T,
    ) -> Option<Team> {
        match self {
            Self::Classic(c) => c.receive_alarm(message, schedule_message, tunnel),
            Self::TeleportingBell(b) => b.receive_alarm(message, schedule_message, tunnel),
            Self::QuickDraw(q) => q.receive_alarm(message, schedule_message, tunnel),
        }
    }

    fn winner(&self) -> Option<Team> {
        match self {
            Self::Classic(c) => c.winner(),
            Self::TeleportingBell(b) => b.winner(),
            Self::QuickDraw(q) => q.winner(),
        }
    }
}
