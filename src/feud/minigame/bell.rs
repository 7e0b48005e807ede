//! Spatial race buzz-in
//!
//! The bell stays hidden for a ready period, appears and sits still for a
//! moment, then teleports to a random spot at a fixed interval. More bells
//! join over time up to a cap, each one arriving sooner than the last. A bell
//! left of the center line belongs to Team 1 and a bell right of it to
//! Team 2; the side is read from the bell's position at the moment it is
//! struck.

use std::time::Duration;

use garde::Validate;
use serde::{Deserialize, Serialize};

use super::{AlarmMessage, Arbiter, UpdateMessage, resolve_once};
use crate::{
    constants::minigame::*,
    feud::config::{validate_duration, validate_interval},
    round_id::RoundId,
    session::Tunnel,
    team::Team,
};

/// Identifies one bell within a face-off
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub struct BellId(pub usize);

/// Where a bell currently is, in percent of the play area
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BellPosition {
    /// Which bell
    pub id: BellId,
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

impl BellPosition {
    /// The team whose side of the center line the bell is on
    pub fn side(&self) -> Team {
        if self.x < CENTER_LINE {
            Team::One
        } else {
            Team::Two
        }
    }
}

fn default_ready_delay() -> Duration {
    Duration::from_millis(READY_DELAY_MS)
}

fn default_static_period() -> Duration {
    Duration::from_millis(STATIC_PERIOD_MS)
}

fn default_relocate_interval() -> Duration {
    Duration::from_millis(RELOCATE_INTERVAL_MS)
}

fn default_spawn_interval() -> Duration {
    Duration::from_millis(SPAWN_INTERVAL_MS)
}

fn default_spawn_step() -> Duration {
    Duration::from_millis(SPAWN_STEP_MS)
}

fn default_min_spawn_interval() -> Duration {
    Duration::from_millis(MIN_SPAWN_INTERVAL_MS)
}

fn default_max_bells() -> usize {
    MAX_BELLS
}

/// Pacing of the teleporting bell
#[serde_with::serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BellOptions {
    /// Time the bell stays hidden after the face-off starts
    #[garde(custom(validate_duration::<0, MAX_DELAY>))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(default = "default_ready_delay")]
    pub ready_delay: Duration,
    /// Time the first bell stays still once visible
    #[garde(custom(validate_duration::<0, MAX_DELAY>))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(default = "default_static_period")]
    pub static_period: Duration,
    /// Time between relocations
    #[garde(custom(validate_interval::<MAX_DELAY>))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(default = "default_relocate_interval")]
    pub relocate_interval: Duration,
    /// Time before the second bell spawns
    #[garde(custom(validate_interval::<MAX_DELAY>))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(default = "default_spawn_interval")]
    pub spawn_interval: Duration,
    /// How much sooner each further bell spawns
    #[garde(custom(validate_duration::<0, MAX_DELAY>))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(default = "default_spawn_step")]
    pub spawn_step: Duration,
    /// Floor of the spawn interval
    #[garde(custom(validate_interval::<MAX_DELAY>))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(default = "default_min_spawn_interval")]
    pub min_spawn_interval: Duration,
    /// Most bells on screen at once
    #[garde(range(min = 1, max = MAX_BELLS_LIMIT))]
    #[serde(default = "default_max_bells")]
    pub max_bells: usize,
}

impl Default for BellOptions {
    fn default() -> Self {
        Self {
            ready_delay: default_ready_delay(),
            static_period: default_static_period(),
            relocate_interval: default_relocate_interval(),
            spawn_interval: default_spawn_interval(),
            spawn_step: default_spawn_step(),
            min_spawn_interval: default_min_spawn_interval(),
            max_bells: default_max_bells(),
        }
    }
}

/// Bells that teleport around the screen until one is struck
#[derive(Debug, Clone)]
pub struct TeleportingBell {
    options: BellOptions,
    rng: fastrand::Rng,
    visible: bool,
    moving: bool,
    bells: Vec<BellPosition>,
    next_id: usize,
    winner: Option<Team>,
}

impl TeleportingBell {
    /// Creates a bell race with a randomly seeded generator
    pub fn new(options: BellOptions) -> Self {
        Self::with_rng(options, fastrand::Rng::new())
    }

    /// Creates a bell race with the given generator
    pub fn with_rng(options: BellOptions, rng: fastrand::Rng) -> Self {
        Self {
            options,
            rng,
            visible: false,
            moving: false,
            bells: Vec::new(),
            next_id: 0,
            winner: None,
        }
    }

    /// Whether the ready period is over
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the bells have started relocating
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Current bell positions
    pub fn bells(&self) -> &[BellPosition] {
        &self.bells
    }

    fn random_position(&mut self, id: BellId) -> BellPosition {
        let (min_x, max_x) = BELL_X_RANGE;
        let (min_y, max_y) = BELL_Y_RANGE;
        BellPosition {
            id,
            x: min_x + self.rng.f64() * (max_x - min_x),
            y: min_y + self.rng.f64() * (max_y - min_y),
        }
    }

    /// Delay until the next bell spawns given how many already exist
    fn spawn_delay(&self) -> Duration {
        let extra = u32::try_from(self.bells.len().saturating_sub(1)).unwrap_or(u32::MAX);
        self.options
            .spawn_interval
            .saturating_sub(self.options.spawn_step.saturating_mul(extra))
            .max(self.options.min_spawn_interval)
    }

    fn spawn<T: Tunnel>(&mut self, tunnel: &T) {
        let id = BellId(self.next_id);
        self.next_id += 1;
        let bell = self.random_position(id);
        log::debug!("bell {id} spawned at ({:.0}, {:.0})", bell.x, bell.y);
        tunnel.send_message(&UpdateMessage::BellSpawned(bell.clone()).into());
        self.bells.push(bell);
    }

    fn schedule_spawn<S: FnMut(crate::AlarmMessage, Duration)>(
        &self,
        round: RoundId,
        schedule_message: &mut S,
    ) {
        if self.bells.len() < self.options.max_bells {
            schedule_message(AlarmMessage::BellSpawn { round }.into(), self.spawn_delay());
        }
    }

    fn show<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        round: RoundId,
        schedule_message: &mut S,
        tunnel: &T,
    ) {
        if self.visible {
            return;
        }
        self.visible = true;
        self.spawn(tunnel);

        if self.options.static_period.is_zero() {
            self.start_moving(round, schedule_message);
        } else {
            schedule_message(
                AlarmMessage::BellsStartMoving { round }.into(),
                self.options.static_period,
            );
        }

        self.schedule_spawn(round, schedule_message);
    }

    fn start_moving<S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        round: RoundId,
        schedule_message: &mut S,
    ) {
        if self.moving {
            return;
        }
        self.moving = true;
        schedule_message(
            AlarmMessage::BellsRelocate { round }.into(),
            self.options.relocate_interval,
        );
    }

    fn relocate<T: Tunnel>(&mut self, tunnel: &T) {
        let ids: Vec<BellId> = self.bells.iter().map(|bell| bell.id).collect();
        let moved = ids.into_iter().map(|id| self.random_position(id)).collect();
        self.bells = moved;
        tunnel.send_message(&UpdateMessage::BellsMoved(self.bells.clone()).into());
    }
}

impl Arbiter for TeleportingBell {
    fn start<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        round: RoundId,
        schedule_message: &mut S,
        tunnel: &T,
    ) {
        tunnel.send_message(&UpdateMessage::GetReady.into());

        if self.options.ready_delay.is_zero() {
            self.show(round, schedule_message, tunnel);
        } else {
            schedule_message(
                AlarmMessage::BellVisible { round }.into(),
                self.options.ready_delay,
            );
        }
    }

    fn press<T: Tunnel>(&mut self, _team: Team, _tunnel: &T) -> Option<Team> {
        None
    }

    fn strike<T: Tunnel>(&mut self, bell: BellId, _tunnel: &T) -> Option<Team> {
        if !self.visible {
            return None;
        }
        let side = self.bells.iter().find(|b| b.id == bell)?.side();
        resolve_once(&mut self.winner, side)
    }

    fn receive_alarm<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        message: &AlarmMessage,
        schedule_message: &mut S,
        tunnel: &T,
    ) -> Option<Team> {
        if self.winner.is_some() {
            return None;
        }

        let round = message.round();
        match message {
            AlarmMessage::BellVisible { .. } => self.show(round, schedule_message, tunnel),
            AlarmMessage::BellsStartMoving { .. } => self.start_moving(round, schedule_message),
            AlarmMessage::BellsRelocate { .. } => {
                self.relocate(tunnel);
                schedule_message(
                    AlarmMessage::BellsRelocate { round }.into(),
                    self.options.relocate_interval,
                );
            }
            AlarmMessage::BellSpawn { .. } => {
                if self.visible && self.bells.len() < self.options.max_bells {
                    self.spawn(tunnel);
                    self.schedule_spawn(round, schedule_message);
                }
            }
            AlarmMessage::DrawSignal { .. } => {}
        }
        None
    }

    fn winner(&self) -> Option<Team> {
        self.winner
    }
}
