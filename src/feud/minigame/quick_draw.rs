//! Reaction race buzz-in
//!
//! After a random wait a "draw" signal fires. A team that presses before the
//! signal forfeits the face-off to the other team; the first press at or
//! after the signal wins.

use std::time::Duration;

use garde::Validate;
use serde::{Deserialize, Serialize};

use super::{AlarmMessage, Arbiter, UpdateMessage, resolve_once};
use crate::{
    constants::minigame::*,
    feud::config::validate_duration,
    round_id::RoundId,
    session::Tunnel,
    team::Team,
};

fn default_min_delay() -> Duration {
    Duration::from_millis(MIN_DRAW_DELAY_MS)
}

fn default_spread() -> Duration {
    Duration::from_millis(MAX_DRAW_DELAY_MS - MIN_DRAW_DELAY_MS)
}

/// Timing of the quick draw signal
///
/// The signal fires after a delay drawn uniformly from
/// `[min_delay, min_delay + spread]`.
#[serde_with::serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuickDrawOptions {
    /// Shortest possible wait before the signal
    #[garde(custom(validate_duration::<0, MAX_DELAY>))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(default = "default_min_delay")]
    pub min_delay: Duration,
    /// Width of the random window added to the shortest wait
    #[garde(custom(validate_duration::<0, MAX_DELAY>))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(default = "default_spread")]
    pub spread: Duration,
}

impl Default for QuickDrawOptions {
    fn default() -> Self {
        Self {
            min_delay: default_min_delay(),
            spread: default_spread(),
        }
    }
}

/// Early presses lose, the first press after the signal wins
#[derive(Debug, Clone)]
pub struct QuickDraw {
    options: QuickDrawOptions,
    rng: fastrand::Rng,
    drawn: bool,
    winner: Option<Team>,
}

impl QuickDraw {
    /// Creates a quick draw with a randomly seeded generator
    pub fn new(options: QuickDrawOptions) -> Self {
        Self::with_rng(options, fastrand::Rng::new())
    }

    /// Creates a quick draw with the given generator
    pub fn with_rng(options: QuickDrawOptions, rng: fastrand::Rng) -> Self {
        Self {
            options,
            rng,
            drawn: false,
            winner: None,
        }
    }

    /// Whether the signal has fired
    pub fn is_drawn(&self) -> bool {
        self.drawn
    }

    fn draw_delay(&mut self) -> Duration {
        let spread = u64::try_from(self.options.spread.as_millis()).unwrap_or(u64::MAX);
        self.options.min_delay + Duration::from_millis(self.rng.u64(0..=spread))
    }
}

impl Arbiter for QuickDraw {
    fn start<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        round: RoundId,
        schedule_message: &mut S,
        tunnel: &T,
    ) {
        tunnel.send_message(&UpdateMessage::GetReady.into());
        let delay = self.draw_delay();
        log::debug!("quick draw signal in {delay:?}");
        schedule_message(AlarmMessage::DrawSignal { round }.into(), delay);
    }

    fn press<T: Tunnel>(&mut self, team: Team, tunnel: &T) -> Option<Team> {
        if self.winner.is_some() {
            return None;
        }

        if self.drawn {
            resolve_once(&mut self.winner, team)
        } else {
            tunnel.send_message(&UpdateMessage::FalseStart(team).into());
            resolve_once(&mut self.winner, team.other())
        }
    }

    fn receive_alarm<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        message: &AlarmMessage,
        _schedule_message: &mut S,
        tunnel: &T,
    ) -> Option<Team> {
        if matches!(message, AlarmMessage::DrawSignal { .. })
            && self.winner.is_none()
            && !self.drawn
        {
            self.drawn = true;
            tunnel.send_message(&UpdateMessage::Draw.into());
        }
        None
    }

    fn winner(&self) -> Option<Team> {
        self.winner
    }
}
