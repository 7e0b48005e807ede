//! Simultaneous choice buzz-in
//!
//! Each team presses its own button; whoever presses first wins and every
//! later press is ignored.

use std::time::Duration;

use super::{Arbiter, resolve_once};
use crate::{round_id::RoundId, session::Tunnel, team::Team};

/// First press wins
#[derive(Debug, Clone, Default)]
pub struct Classic {
    winner: Option<Team>,
}

impl Arbiter for Classic {
    fn start<T: Tunnel, S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        _round: RoundId,
        _schedule_message: &mut S,
        tunnel: &T,
    ) {
        tunnel.send_message(&super::UpdateMessage::GetReady.into());
    }

    fn press<T: Tunnel>(&mut self, team: Team, _tunnel: &T) -> Option<Team> {
        resolve_once(&mut self.winner, team)
    }

    fn winner(&self) -> Option<Team> {
        self.winner
    }
}
