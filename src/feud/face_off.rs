//! Face-off state and resolution
//!
//! The buzz-in winner (the dinger) guesses first, then the other team. Each
//! guess fills a write-once slot. Once both slots are filled [`resolve`]
//! decides which team gets to choose between playing and passing.

use enum_map::EnumMap;
use serde::Serialize;
use web_time::{Duration, SystemTime};

use super::{Error, minigame::Minigame};
use crate::team::Team;

/// Outcome of one team's face-off guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Slot {
    /// The guess matched an answer worth this many points
    Matched(u64),
    /// The guess did not match, or the team declined to guess
    Missed,
}

/// Decides which team wins the face-off
///
/// The rules are applied from the dinger's point of view so the result does
/// not depend on which concrete team buzzed:
///
/// | dinger | other | winner |
/// |---|---|---|
/// | matched | missed | dinger |
/// | missed | matched | other |
/// | missed | missed | dinger |
/// | matched `a` | matched `b` | higher points, dinger on a tie |
pub fn resolve(dinger: Team, dinger_slot: Slot, other_slot: Slot) -> Team {
    match (dinger_slot, other_slot) {
        (Slot::Missed, Slot::Matched(_)) => dinger.other(),
        (Slot::Matched(a), Slot::Matched(b)) if b > a => dinger.other(),
        _ => dinger,
    }
}

/// Payload of the face-off phase
#[derive(Debug, Clone)]
pub struct FaceOff {
    minigame: Minigame,
    started: SystemTime,
    dinger: Option<Team>,
    reaction: Option<Duration>,
    slots: EnumMap<Team, Option<Slot>>,
}

impl FaceOff {
    /// Creates a face-off waiting for the buzz-in
    pub fn new(minigame: Minigame) -> Self {
        Self {
            minigame,
            started: SystemTime::now(),
            dinger: None,
            reaction: None,
            slots: EnumMap::default(),
        }
    }

    pub(crate) fn minigame_mut(&mut self) -> &mut Minigame {
        &mut self.minigame
    }

    /// The team that buzzed in first, if any
    pub fn dinger(&self) -> Option<Team> {
        self.dinger
    }

    /// How long after the face-off began the dinger buzzed in
    pub fn reaction(&self) -> Option<Duration> {
        self.reaction
    }

    /// Records the dinger
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyBuzzed`] if a dinger is already set.
    pub fn set_dinger(&mut self, team: Team) -> Result<(), Error> {
        if self.dinger.is_some() {
            return Err(Error::AlreadyBuzzed);
        }
        self.dinger = Some(team);
        self.reaction = Some(self.started.elapsed().unwrap_or_default());
        Ok(())
    }

    /// The team expected to guess next
    pub fn turn(&self) -> Option<Team> {
        let dinger = self.dinger?;
        [dinger, dinger.other()]
            .into_iter()
            .find(|team| self.slots[*team].is_none())
    }

    /// Checks that `team` may guess now
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoActiveTeam`] before the buzz-in and
    /// [`Error::OutOfTurn`] if it is the other team's turn.
    pub fn authorize(&self, team: Team) -> Result<(), Error> {
        match self.turn() {
            None => Err(Error::NoActiveTeam),
            Some(turn) if turn != team => Err(Error::OutOfTurn(team)),
            Some(_) => Ok(()),
        }
    }

    /// Fills the current team's slot
    ///
    /// # Errors
    ///
    /// See [`FaceOff::authorize`].
    pub fn record(&mut self, team: Team, slot: Slot) -> Result<(), Error> {
        self.authorize(team)?;
        self.slots[team] = Some(slot);
        Ok(())
    }

    /// The recorded result of `team`
    pub fn slot(&self, team: Team) -> Option<Slot> {
        self.slots[team]
    }

    /// The face-off winner once both teams have guessed
    pub fn winner(&self) -> Option<Team> {
        let dinger = self.dinger?;
        Some(resolve(
            dinger,
            self.slots[dinger]?,
            self.slots[dinger.other()]?,
        ))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::feud::minigame::Classic;

    fn create_test_face_off(dinger: Team) -> FaceOff {
        let mut face_off = FaceOff::new(Classic::default().into());
        face_off.set_dinger(dinger).unwrap();
        face_off
    }

    #[test]
    fn test_decision_table_for_both_dingers() {
        for dinger in [Team::One, Team::Two] {
            let other = dinger.other();
            assert_eq!(resolve(dinger, Slot::Matched(5), Slot::Missed), dinger);
            assert_eq!(resolve(dinger, Slot::Missed, Slot::Matched(5)), other);
            assert_eq!(resolve(dinger, Slot::Missed, Slot::Missed), dinger);
            assert_eq!(resolve(dinger, Slot::Matched(8), Slot::Matched(10)), other);
            assert_eq!(resolve(dinger, Slot::Matched(10), Slot::Matched(8)), dinger);
        }
    }

    #[test]
    fn test_exact_tie_goes_to_dinger() {
        assert_eq!(resolve(Team::One, Slot::Matched(7), Slot::Matched(7)), Team::One);
        assert_eq!(resolve(Team::Two, Slot::Matched(7), Slot::Matched(7)), Team::Two);
    }

    #[test]
    fn test_no_turn_before_buzz() {
        let face_off = FaceOff::new(Classic::default().into());
        assert_eq!(face_off.turn(), None);
        assert_eq!(face_off.authorize(Team::One), Err(Error::NoActiveTeam));
        assert_eq!(face_off.winner(), None);
    }

    #[test]
    fn test_second_buzz_rejected() {
        let mut face_off = create_test_face_off(Team::Two);
        assert_eq!(face_off.set_dinger(Team::One), Err(Error::AlreadyBuzzed));
        assert_eq!(face_off.dinger(), Some(Team::Two));
        assert!(face_off.reaction().is_some());
    }

    #[test]
    fn test_dinger_guesses_first() {
        let mut face_off = create_test_face_off(Team::Two);
        assert_eq!(face_off.turn(), Some(Team::Two));
        assert_eq!(
            face_off.record(Team::One, Slot::Missed),
            Err(Error::OutOfTurn(Team::One))
        );
        face_off.record(Team::Two, Slot::Matched(9)).unwrap();
        assert_eq!(face_off.turn(), Some(Team::One));
        assert_eq!(face_off.winner(), None);
    }

    #[test]
    fn test_slots_are_write_once() {
        let mut face_off = create_test_face_off(Team::One);
        face_off.record(Team::One, Slot::Missed).unwrap();
        assert_eq!(
            face_off.record(Team::One, Slot::Matched(10)),
            Err(Error::OutOfTurn(Team::One))
        );
        face_off.record(Team::Two, Slot::Missed).unwrap();
        assert_eq!(face_off.turn(), None);
        assert_eq!(face_off.record(Team::Two, Slot::Missed), Err(Error::NoActiveTeam));
        assert_eq!(face_off.slot(Team::One), Some(Slot::Missed));
        assert_eq!(face_off.winner(), Some(Team::One));
    }
}
