//! # Feud Game Library
//!
//! This library provides the core game logic for a two-team survey trivia
//! game. It drives each round through its face-off, play or pass, main
//! round, steal attempt and reveal phases, strings rounds together into a
//! match, and keeps the presentation in sync through serialized messages.
//!
//! The engine never sleeps or spawns tasks: timed transitions are handed to
//! a caller supplied scheduler as [`AlarmMessage`]s and fed back in when
//! they fire.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::ignored_unit_patterns)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]
use serde::{Deserialize, Serialize};

pub mod constants;

pub mod deck;
pub mod feud;
pub mod game;
pub mod leaderboard;
pub mod round_id;
pub mod session;
pub mod team;

use round_id::RoundId;

/// Messages sent to synchronize a freshly attached presentation
#[derive(Debug, Serialize, Clone, derive_more::From)]
pub enum SyncMessage {
    /// Match snapshot, including the round in progress
    Game(game::SyncMessage),
}

impl SyncMessage {
    /// Converts the sync message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Messages sent to update the presentation
///
/// Update messages describe a single change, such as a revealed answer, a
/// new strike or a finished round.
#[derive(Debug, Serialize, Clone, derive_more::From)]
pub enum UpdateMessage {
    /// Match level updates
    Game(game::UpdateMessage),
    /// Round updates
    Round(feud::round::UpdateMessage),
    /// Face-off minigame updates
    Minigame(feud::minigame::UpdateMessage),
}

impl UpdateMessage {
    /// Converts the update message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Alarm messages for timed events
///
/// Every alarm carries the [`RoundId`] of the round that scheduled it, so
/// alarms outliving their round are recognized and dropped.
#[derive(Debug, Clone, derive_more::From, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Round phase transitions
    Round(feud::round::AlarmMessage),
    /// Face-off minigame events
    Minigame(feud::minigame::AlarmMessage),
}

impl AlarmMessage {
    /// Returns the round that scheduled this alarm
    pub fn round(&self) -> RoundId {
        match self {
            Self::Round(alarm) => alarm.round(),
            Self::Minigame(alarm) => alarm.round(),
        }
    }
}
