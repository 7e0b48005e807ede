//! Configuration constants for the feud game system
//!
//! This module contains the configuration limits and default timings
//! used throughout the game system to ensure data integrity and
//! provide consistent boundaries for different game components.

/// Match configuration constants
pub mod game {
    /// Allowed numbers of rounds in a match
    pub const ROUND_OPTIONS: [usize; 3] = [3, 5, 7];
}

/// Category configuration constants
pub mod category {
    /// Number of answer slots on a board, also the point value of the top answer
    pub const ANSWERS_COUNT: usize = 10;
    /// Minimum length of a category label
    pub const MIN_LABEL_LENGTH: usize = 1;
    /// Maximum length of a category label
    pub const MAX_LABEL_LENGTH: usize = 200;
    /// Maximum length of answer text in characters
    pub const MAX_ANSWER_LENGTH: usize = 100;
    /// Maximum number of accepted alternative spellings per answer
    pub const MAX_ACCEPTED_COUNT: usize = 16;
    /// Maximum explicit point value of a single answer
    pub const MAX_POINTS: u64 = 1000;
}

/// Round configuration constants
pub mod round {
    /// Strikes that end the active team's turn
    pub const MAX_STRIKES: usize = 3;
    /// Upper bound for a configured strike limit
    pub const MAX_STRIKES_LIMIT: usize = 5;
    /// Strikes available to the stealing team
    pub const STEAL_STRIKES: usize = 1;
    /// Maximum time in seconds any round delay may be configured to
    pub const MAX_DELAY: u64 = 10;
    /// Default pause in milliseconds after the final strike before the steal begins
    pub const STRIKE_OUT_SETTLE_MS: u64 = 500;
    /// Default pause in milliseconds after a failed steal before the reveal
    pub const STEAL_FAIL_SETTLE_MS: u64 = 800;
    /// Default pause in milliseconds after the last reveal before the round is over
    pub const REVEAL_FINISH_MS: u64 = 800;
}

/// Face-off minigame configuration constants
pub mod minigame {
    /// Maximum time in seconds any minigame delay may be configured to
    pub const MAX_DELAY: u64 = 30;
    /// Default time in milliseconds the bell stays hidden
    pub const READY_DELAY_MS: u64 = 2000;
    /// Default time in milliseconds the first bell stays still once visible
    pub const STATIC_PERIOD_MS: u64 = 1000;
    /// Default time in milliseconds between bell relocations
    pub const RELOCATE_INTERVAL_MS: u64 = 850;
    /// Default time in milliseconds before the second bell spawns
    pub const SPAWN_INTERVAL_MS: u64 = 4000;
    /// Default reduction in milliseconds of the spawn interval per existing bell
    pub const SPAWN_STEP_MS: u64 = 1000;
    /// Default lower bound in milliseconds of the spawn interval
    pub const MIN_SPAWN_INTERVAL_MS: u64 = 1500;
    /// Default cap of concurrent bells
    pub const MAX_BELLS: usize = 3;
    /// Upper bound for a configured bell cap
    pub const MAX_BELLS_LIMIT: usize = 8;
    /// Horizontal range in percent a bell may appear in
    pub const BELL_X_RANGE: (f64, f64) = (10., 90.);
    /// Vertical range in percent a bell may appear in
    pub const BELL_Y_RANGE: (f64, f64) = (20., 80.);
    /// Horizontal position in percent separating Team 1's side from Team 2's
    pub const CENTER_LINE: f64 = 50.;
    /// Default shortest wait in milliseconds before the quick draw signal
    pub const MIN_DRAW_DELAY_MS: u64 = 2000;
    /// Default longest wait in milliseconds before the quick draw signal
    pub const MAX_DRAW_DELAY_MS: u64 = 5000;
}
