//! Strike counting
//!
//! A [`StrikeTracker`] lives inside the main round and steal phase payloads.
//! Leaving either phase drops the tracker, so strikes always start from zero
//! in the next phase.

use serde::{Deserialize, Serialize};

/// A bounded counter of wrong guesses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeTracker {
    count: usize,
    threshold: usize,
}

impl StrikeTracker {
    /// Creates an empty tracker that trips after `threshold` strikes
    pub fn new(threshold: usize) -> Self {
        Self {
            count: 0,
            threshold: threshold.max(1),
        }
    }

    /// Records a strike, returning whether the threshold has now been reached
    ///
    /// The count saturates at the threshold.
    pub fn record(&mut self) -> bool {
        self.count = (self.count + 1).min(self.threshold);
        self.is_out()
    }

    /// Whether the threshold has been reached
    pub fn is_out(&self) -> bool {
        self.count >= self.threshold
    }

    /// Current strike count
    pub fn count(&self) -> usize {
        self.count
    }

    /// Strikes needed to trip
    pub fn threshold(&self) -> usize {
        self.threshold
    }
}
