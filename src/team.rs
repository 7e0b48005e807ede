//! The two competing teams
//!
//! A match is always played between exactly two teams. All per-team data
//! throughout the crate is stored in an [`EnumMap`](enum_map::EnumMap)
//! keyed by [`Team`].

use enum_map::Enum;
use serde::{Deserialize, Serialize};

/// One of the two teams in a match
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Enum,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Team {
    /// The first team, seated on the left
    #[display("Team 1")]
    One,
    /// The second team, seated on the right
    #[display("Team 2")]
    Two,
}

impl Team {
    /// Returns the opposing team
    pub fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use enum_map::EnumMap;

    #[test]
    fn test_other_flips() {
        assert_eq!(Team::One.other(), Team::Two);
        assert_eq!(Team::Two.other(), Team::One);
        assert_eq!(Team::One.other().other(), Team::One);
    }

    #[test]
    fn test_display() {
        assert_eq!(Team::One.to_string(), "Team 1");
        assert_eq!(Team::Two.to_string(), "Team 2");
    }

    #[test]
    fn test_enum_map_indexing() {
        let mut scores: EnumMap<Team, u64> = EnumMap::default();
        scores[Team::Two] += 7;
        assert_eq!(scores[Team::One], 0);
        assert_eq!(scores[Team::Two], 7);
    }
}
