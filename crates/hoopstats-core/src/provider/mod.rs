// Provider payload normalization.
//
// The fantasy provider encodes ordered collections as objects with a `count`
// field plus "0".."n-1" keys, and an entity's attributes as an array whose
// first slot is a list of single-key objects. Everything here turns that
// shape into flat typed records. Public entry points are fail-soft: a
// structural mismatch is logged and yields `None` or an empty/partial `Vec`.

pub mod indexed;
pub mod league;
pub mod scoreboard;
pub mod teams;

use thiserror::Error;

pub use league::{parse_league_info, LeagueInfo};
pub use scoreboard::parse_scoreboard;
pub use teams::{parse_standings, parse_team, TeamRecord, TeamStanding};

// ---------------------------------------------------------------------------
// Error type (internal to normalization, never returned by entry points)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("missing key `{key}`")]
    MissingKey { key: String },

    #[error("expected {expected} at `{at}`")]
    WrongType { at: String, expected: &'static str },

    #[error("invalid collection count at `{at}`")]
    BadCount { at: String },
}

impl NormalizeError {
    pub(crate) fn missing(key: &str) -> Self {
        NormalizeError::MissingKey {
            key: key.to_string(),
        }
    }

    pub(crate) fn wrong_type(at: &str, expected: &'static str) -> Self {
        NormalizeError::WrongType {
            at: at.to_string(),
            expected,
        }
    }
}
