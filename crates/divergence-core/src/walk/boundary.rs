use std::fmt;

use crate::{
    band::RatingBand,
    cohort::{CohortDistribution, Position},
    error::RulesError,
};

/// Why the provider could not produce a distribution. Always transient from
/// the walk's point of view: the walk ends, the run goes on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataUnavailable {
    Unreachable(String),
    RateLimited,
    Timeout,
    /// The position has no recorded games in the band.
    NoGames,
    Malformed(String),
}

impl fmt::Display for DataUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataUnavailable::Unreachable(reason) => write!(f, "move stats unreachable: {reason}"),
            DataUnavailable::RateLimited => write!(f, "move stats rate limited"),
            DataUnavailable::Timeout => write!(f, "move stats request timed out"),
            DataUnavailable::NoGames => write!(f, "no games recorded for position"),
            DataUnavailable::Malformed(reason) => {
                write!(f, "malformed move stats response: {reason}")
            }
        }
    }
}

impl std::error::Error for DataUnavailable {}

/// Source of per-band move statistics.
///
/// Implementations must bound every request in time and report timeouts,
/// rate limiting and empty results as `DataUnavailable` instead of panicking.
pub trait MoveStatsProvider {
    fn fetch(
        &self,
        position: &Position,
        band: RatingBand,
    ) -> Result<CohortDistribution, DataUnavailable>;
}

/// Chess rules the walk delegates to. Move legality is never decided here.
pub trait ChessRules {
    /// Whether `position` parses and describes a legal board state.
    fn is_legal_position(&self, position: &Position) -> bool;

    /// Play `uci` from `position` and return the resulting position.
    fn apply_move(&self, position: &Position, uci: &str) -> Result<Position, RulesError>;

    /// Every legal move from `position` in UCI notation.
    fn legal_moves(&self, position: &Position) -> Result<Vec<String>, RulesError>;
}
