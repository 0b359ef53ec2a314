use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{
    ChessRules, CohortDistribution, DataUnavailable, MoveStatsProvider, Position, RatingBand,
    RulesError,
};

pub const BASE: RatingBand = RatingBand::From1600;
pub const TARGET: RatingBand = RatingBand::From2000;

/// Serves fixed distributions per `(fen, band)`; anything else is `NoGames`.
#[derive(Default)]
pub struct ScriptedProvider {
    stats: HashMap<(String, RatingBand), CohortDistribution>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counts(mut self, fen: &str, band: RatingBand, counts: &[(&str, u64)]) -> Self {
        self.stats.insert(
            (fen.to_string(), band),
            CohortDistribution::from_counts(band, counts.iter().copied()),
        );
        self
    }

    /// Same counts for both test bands.
    pub fn with_both(self, fen: &str, counts: &[(&str, u64)]) -> Self {
        self.with_counts(fen, BASE, counts)
            .with_counts(fen, TARGET, counts)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MoveStatsProvider for ScriptedProvider {
    fn fetch(
        &self,
        position: &Position,
        band: RatingBand,
    ) -> Result<CohortDistribution, DataUnavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.stats
            .get(&(position.fen().to_string(), band))
            .cloned()
            .ok_or(DataUnavailable::NoGames)
    }
}

/// Every fetch fails.
#[derive(Default)]
pub struct UnreachableProvider {
    calls: AtomicUsize,
}

impl UnreachableProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MoveStatsProvider for UnreachableProvider {
    fn fetch(
        &self,
        _position: &Position,
        _band: RatingBand,
    ) -> Result<CohortDistribution, DataUnavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DataUnavailable::Unreachable("connection refused".to_string()))
    }
}

/// Rules over path-shaped positions: playing `m` from `p` reaches `p/m`
/// unless an explicit transition says otherwise. Moves starting with `x`
/// are illegal, positions starting with `invalid` are not legal boards, and
/// positions ending in `/unlisted` cannot list their legal moves.
#[derive(Default)]
pub struct PathRules {
    transitions: HashMap<(String, String), String>,
    legality_checks: AtomicUsize,
}

pub const LEGAL_MOVES: &[&str] = &[
    "e2e4", "d2d4", "c2c4", "g1f3", "b1c3", "e7e5", "c7c5", "d7d5", "g8f6", "b8c6", "f1c4",
];

impl PathRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transition(mut self, from: &str, uci: &str, to: &str) -> Self {
        self.transitions
            .insert((from.to_string(), uci.to_string()), to.to_string());
        self
    }

    pub fn legality_checks(&self) -> usize {
        self.legality_checks.load(Ordering::SeqCst)
    }
}

impl ChessRules for PathRules {
    fn is_legal_position(&self, position: &Position) -> bool {
        self.legality_checks.fetch_add(1, Ordering::SeqCst);
        !position.fen().is_empty() && !position.fen().starts_with("invalid")
    }

    fn apply_move(&self, position: &Position, uci: &str) -> Result<Position, RulesError> {
        if let Some(next) = self
            .transitions
            .get(&(position.fen().to_string(), uci.to_string()))
        {
            return Ok(Position::new(next.as_str()));
        }
        if uci.starts_with('x') {
            return Err(RulesError::IllegalMove {
                fen: position.fen().to_string(),
                uci: uci.to_string(),
            });
        }
        Ok(Position::new(format!("{}/{}", position.fen(), uci)))
    }

    fn legal_moves(&self, position: &Position) -> Result<Vec<String>, RulesError> {
        if position.fen().ends_with("/unlisted") {
            return Err(RulesError::InvalidPosition {
                fen: position.fen().to_string(),
                reason: "move generation failed".to_string(),
            });
        }
        Ok(LEGAL_MOVES.iter().map(|m| m.to_string()).collect())
    }
}

/// Walk config over the two test bands with small thresholds.
pub fn test_config() -> crate::WalkConfig {
    crate::WalkConfig {
        base_rating_band: BASE,
        target_rating_band: TARGET,
        min_games: 10,
        min_win_rate_delta: 0.07,
        significance_level: 0.05,
        max_ply: 6,
        min_ply: 0,
        number_of_walks: 4,
        start_fen: "start".to_string(),
        sampling: crate::SamplingConfig::default(),
        seed: 7,
        workers: 1,
    }
}
