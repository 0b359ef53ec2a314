use std::fmt;

use crate::{
    analysis::analyzer::{DivergenceResult, Thresholds},
    cohort::{CohortDistribution, Position},
    puzzle::record::PuzzleRecord,
    walk::{boundary::ChessRules, state::WalkState},
};

/// Which side of the comparison a validation rule refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cohort {
    Base,
    Target,
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cohort::Base => f.write_str("base"),
            Cohort::Target => f.write_str("target"),
        }
    }
}

/// The persistence rule a puzzle candidate failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The walk's start position is not a legal board state.
    IllegalStart { fen: String },
    /// A lead-in move could not be replayed from the start position.
    LeadInReplayFailed { index: usize, uci: String, reason: String },
    /// Replaying the lead-in ends somewhere other than the candidate position.
    LeadInMismatch { expected: String, reached: String },
    /// A cohort has fewer games than required.
    InsufficientGames {
        cohort: Cohort,
        games: u64,
        min_games: u64,
    },
    /// Neither frequency nor win rate diverged.
    NotSignificant,
    /// A cohort has no moves at the position.
    EmptyComparison { cohort: Cohort },
    /// The diverging move is not legal in the candidate position.
    IllegalDivergingMove { uci: String, fen: String },
    /// The rules could not list the legal moves of the candidate position.
    LegalMovesUnavailable { fen: String, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::IllegalStart { fen } => {
                write!(f, "start position '{fen}' is not a legal position")
            }
            ValidationError::LeadInReplayFailed { index, uci, reason } => {
                write!(f, "lead-in move {index} ({uci}) could not be replayed: {reason}")
            }
            ValidationError::LeadInMismatch { expected, reached } => write!(
                f,
                "lead-in reaches '{reached}' instead of candidate position '{expected}'"
            ),
            ValidationError::InsufficientGames {
                cohort,
                games,
                min_games,
            } => write!(
                f,
                "{cohort} cohort has {games} games, at least {min_games} required"
            ),
            ValidationError::NotSignificant => {
                write!(f, "neither frequency nor win rate diverged significantly")
            }
            ValidationError::EmptyComparison { cohort } => {
                write!(f, "{cohort} cohort has no moves at the position")
            }
            ValidationError::IllegalDivergingMove { uci, fen } => {
                write!(f, "diverging move {uci} is not legal in '{fen}'")
            }
            ValidationError::LegalMovesUnavailable { fen, reason } => {
                write!(f, "legal moves of '{fen}' are unavailable: {reason}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Turns a walk's terminal divergence into a `PuzzleRecord`, or says why it can't.
pub struct PuzzleBuilder<'a, R: ?Sized> {
    rules: &'a R,
    thresholds: Thresholds,
}

impl<'a, R: ChessRules + ?Sized> PuzzleBuilder<'a, R> {
    pub fn new(rules: &'a R, thresholds: Thresholds) -> Self {
        PuzzleBuilder { rules, thresholds }
    }

    /// Validate a candidate and assemble the record. Every rule must pass.
    pub fn build(
        &self,
        position: &Position,
        result: DivergenceResult,
        state: &WalkState,
        base: &CohortDistribution,
        target: &CohortDistribution,
    ) -> Result<PuzzleRecord, ValidationError> {
        self.check_reachable(position, state)?;

        for (cohort, distribution, reported) in [
            (Cohort::Base, base, result.base_total),
            (Cohort::Target, target, result.target_total),
        ] {
            let games = distribution.total_games().min(reported);
            if games < self.thresholds.min_games {
                return Err(ValidationError::InsufficientGames {
                    cohort,
                    games,
                    min_games: self.thresholds.min_games,
                });
            }
        }

        if !result.is_divergent() {
            return Err(ValidationError::NotSignificant);
        }

        if base.is_empty() {
            return Err(ValidationError::EmptyComparison {
                cohort: Cohort::Base,
            });
        }
        if target.is_empty() {
            return Err(ValidationError::EmptyComparison {
                cohort: Cohort::Target,
            });
        }

        if let Some(uci) = result.preferred_move.as_deref() {
            let legal_moves = self.rules.legal_moves(position).map_err(|err| {
                ValidationError::LegalMovesUnavailable {
                    fen: position.fen().to_string(),
                    reason: err.to_string(),
                }
            })?;
            if !legal_moves.iter().any(|m| m == uci) {
                return Err(ValidationError::IllegalDivergingMove {
                    uci: uci.to_string(),
                    fen: position.fen().to_string(),
                });
            }
        }

        Ok(PuzzleRecord::new(
            position.fen().to_string(),
            state.start().fen().to_string(),
            state.moves().to_vec(),
            base,
            target,
            result,
        ))
    }

    /// The candidate must follow from a legal start by replaying the lead-in.
    fn check_reachable(&self, position: &Position, state: &WalkState) -> Result<(), ValidationError> {
        let start = state.start();
        if !self.rules.is_legal_position(start) {
            return Err(ValidationError::IllegalStart {
                fen: start.fen().to_string(),
            });
        }

        let mut reached = start.clone();
        for (index, uci) in state.moves().iter().enumerate() {
            reached = self.rules.apply_move(&reached, uci).map_err(|err| {
                ValidationError::LeadInReplayFailed {
                    index,
                    uci: uci.clone(),
                    reason: err.to_string(),
                }
            })?;
        }

        if reached.repetition_key() != position.repetition_key() {
            return Err(ValidationError::LeadInMismatch {
                expected: position.fen().to_string(),
                reached: reached.fen().to_string(),
            });
        }
        Ok(())
    }
}
