use serde::{Deserialize, Serialize};

use crate::{
    analysis::analyzer::DivergenceResult,
    band::RatingBand,
    cohort::{CohortDistribution, MoveStatRow},
};

/// Band label, sample size and move rows of one cohort at the puzzle position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortSummary {
    pub band: RatingBand,
    pub total_games: u64,
    pub moves: Vec<MoveStatRow>,
}

impl From<&CohortDistribution> for CohortSummary {
    fn from(distribution: &CohortDistribution) -> Self {
        CohortSummary {
            band: distribution.band(),
            total_games: distribution.total_games(),
            moves: distribution.rows().to_vec(),
        }
    }
}

/// A validated puzzle. Only the builder creates one; it never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleRecord {
    fen: String,
    start_fen: String,
    lead_in: Vec<String>,
    ply: usize,
    base: CohortSummary,
    target: CohortSummary,
    base_top_move: Option<String>,
    target_top_move: Option<String>,
    diverging_move: Option<String>,
    divergence: DivergenceResult,
}

impl PuzzleRecord {
    pub(crate) fn new(
        fen: String,
        start_fen: String,
        lead_in: Vec<String>,
        base: &CohortDistribution,
        target: &CohortDistribution,
        divergence: DivergenceResult,
    ) -> Self {
        PuzzleRecord {
            fen,
            start_fen,
            ply: lead_in.len(),
            lead_in,
            base_top_move: base.top_move().map(|row| row.uci.clone()),
            target_top_move: target.top_move().map(|row| row.uci.clone()),
            diverging_move: divergence.preferred_move.clone(),
            base: CohortSummary::from(base),
            target: CohortSummary::from(target),
            divergence,
        }
    }

    /// Position the puzzle is set in.
    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn start_fen(&self) -> &str {
        &self.start_fen
    }

    /// Moves leading from the start position to the puzzle position.
    pub fn lead_in(&self) -> &[String] {
        &self.lead_in
    }

    pub fn ply(&self) -> usize {
        self.ply
    }

    pub fn base(&self) -> &CohortSummary {
        &self.base
    }

    pub fn target(&self) -> &CohortSummary {
        &self.target
    }

    pub fn base_top_move(&self) -> Option<&str> {
        self.base_top_move.as_deref()
    }

    pub fn target_top_move(&self) -> Option<&str> {
        self.target_top_move.as_deref()
    }

    /// Move the target cohort prefers most relative to the base cohort.
    pub fn diverging_move(&self) -> Option<&str> {
        self.diverging_move.as_deref()
    }

    pub fn divergence(&self) -> &DivergenceResult {
        &self.divergence
    }
}
