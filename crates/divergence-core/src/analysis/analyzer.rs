use serde::{Deserialize, Serialize};

use crate::{
    analysis::{contingency::ContingencyTable, proportion::two_proportion_z_test},
    band::RatingBand,
    cohort::CohortDistribution,
};

/// Statistical thresholds shared by the analyzer and the puzzle builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub min_games: u64,
    pub min_win_rate_delta: f64,
    pub significance_level: f64,
}

/// Outcome of the move-choice chi-square test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTest {
    pub statistic: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
    /// Neither cohort played a move the other played.
    pub disjoint: bool,
    /// Moves played at least `min_games` times by one cohort and never by the other.
    pub novel_moves: Vec<String>,
}

/// Outcome of the score-rate comparison for the target's most preferred move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinRateTest {
    pub uci: String,
    pub base_games: u64,
    pub target_games: u64,
    pub base_win_rate: f64,
    pub target_win_rate: f64,
    /// `target_win_rate - base_win_rate`.
    pub delta: f64,
    pub z: f64,
    pub p_value: f64,
}

/// Verdict of comparing two cohorts at the same position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergenceResult {
    pub base_band: RatingBand,
    pub target_band: RatingBand,
    pub base_total: u64,
    pub target_total: u64,
    pub base_moves: usize,
    pub target_moves: usize,
    /// At least one side had fewer than `min_games` games; no test ran.
    pub short_circuited: bool,
    /// Move with the largest frequency gain from base to target.
    pub preferred_move: Option<String>,
    pub frequency: Option<FrequencyTest>,
    pub win_rate: Option<WinRateTest>,
    pub frequency_significant: bool,
    pub win_rate_significant: bool,
}

impl DivergenceResult {
    fn unscored(base: &CohortDistribution, target: &CohortDistribution) -> Self {
        DivergenceResult {
            base_band: base.band(),
            target_band: target.band(),
            base_total: base.total_games(),
            target_total: target.total_games(),
            base_moves: base.move_count(),
            target_moves: target.move_count(),
            short_circuited: false,
            preferred_move: None,
            frequency: None,
            win_rate: None,
            frequency_significant: false,
            win_rate_significant: false,
        }
    }

    /// Whether either axis diverged.
    pub fn is_divergent(&self) -> bool {
        self.frequency_significant || self.win_rate_significant
    }
}

/// Compare the base and target distributions of one position.
///
/// Pure and deterministic. Degenerate inputs (thin samples, a single observed
/// move, zero variance, a move only one side played) come back as explicit
/// non-significant outcomes rather than errors.
pub fn analyze(
    base: &CohortDistribution,
    target: &CohortDistribution,
    thresholds: &Thresholds,
) -> DivergenceResult {
    let mut result = DivergenceResult::unscored(base, target);

    if base.total_games() < thresholds.min_games || target.total_games() < thresholds.min_games {
        result.short_circuited = true;
        return result;
    }

    let table = ContingencyTable::from_cohorts(base, target);

    if let Some(chi) = table.chi_square() {
        let disjoint = table.is_disjoint();
        let novel_moves = table.novel_moves(thresholds.min_games);
        result.frequency_significant =
            disjoint || !novel_moves.is_empty() || chi.p_value < thresholds.significance_level;
        result.frequency = Some(FrequencyTest {
            statistic: chi.statistic,
            degrees_of_freedom: chi.degrees_of_freedom,
            p_value: chi.p_value,
            disjoint,
            novel_moves,
        });
    }

    result.preferred_move = table.most_preferred_by_target().map(str::to_string);

    // The win-rate test needs the move to have been played with known results on both sides.
    result.win_rate = result.preferred_move.as_deref().and_then(|uci| {
        let base_row = base.get(uci)?;
        let target_row = target.get(uci)?;
        let test = two_proportion_z_test(
            base_row.score(),
            base_row.decided(),
            target_row.score(),
            target_row.decided(),
        )?;
        Some(WinRateTest {
            uci: uci.to_string(),
            base_games: base_row.games,
            target_games: target_row.games,
            base_win_rate: test.base_rate,
            target_win_rate: test.target_rate,
            delta: test.delta,
            z: test.z,
            p_value: test.p_value,
        })
    });

    result.win_rate_significant = result.win_rate.as_ref().is_some_and(|test| {
        test.p_value < thresholds.significance_level
            && test.delta.abs() >= thresholds.min_win_rate_delta
    });

    result
}
