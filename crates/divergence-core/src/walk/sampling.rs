use rand::{
    Rng,
    distributions::{Distribution, WeightedIndex},
};

use crate::{
    cohort::CohortDistribution,
    config::{SamplingConfig, SamplingPolicy},
};

/// Draw the next move from what the cohort actually plays here.
///
/// Returns `None` only for an empty distribution. If temperature scaling
/// underflows every weight, the most played move is returned.
pub fn choose_move<R: Rng + ?Sized>(
    distribution: &CohortDistribution,
    sampling: &SamplingConfig,
    rng: &mut R,
) -> Option<String> {
    let rows = distribution.rows();
    if rows.is_empty() {
        return None;
    }

    let total = distribution.total_games() as f64;
    let exponent = 1.0 / sampling.temperature;
    let weights: Vec<f64> = rows
        .iter()
        .map(|row| match sampling.policy {
            SamplingPolicy::TargetFrequency => (row.games as f64 / total).powf(exponent),
            SamplingPolicy::Uniform => 1.0,
        })
        .collect();

    match WeightedIndex::new(&weights) {
        Ok(index) => Some(rows[index.sample(rng)].uci.clone()),
        Err(_) => distribution.top_move().map(|row| row.uci.clone()),
    }
}
