use std::collections::BTreeMap;

use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::cohort::CohortDistribution;

/// One move's counts in both cohorts. A move never played by a cohort is a zero cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ContingencyRow {
    pub uci: String,
    pub base: u64,
    pub target: u64,
}

/// Move-choice contingency table: rows are moves, columns are {base, target}.
#[derive(Debug, Clone)]
pub(crate) struct ContingencyTable {
    rows: Vec<ContingencyRow>,
    base_total: u64,
    target_total: u64,
}

/// Chi-square test of independence over the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ChiSquareTest {
    pub statistic: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
}

impl ContingencyTable {
    pub fn from_cohorts(base: &CohortDistribution, target: &CohortDistribution) -> Self {
        let mut cells: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
        for row in base.rows() {
            cells.entry(row.uci.as_str()).or_default().0 += row.games;
        }
        for row in target.rows() {
            cells.entry(row.uci.as_str()).or_default().1 += row.games;
        }

        let rows: Vec<ContingencyRow> = cells
            .into_iter()
            .filter(|(_, (b, t))| b + t > 0)
            .map(|(uci, (base, target))| ContingencyRow {
                uci: uci.to_string(),
                base,
                target,
            })
            .collect();
        let base_total = rows.iter().map(|row| row.base).sum();
        let target_total = rows.iter().map(|row| row.target).sum();

        ContingencyTable {
            rows,
            base_total,
            target_total,
        }
    }

    /// True when both cohorts played something but never the same move.
    pub fn is_disjoint(&self) -> bool {
        self.base_total > 0
            && self.target_total > 0
            && self.rows.iter().all(|row| row.base == 0 || row.target == 0)
    }

    /// Moves one cohort never played while the other played them at least `min_games` times.
    pub fn novel_moves(&self, min_games: u64) -> Vec<String> {
        self.rows
            .iter()
            .filter(|row| {
                (row.base == 0 && row.target >= min_games)
                    || (row.target == 0 && row.base >= min_games)
            })
            .map(|row| row.uci.clone())
            .collect()
    }

    /// Run the test. `None` when fewer than two moves were observed or a column is empty.
    pub fn chi_square(&self) -> Option<ChiSquareTest> {
        if self.rows.len() < 2 || self.base_total == 0 || self.target_total == 0 {
            return None;
        }

        let grand_total = (self.base_total + self.target_total) as f64;
        let mut statistic = 0.0_f64;
        for row in &self.rows {
            let row_total = (row.base + row.target) as f64;
            for (observed, column_total) in
                [(row.base, self.base_total), (row.target, self.target_total)]
            {
                let expected = row_total * column_total as f64 / grand_total;
                if expected > 0.0 {
                    let diff = observed as f64 - expected;
                    statistic += diff * diff / expected;
                }
            }
        }

        // (rows - 1) * (columns - 1) with two columns.
        let degrees_of_freedom = self.rows.len() - 1;
        let p_value = ChiSquared::new(degrees_of_freedom as f64)
            .map(|dist| dist.sf(statistic))
            .unwrap_or(1.0);

        Some(ChiSquareTest {
            statistic,
            degrees_of_freedom,
            p_value: if p_value.is_nan() {
                1.0
            } else {
                p_value.clamp(0.0, 1.0)
            },
        })
    }

    /// The move whose frequency rose the most from base to target.
    /// Ties go to the move the target cohort played more, then to the lower UCI string.
    pub fn most_preferred_by_target(&self) -> Option<&str> {
        if self.base_total == 0 || self.target_total == 0 {
            return None;
        }

        let mut best: Option<(&ContingencyRow, f64)> = None;
        for row in &self.rows {
            let delta = row.target as f64 / self.target_total as f64
                - row.base as f64 / self.base_total as f64;
            best = match best {
                Some((best_row, best_delta))
                    if best_delta > delta
                        || (best_delta == delta && best_row.target >= row.target) =>
                {
                    Some((best_row, best_delta))
                }
                _ => Some((row, delta)),
            };
        }

        best.map(|(row, _)| row.uci.as_str())
    }
}
