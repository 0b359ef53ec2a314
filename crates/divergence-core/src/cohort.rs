use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::band::RatingBand;

/// A node of the implicit game tree, keyed by its FEN string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(String);

impl Position {
    pub fn new(fen: impl Into<String>) -> Self {
        Position(fen.into())
    }

    /// Return the FEN text of this position.
    pub fn fen(&self) -> &str {
        &self.0
    }

    /// Key used to detect repeated positions within a walk.
    /// Only the placement, side to move, castling and en passant fields count,
    /// so the move counters do not hide a transposition.
    pub fn repetition_key(&self) -> String {
        let fields: Vec<&str> = self.0.split_whitespace().collect();
        if fields.len() >= 4 {
            fields[..4].join(" ")
        } else {
            self.0.trim().to_string()
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Position {
    fn from(value: &str) -> Self {
        Position(value.to_string())
    }
}

impl From<String> for Position {
    fn from(value: String) -> Self {
        Position(value)
    }
}

/// Aggregate outcome counts for one move played from a position.
/// Outcomes are from the mover's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveStatRow {
    pub uci: String,
    pub games: u64,
    pub wins: u64,
    pub draws: u64,
    pub losses: u64,
}

impl MoveStatRow {
    /// A row with a game count and no outcome breakdown.
    pub fn new(uci: impl Into<String>, games: u64) -> Self {
        MoveStatRow {
            uci: uci.into(),
            games,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    /// A row whose game count is the sum of its outcomes.
    pub fn with_outcomes(uci: impl Into<String>, wins: u64, draws: u64, losses: u64) -> Self {
        MoveStatRow {
            uci: uci.into(),
            games: wins + draws + losses,
            wins,
            draws,
            losses,
        }
    }

    /// Number of games with a recorded result.
    pub fn decided(&self) -> u64 {
        self.wins + self.draws + self.losses
    }

    /// Points scored with win=1, draw=0.5, loss=0.
    pub fn score(&self) -> f64 {
        self.wins as f64 + 0.5 * self.draws as f64
    }
}

/// All moves played from one position by one rating band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortDistribution {
    band: RatingBand,
    rows: Vec<MoveStatRow>,
    total_games: u64,
}

impl CohortDistribution {
    /// Build a distribution. Rows sharing a move are merged and rows with no
    /// games are dropped; the total is the sum of the remaining counts.
    pub fn new(band: RatingBand, rows: impl IntoIterator<Item = MoveStatRow>) -> Self {
        let mut merged: BTreeMap<String, MoveStatRow> = BTreeMap::new();
        for row in rows {
            if row.games == 0 {
                continue;
            }
            match merged.get_mut(&row.uci) {
                Some(existing) => {
                    existing.games += row.games;
                    existing.wins += row.wins;
                    existing.draws += row.draws;
                    existing.losses += row.losses;
                }
                None => {
                    merged.insert(row.uci.clone(), row);
                }
            }
        }

        let mut rows: Vec<MoveStatRow> = merged.into_values().collect();
        rows.sort_by(|a, b| b.games.cmp(&a.games).then_with(|| a.uci.cmp(&b.uci)));
        let total_games = rows.iter().map(|row| row.games).sum();

        CohortDistribution {
            band,
            rows,
            total_games,
        }
    }

    /// Convenience constructor from `(uci, games)` pairs.
    pub fn from_counts<'a>(band: RatingBand, counts: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        Self::new(
            band,
            counts
                .into_iter()
                .map(|(uci, games)| MoveStatRow::new(uci, games)),
        )
    }

    pub fn band(&self) -> RatingBand {
        self.band
    }

    pub fn total_games(&self) -> u64 {
        self.total_games
    }

    /// Rows ordered by games played, most played first.
    pub fn rows(&self) -> &[MoveStatRow] {
        &self.rows
    }

    pub fn move_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, uci: &str) -> Option<&MoveStatRow> {
        self.rows.iter().find(|row| row.uci == uci)
    }

    /// Games in which `uci` was played, zero when never observed.
    pub fn games_for(&self, uci: &str) -> u64 {
        self.get(uci).map_or(0, |row| row.games)
    }

    /// Share of games in which `uci` was played.
    pub fn frequency(&self, uci: &str) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            self.games_for(uci) as f64 / self.total_games as f64
        }
    }

    /// Most played move.
    pub fn top_move(&self) -> Option<&MoveStatRow> {
        self.rows.first()
    }
}
