mod analysis;
mod band;
mod cohort;
mod config;
mod error;
mod orchestrator;
mod puzzle;
mod walk;

#[cfg(test)]
mod tests;

pub use analysis::analyzer::{DivergenceResult, FrequencyTest, Thresholds, WinRateTest, analyze};
pub use band::RatingBand;
pub use cohort::{CohortDistribution, MoveStatRow, Position};
pub use config::{ConfigError, STANDARD_START_FEN, SamplingConfig, SamplingPolicy, WalkConfig};
pub use error::{RulesError, RunError, SinkError};
pub use orchestrator::{CancelToken, RunReport, run_walks, run_walks_with_hook};
pub use puzzle::builder::{Cohort, PuzzleBuilder, ValidationError};
pub use puzzle::record::{CohortSummary, PuzzleRecord};
pub use puzzle::sink::{MemorySink, PuzzleSink};
pub use walk::boundary::{ChessRules, DataUnavailable, MoveStatsProvider};
pub use walk::sampling::choose_move;
pub use walk::state::WalkState;
pub use walk::walker::{StopReason, WalkOutcome, Walker};
