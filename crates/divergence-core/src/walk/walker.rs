use std::fmt;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::{
    analysis::analyzer::analyze,
    cohort::Position,
    config::WalkConfig,
    orchestrator::CancelToken,
    puzzle::{
        builder::{PuzzleBuilder, ValidationError},
        record::PuzzleRecord,
    },
    walk::{
        boundary::{ChessRules, MoveStatsProvider},
        sampling::choose_move,
        state::WalkState,
    },
};

/// Why a walk ended without a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// `max_ply` reached with no divergence.
    MaxPly,
    /// The target cohort's stats could not be fetched; the walk was abandoned.
    TargetDataUnavailable,
    /// The base cohort's stats could not be fetched.
    BaseDataUnavailable,
    /// The target cohort played this position fewer than `min_games` times.
    ThinTargetSample,
    /// The base cohort played this position fewer than `min_games` times.
    ThinBaseSample,
    /// The sampled move led back to an already visited position.
    Repetition,
    /// The sampled move could not be applied.
    IllegalMove,
    /// Cancellation was requested between plies.
    Cancelled,
}

impl StopReason {
    /// Whether the walk ended because the provider failed.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(
            self,
            StopReason::TargetDataUnavailable | StopReason::BaseDataUnavailable
        )
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::MaxPly => "max ply reached",
            StopReason::TargetDataUnavailable => "target data unavailable",
            StopReason::BaseDataUnavailable => "base data unavailable",
            StopReason::ThinTargetSample => "too few target games",
            StopReason::ThinBaseSample => "too few base games",
            StopReason::Repetition => "repeated position",
            StopReason::IllegalMove => "illegal sampled move",
            StopReason::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

/// Result of one walk.
#[derive(Debug, Clone)]
pub enum WalkOutcome {
    /// A divergence was found and passed validation.
    Found(Box<PuzzleRecord>),
    /// A divergence was found but the candidate failed validation.
    Rejected {
        position: Position,
        ply: usize,
        error: ValidationError,
    },
    /// The walk ended without a divergence. Expected, not an error.
    NoPuzzle { reason: StopReason, ply: usize },
}

impl WalkOutcome {
    pub fn puzzle(&self) -> Option<&PuzzleRecord> {
        match self {
            WalkOutcome::Found(record) => Some(record),
            _ => None,
        }
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            WalkOutcome::NoPuzzle { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

/// Drives single random-walk trajectories through real-game move distributions.
pub struct Walker<'a, P: ?Sized, R: ?Sized> {
    provider: &'a P,
    rules: &'a R,
    config: &'a WalkConfig,
}

impl<'a, P, R> Walker<'a, P, R>
where
    P: MoveStatsProvider + ?Sized,
    R: ChessRules + ?Sized,
{
    pub fn new(provider: &'a P, rules: &'a R, config: &'a WalkConfig) -> Self {
        Walker {
            provider,
            rules,
            config,
        }
    }

    /// Walk from `start` until the first divergence or a stop condition.
    pub fn run<G: Rng + ?Sized>(&self, start: &Position, rng: &mut G) -> WalkOutcome {
        self.run_with_cancel(start, rng, &CancelToken::new())
    }

    /// Like `run`, checking `cancel` before every ply.
    pub fn run_with_cancel<G: Rng + ?Sized>(
        &self,
        start: &Position,
        rng: &mut G,
        cancel: &CancelToken,
    ) -> WalkOutcome {
        let config = self.config;
        let thresholds = config.thresholds();
        let mut state = WalkState::new(start.clone());

        while state.ply() < config.max_ply && !state.is_terminal() {
            if cancel.is_cancelled() {
                debug!(ply = state.ply(), "walk cancelled");
                return Self::stop(&mut state, StopReason::Cancelled);
            }

            let target = match self
                .provider
                .fetch(state.position(), config.target_rating_band)
            {
                Ok(distribution) => distribution,
                Err(err) => {
                    warn!(ply = state.ply(), band = %config.target_rating_band, error = %err, "abandoning walk");
                    return Self::stop(&mut state, StopReason::TargetDataUnavailable);
                }
            };
            if target.total_games() < config.min_games {
                debug!(ply = state.ply(), games = target.total_games(), "target sample too thin");
                return Self::stop(&mut state, StopReason::ThinTargetSample);
            }

            let Some(next_move) = choose_move(&target, &config.sampling, rng) else {
                return Self::stop(&mut state, StopReason::ThinTargetSample);
            };

            if state.ply() >= config.min_ply {
                let base = match self.provider.fetch(state.position(), config.base_rating_band) {
                    Ok(distribution) => distribution,
                    Err(err) => {
                        warn!(ply = state.ply(), band = %config.base_rating_band, error = %err, "base stats unavailable");
                        return Self::stop(&mut state, StopReason::BaseDataUnavailable);
                    }
                };
                if base.total_games() < config.min_games {
                    debug!(ply = state.ply(), games = base.total_games(), "base sample too thin");
                    return Self::stop(&mut state, StopReason::ThinBaseSample);
                }

                let result = analyze(&base, &target, &thresholds);
                debug!(
                    ply = state.ply(),
                    frequency = result.frequency_significant,
                    win_rate = result.win_rate_significant,
                    "analyzed position"
                );

                if result.is_divergent() {
                    state.mark_terminal();
                    let position = state.position().clone();
                    let builder = PuzzleBuilder::new(self.rules, thresholds);
                    return match builder.build(&position, result, &state, &base, &target) {
                        Ok(record) => {
                            info!(ply = state.ply(), fen = %position, "divergence found");
                            WalkOutcome::Found(Box::new(record))
                        }
                        Err(error) => {
                            warn!(ply = state.ply(), fen = %position, %error, "candidate rejected");
                            WalkOutcome::Rejected {
                                position,
                                ply: state.ply(),
                                error,
                            }
                        }
                    };
                }
            }

            let next = match self.rules.apply_move(state.position(), &next_move) {
                Ok(next) => next,
                Err(err) => {
                    warn!(ply = state.ply(), error = %err, "sampled move could not be applied");
                    return Self::stop(&mut state, StopReason::IllegalMove);
                }
            };
            if !state.advance(next, next_move) {
                debug!(ply = state.ply(), "repeated position");
                return Self::stop(&mut state, StopReason::Repetition);
            }
        }

        Self::stop(&mut state, StopReason::MaxPly)
    }

    fn stop(state: &mut WalkState, reason: StopReason) -> WalkOutcome {
        state.mark_terminal();
        WalkOutcome::NoPuzzle {
            reason,
            ply: state.ply(),
        }
    }
}
