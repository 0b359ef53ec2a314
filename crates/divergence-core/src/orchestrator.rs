use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::{
    config::{ConfigError, WalkConfig},
    error::RunError,
    puzzle::sink::PuzzleSink,
    walk::{
        boundary::{ChessRules, MoveStatsProvider},
        walker::{StopReason, WalkOutcome, Walker},
    },
};

/// Cooperative cancellation flag shared between the caller and running walks.
/// Walks check it between plies; a cancelled walk is discarded whole.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub walks_requested: usize,
    pub walks_attempted: usize,
    pub puzzles_found: usize,
    /// Walks that ended because the provider returned `DataUnavailable`.
    pub walks_abandoned: usize,
    pub candidates_rejected: usize,
    /// Walks that ended for any other reason without a divergence.
    pub walks_exhausted: usize,
    pub walks_cancelled: usize,
    pub sink_failures: usize,
}

impl RunReport {
    fn new(walks_requested: usize) -> Self {
        RunReport {
            walks_requested,
            ..Self::default()
        }
    }

    fn record(&mut self, outcome: &WalkOutcome) {
        self.walks_attempted += 1;
        match outcome {
            WalkOutcome::Found(_) => self.puzzles_found += 1,
            WalkOutcome::Rejected { .. } => self.candidates_rejected += 1,
            WalkOutcome::NoPuzzle { reason, .. } => match reason {
                StopReason::Cancelled => self.walks_cancelled += 1,
                reason if reason.is_data_unavailable() => self.walks_abandoned += 1,
                _ => self.walks_exhausted += 1,
            },
        }
    }
}

/// Run `config.number_of_walks` independent walks and append every puzzle to `sink`.
pub fn run_walks<P, R, S>(
    config: &WalkConfig,
    provider: &P,
    rules: &R,
    sink: &mut S,
    cancel: &CancelToken,
) -> Result<RunReport, RunError>
where
    P: MoveStatsProvider + Sync + ?Sized,
    R: ChessRules + Sync + ?Sized,
    S: PuzzleSink + ?Sized,
{
    run_walks_with_hook(config, provider, rules, sink, cancel, |_, _| {})
}

/// Run walks and invoke `on_walk(walk_index, outcome)` after each one settles.
///
/// Walk `i` is seeded with `config.seed + i`, so results do not depend on
/// `config.workers`. Puzzles are appended in walk order. Only configuration
/// problems fail the run; per-walk failures are counted in the report.
pub fn run_walks_with_hook<P, R, S, FHook>(
    config: &WalkConfig,
    provider: &P,
    rules: &R,
    sink: &mut S,
    cancel: &CancelToken,
    mut on_walk: FHook,
) -> Result<RunReport, RunError>
where
    P: MoveStatsProvider + Sync + ?Sized,
    R: ChessRules + Sync + ?Sized,
    S: PuzzleSink + ?Sized,
    FHook: FnMut(usize, &WalkOutcome),
{
    config.validate()?;
    let start = config.start_position();
    if !rules.is_legal_position(&start) {
        return Err(RunError::Config(ConfigError::Invalid(format!(
            "start_fen '{start}' is not a legal position"
        ))));
    }

    info!(
        walks = config.number_of_walks,
        base = %config.base_rating_band,
        target = %config.target_rating_band,
        workers = config.workers,
        "starting walks"
    );

    let walker = Walker::new(provider, rules, config);
    let walk_once = |index: usize| {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(index as u64));
        walker.run_with_cancel(&start, &mut rng, cancel)
    };

    let mut report = RunReport::new(config.number_of_walks);
    let mut settle = |index: usize, outcome: WalkOutcome, report: &mut RunReport| {
        if let Some(record) = outcome.puzzle() {
            if let Err(err) = sink.append(record) {
                warn!(walk = index, error = %err, "puzzle could not be stored");
                report.sink_failures += 1;
            }
        }
        report.record(&outcome);
        on_walk(index, &outcome);
    };

    if config.workers <= 1 {
        for index in 0..config.number_of_walks {
            if cancel.is_cancelled() {
                break;
            }
            let outcome = walk_once(index);
            settle(index, outcome, &mut report);
        }
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .build()
            .map_err(|err| RunError::ThreadPool(err.to_string()))?;
        let outcomes: Vec<Option<WalkOutcome>> = pool.install(|| {
            (0..config.number_of_walks)
                .into_par_iter()
                .map(|index| (!cancel.is_cancelled()).then(|| walk_once(index)))
                .collect()
        });
        for (index, outcome) in outcomes.into_iter().enumerate() {
            if let Some(outcome) = outcome {
                settle(index, outcome, &mut report);
            }
        }
    }

    info!(
        attempted = report.walks_attempted,
        found = report.puzzles_found,
        abandoned = report.walks_abandoned,
        rejected = report.candidates_rejected,
        "walks finished"
    );
    Ok(report)
}
