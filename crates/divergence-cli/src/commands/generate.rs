//! Generate command - walk the opening tree and store divergence puzzles

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use divergence_core::{CancelToken, RatingBand, RunReport, WalkOutcome, run_walks_with_hook};
use divergence_explorer::{JsonlStore, LichessExplorer, ShakmatyRules};
use tracing::info;

use crate::app_config::AppConfig;

#[derive(Parser, Debug)]
#[command(about = "Run random walks and store every divergence puzzle found")]
pub struct GenerateArgs {
    /// YAML config file (defaults are used when omitted)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of walks to run
    #[arg(long, short = 'n')]
    pub walks: Option<usize>,

    /// Base cohort rating band (0, 1000, 1200, ..., 2500)
    #[arg(long)]
    pub base: Option<RatingBand>,

    /// Target cohort rating band
    #[arg(long)]
    pub target: Option<RatingBand>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads running walks in parallel
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,

    /// Maximum walk depth in plies
    #[arg(long)]
    pub max_ply: Option<usize>,

    /// JSON Lines file puzzles are appended to
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    /// Command-line flags override the config file.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(walks) = self.walks {
            config.walk.number_of_walks = walks;
        }
        if let Some(base) = self.base {
            config.walk.base_rating_band = base;
        }
        if let Some(target) = self.target {
            config.walk.target_rating_band = target;
        }
        if let Some(seed) = self.seed {
            config.walk.seed = seed;
        }
        if let Some(workers) = self.workers {
            config.walk.workers = workers;
        }
        if let Some(max_ply) = self.max_ply {
            config.walk.max_ply = max_ply;
        }
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
    }
}

pub fn execute(args: GenerateArgs) -> Result<()> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    let explorer =
        LichessExplorer::new(config.explorer.clone()).context("failed to set up explorer client")?;
    let rules = ShakmatyRules::new();
    let mut store = JsonlStore::open(&config.output.path).with_context(|| {
        format!(
            "failed to open puzzle store {}",
            config.output.path.display()
        )
    })?;
    let first_index = store.next_index();

    let report = run_walks_with_hook(
        &config.walk,
        &explorer,
        &rules,
        &mut store,
        &CancelToken::new(),
        |walk, outcome| log_outcome(walk, outcome),
    )
    .context("run aborted")?;

    println!("{}", summary(&report, &config, first_index));
    Ok(())
}

fn log_outcome(walk: usize, outcome: &WalkOutcome) {
    match outcome {
        WalkOutcome::Found(puzzle) => info!(
            walk,
            ply = puzzle.ply(),
            fen = puzzle.fen(),
            diverging_move = puzzle.diverging_move().unwrap_or("-"),
            "puzzle found"
        ),
        WalkOutcome::Rejected { ply, error, .. } => {
            info!(walk, ply, %error, "candidate rejected")
        }
        WalkOutcome::NoPuzzle { reason, ply } => info!(walk, ply, %reason, "walk ended"),
    }
}

/// Human readable end-of-run report.
pub fn summary(report: &RunReport, config: &AppConfig, first_index: u64) -> String {
    let mut lines = vec![
        format!(
            "{} vs {}: {} of {} walks run",
            config.walk.base_rating_band,
            config.walk.target_rating_band,
            report.walks_attempted,
            report.walks_requested
        ),
        format!("  puzzles found:        {}", report.puzzles_found),
        format!("  abandoned (no data):  {}", report.walks_abandoned),
        format!("  rejected candidates:  {}", report.candidates_rejected),
        format!("  no divergence:        {}", report.walks_exhausted),
    ];
    if report.walks_cancelled > 0 {
        lines.push(format!("  cancelled:            {}", report.walks_cancelled));
    }
    if report.sink_failures > 0 {
        lines.push(format!("  store failures:       {}", report.sink_failures));
    }
    let stored = report.puzzles_found.saturating_sub(report.sink_failures) as u64;
    if stored > 0 {
        lines.push(format!(
            "  stored as #{}..#{} in {}",
            first_index,
            first_index + stored - 1,
            config.output.path.display()
        ));
    }
    lines.join("\n")
}
