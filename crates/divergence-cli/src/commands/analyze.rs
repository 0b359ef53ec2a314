//! Analyze command - compare both cohorts at a single position

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use divergence_core::{ChessRules, MoveStatsProvider, Position, RatingBand, analyze};
use divergence_explorer::{LichessExplorer, ShakmatyRules};

use crate::app_config::AppConfig;

#[derive(Parser, Debug)]
#[command(about = "Run the divergence tests on one position and print the result as JSON")]
pub struct AnalyzeArgs {
    /// Position to analyze
    #[arg(long)]
    pub fen: String,

    /// YAML config file (defaults are used when omitted)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Base cohort rating band
    #[arg(long)]
    pub base: Option<RatingBand>,

    /// Target cohort rating band
    #[arg(long)]
    pub target: Option<RatingBand>,
}

pub fn execute(args: AnalyzeArgs) -> Result<()> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(base) = args.base {
        config.walk.base_rating_band = base;
    }
    if let Some(target) = args.target {
        config.walk.target_rating_band = target;
    }
    config.validate()?;

    let position = Position::new(args.fen.trim());
    if !ShakmatyRules::new().is_legal_position(&position) {
        bail!("'{position}' is not a legal position");
    }

    let explorer =
        LichessExplorer::new(config.explorer.clone()).context("failed to set up explorer client")?;
    let base = explorer
        .fetch(&position, config.walk.base_rating_band)
        .with_context(|| format!("no stats for band {}", config.walk.base_rating_band))?;
    let target = explorer
        .fetch(&position, config.walk.target_rating_band)
        .with_context(|| format!("no stats for band {}", config.walk.target_rating_band))?;

    let result = analyze(&base, &target, &config.walk.thresholds());
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
