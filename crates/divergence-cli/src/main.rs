//! divergence - find positions where two rating cohorts disagree on the move

mod app_config;
mod commands;
mod logging;


use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "divergence")]
#[command(version, about = "Generate chess puzzles from rating-cohort divergences", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run walks and append found puzzles to the store
    Generate(commands::generate::GenerateArgs),

    /// Compare both cohorts at one position
    Analyze(commands::analyze::AnalyzeArgs),

    /// Print the default configuration as YAML
    DefaultConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args),
        Commands::Analyze(args) => commands::analyze::execute(args),
        Commands::DefaultConfig => commands::default_config::execute(),
    }
}
