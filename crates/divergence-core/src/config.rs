use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{analysis::analyzer::Thresholds, band::RatingBand, cohort::Position};

const DEFAULT_WALK_CONFIG_YAML: &str = include_str!("../config/walk.default.yaml");

/// FEN of the standard chess starting position.
pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// How the next move is drawn from the target cohort's distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingPolicy {
    /// Weight each move by how often the target cohort played it.
    #[default]
    TargetFrequency,
    /// Every move the target cohort played is equally likely.
    Uniform,
}

/// Move sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub policy: SamplingPolicy,
    /// Weights are raised to `1 / temperature`; above 1 flattens, below 1 sharpens.
    pub temperature: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            policy: SamplingPolicy::TargetFrequency,
            temperature: 1.0,
        }
    }
}

/// Process-wide walk configuration. Read-only once validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    pub base_rating_band: RatingBand,
    pub target_rating_band: RatingBand,
    pub min_games: u64,
    pub min_win_rate_delta: f64,
    pub significance_level: f64,
    pub max_ply: usize,
    pub min_ply: usize,
    pub number_of_walks: usize,
    pub start_fen: String,
    pub sampling: SamplingConfig,
    pub seed: u64,
    pub workers: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        WalkConfig {
            base_rating_band: RatingBand::From2000,
            target_rating_band: RatingBand::From2500,
            min_games: 50,
            min_win_rate_delta: 0.07,
            significance_level: 0.05,
            max_ply: 20,
            min_ply: 0,
            number_of_walks: 10,
            start_fen: STANDARD_START_FEN.to_string(),
            sampling: SamplingConfig::default(),
            seed: 42,
            workers: 1,
        }
    }
}

impl WalkConfig {
    /// Parse a walk config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: WalkConfig = serde_yaml::from_str(yaml).map_err(ConfigError::Yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a walk config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_WALK_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, ConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    /// Check every option. A failure here is fatal for the whole run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_rating_band == self.target_rating_band {
            return Err(ConfigError::Invalid(format!(
                "base and target rating bands must differ, both are {}",
                self.base_rating_band
            )));
        }
        if self.min_games == 0 {
            return Err(ConfigError::Invalid(
                "min_games must be greater than 0".to_string(),
            ));
        }
        if !self.min_win_rate_delta.is_finite()
            || self.min_win_rate_delta <= 0.0
            || self.min_win_rate_delta > 1.0
        {
            return Err(ConfigError::Invalid(
                "min_win_rate_delta must be within (0, 1]".to_string(),
            ));
        }
        if !self.significance_level.is_finite()
            || self.significance_level <= 0.0
            || self.significance_level >= 1.0
        {
            return Err(ConfigError::Invalid(
                "significance_level must be within (0, 1)".to_string(),
            ));
        }
        if self.min_ply > self.max_ply {
            return Err(ConfigError::Invalid(
                "min_ply must not exceed max_ply".to_string(),
            ));
        }
        if self.number_of_walks == 0 {
            return Err(ConfigError::Invalid(
                "number_of_walks must be greater than 0".to_string(),
            ));
        }
        if self.start_fen.trim().is_empty() {
            return Err(ConfigError::Invalid("start_fen must not be empty".to_string()));
        }
        if !self.sampling.temperature.is_finite() || self.sampling.temperature <= 0.0 {
            return Err(ConfigError::Invalid(
                "sampling.temperature must be finite and > 0".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(ConfigError::Invalid(
                "workers must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Statistical thresholds handed to the analyzer.
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            min_games: self.min_games,
            min_win_rate_delta: self.min_win_rate_delta,
            significance_level: self.significance_level,
        }
    }

    /// Position every walk starts from.
    pub fn start_position(&self) -> Position {
        Position::new(self.start_fen.trim())
    }
}

/// Error type for loading and validating `WalkConfig`.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    UnknownRatingBand(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read config file: {err}"),
            ConfigError::Yaml(err) => write!(f, "failed to parse config YAML: {err}"),
            ConfigError::UnknownRatingBand(band) => write!(
                f,
                "unsupported rating band '{band}', expected one of 0, 1000, 1200, 1400, 1600, 1800, 2000, 2200, 2500"
            ),
            ConfigError::Invalid(err) => write!(f, "invalid walk config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}
