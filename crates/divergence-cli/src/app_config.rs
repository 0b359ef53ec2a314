use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use divergence_core::WalkConfig;
use divergence_explorer::ExplorerConfig;
use serde::{Deserialize, Serialize};

const DEFAULT_APP_CONFIG_YAML: &str = include_str!("../config/divergence.default.yaml");

/// Environment variable read when the config carries no explorer token.
pub const TOKEN_ENV: &str = "LICHESS_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            path: PathBuf::from("puzzles.jsonl"),
        }
    }
}

/// Everything the binary needs, read from one YAML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub walk: WalkConfig,
    pub explorer: ExplorerConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    pub fn default_yaml() -> &'static str {
        DEFAULT_APP_CONFIG_YAML
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(yaml).context("failed to parse config YAML")?;
        Ok(config)
    }

    /// Read `path` when given, otherwise start from the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let yaml = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                Self::from_yaml_str(&yaml)
                    .with_context(|| format!("invalid config file {}", path.display()))?
            }
            None => AppConfig::default(),
        };
        if config.explorer.token.is_none() {
            config.explorer.token = env::var(TOKEN_ENV).ok().filter(|token| !token.is_empty());
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.walk.validate().context("walk section")?;
        self.explorer.validate().context("explorer section")?;
        Ok(())
    }
}
