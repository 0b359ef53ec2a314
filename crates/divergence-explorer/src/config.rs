use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::ExplorerError;

const DEFAULT_EXPLORER_CONFIG_YAML: &str = include_str!("../config/explorer.default.yaml");

const KNOWN_SPEEDS: [&str; 6] = [
    "ultraBullet",
    "bullet",
    "blitz",
    "rapid",
    "classical",
    "correspondence",
];

/// Connection settings for the opening explorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub base_url: String,
    pub variant: String,
    pub speeds: Vec<String>,
    /// Upper bound on moves returned per position.
    pub max_moves: u32,
    pub timeout_ms: u64,
    /// Minimum spacing between two requests, shared by every walk.
    pub rate_limit_delay_ms: u64,
    pub max_retries: u32,
    /// First retry delay; doubles on each further attempt.
    pub backoff_ms: u64,
    pub user_agent: String,
    /// Bearer token sent with each request when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        ExplorerConfig {
            base_url: "https://explorer.lichess.ovh/lichess".to_string(),
            variant: "standard".to_string(),
            speeds: vec![
                "blitz".to_string(),
                "rapid".to_string(),
                "classical".to_string(),
            ],
            max_moves: 30,
            timeout_ms: 10_000,
            rate_limit_delay_ms: 1_000,
            max_retries: 3,
            backoff_ms: 2_000,
            user_agent: "divergence-puzzles/0.1".to_string(),
            token: None,
        }
    }
}

impl ExplorerConfig {
    /// Parse an explorer config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ExplorerError> {
        let config: ExplorerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, ExplorerError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn default_yaml() -> &'static str {
        DEFAULT_EXPLORER_CONFIG_YAML
    }

    pub fn from_default_yaml() -> Result<Self, ExplorerError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub fn validate(&self) -> Result<(), ExplorerError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ExplorerError::InvalidConfig(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.variant.trim().is_empty() {
            return Err(ExplorerError::InvalidConfig(
                "variant must not be empty".to_string(),
            ));
        }
        if self.speeds.is_empty() {
            return Err(ExplorerError::InvalidConfig(
                "speeds must name at least one time control".to_string(),
            ));
        }
        if let Some(speed) = self
            .speeds
            .iter()
            .find(|speed| !KNOWN_SPEEDS.contains(&speed.as_str()))
        {
            return Err(ExplorerError::InvalidConfig(format!(
                "unknown speed '{speed}', expected one of {}",
                KNOWN_SPEEDS.join(", ")
            )));
        }
        if self.max_moves == 0 {
            return Err(ExplorerError::InvalidConfig(
                "max_moves must be greater than 0".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(ExplorerError::InvalidConfig(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn rate_limit_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limit_delay_ms)
    }

    /// Delay before retry number `attempt` (zero based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.min(16);
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }
}
