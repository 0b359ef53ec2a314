use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for explorer configuration, HTTP client setup and the puzzle store.
pub enum ExplorerError {
    #[error("failed to access puzzle store: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode or decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("puzzle store line {line} is malformed: {reason}")]
    MalformedStoreLine { line: usize, reason: String },

    #[error("invalid explorer config: {0}")]
    InvalidConfig(String),
}
