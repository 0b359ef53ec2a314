use std::fmt;

use crate::config::ConfigError;

/// Failure reported by the chess-rules boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// The FEN could not be parsed or describes an illegal board.
    InvalidPosition { fen: String, reason: String },
    /// The move is malformed or not legal in the given position.
    IllegalMove { fen: String, uci: String },
}

impl fmt::Display for RulesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulesError::InvalidPosition { fen, reason } => {
                write!(f, "invalid position '{fen}': {reason}")
            }
            RulesError::IllegalMove { fen, uci } => {
                write!(f, "move {uci} is not legal in position '{fen}'")
            }
        }
    }
}

impl std::error::Error for RulesError {}

/// A puzzle append that did not complete. The record was not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkError {
    message: String,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        SinkError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to append puzzle: {}", self.message)
    }
}

impl std::error::Error for SinkError {}

/// Errors that abort a whole run before any walk starts.
#[derive(Debug)]
pub enum RunError {
    Config(ConfigError),
    ThreadPool(String),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Config(err) => write!(f, "{err}"),
            RunError::ThreadPool(err) => write!(f, "failed to build walk thread pool: {err}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Config(err) => Some(err),
            RunError::ThreadPool(_) => None,
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(err: ConfigError) -> Self {
        RunError::Config(err)
    }
}
