mod config;
mod error;
mod lichess;
mod rules;
mod store;

#[cfg(test)]
mod tests;

pub use config::ExplorerConfig;
pub use error::ExplorerError;
pub use lichess::{
    ExplorerTransport, HttpTransport, LichessExplorer, RawReply, TransportFailure,
    parse_explorer_response,
};
pub use rules::ShakmatyRules;
pub use store::{JsonlStore, StoredPuzzle, load_puzzles};
