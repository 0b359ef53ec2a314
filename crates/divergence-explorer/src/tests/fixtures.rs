use std::{
    collections::VecDeque,
    sync::Mutex,
};

use divergence_core::{
    CohortDistribution, Position, PuzzleBuilder, PuzzleRecord, RatingBand, STANDARD_START_FEN,
    Thresholds, WalkState, analyze,
};

use crate::{ExplorerConfig, ExplorerTransport, RawReply, ShakmatyRules, TransportFailure};

pub(super) const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

pub(super) const START_BODY: &str = r#"{
  "white": 100, "draws": 50, "black": 60,
  "moves": [
    {"uci": "e2e4", "san": "e4", "averageRating": 2011, "white": 60, "draws": 30, "black": 30, "game": null},
    {"uci": "d2d4", "san": "d4", "averageRating": 2020, "white": 40, "draws": 20, "black": 30, "game": null}
  ],
  "topGames": [],
  "opening": null
}"#;

/// Replays canned replies in order and records every query it was sent.
#[derive(Default)]
pub(super) struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<RawReply, TransportFailure>>>,
    queries: Mutex<Vec<Vec<(&'static str, String)>>>,
}

impl ScriptedTransport {
    pub(super) fn new(replies: impl IntoIterator<Item = Result<RawReply, TransportFailure>>) -> Self {
        ScriptedTransport {
            replies: Mutex::new(replies.into_iter().collect()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.queries.lock().expect("queries lock").len()
    }

    pub(super) fn queries(&self) -> Vec<Vec<(&'static str, String)>> {
        self.queries.lock().expect("queries lock").clone()
    }
}

impl ExplorerTransport for ScriptedTransport {
    fn get(&self, _url: &str, query: &[(&'static str, String)]) -> Result<RawReply, TransportFailure> {
        self.queries.lock().expect("queries lock").push(query.to_vec());
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(TransportFailure::Other("script exhausted".to_string())))
    }
}

pub(super) fn ok(body: &str) -> Result<RawReply, TransportFailure> {
    Ok(RawReply {
        status: 200,
        body: body.to_string(),
    })
}

pub(super) fn status(code: u16) -> Result<RawReply, TransportFailure> {
    Ok(RawReply {
        status: code,
        body: String::new(),
    })
}

/// No throttling and no backoff so tests do not sleep.
pub(super) fn fast_config() -> ExplorerConfig {
    ExplorerConfig {
        rate_limit_delay_ms: 0,
        backoff_ms: 0,
        max_retries: 2,
        ..ExplorerConfig::default()
    }
}

/// A validated puzzle one ply after 1. e4.
pub(super) fn sicilian_record() -> PuzzleRecord {
    let rules = ShakmatyRules::new();
    let thresholds = Thresholds {
        min_games: 10,
        min_win_rate_delta: 0.07,
        significance_level: 0.05,
    };
    let base = CohortDistribution::from_counts(RatingBand::From1600, [("e7e5", 80), ("c7c5", 20)]);
    let target =
        CohortDistribution::from_counts(RatingBand::From2000, [("e7e5", 20), ("c7c5", 80)]);
    let result = analyze(&base, &target, &thresholds);

    let mut state = WalkState::new(Position::from(STANDARD_START_FEN));
    assert!(state.advance(Position::from(AFTER_E4), "e2e4"));

    PuzzleBuilder::new(&rules, thresholds)
        .build(state.position(), result, &state, &base, &target)
        .expect("sicilian candidate validates")
}
