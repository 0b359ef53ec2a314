use std::{
    sync::{Mutex, PoisonError},
    thread,
    time::Instant,
};

use divergence_core::{
    CohortDistribution, DataUnavailable, MoveStatRow, MoveStatsProvider, Position, RatingBand,
};
use serde::Deserialize;
use shakmaty::{Color, Position as _};
use tracing::{debug, warn};

use crate::{
    config::ExplorerConfig,
    error::ExplorerError,
    rules::{parse_board, standard_uci},
};

/// Status and body of one explorer response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReply {
    pub status: u16,
    pub body: String,
}

/// Transport-level failure before any status line was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Connect(String),
    Other(String),
}

/// Performs the GET request behind `LichessExplorer`.
pub trait ExplorerTransport {
    fn get(&self, url: &str, query: &[(&'static str, String)]) -> Result<RawReply, TransportFailure>;
}

/// Blocking HTTP transport with the configured timeout applied to every request.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ExplorerConfig) -> Result<Self, ExplorerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(HttpTransport {
            client,
            token: config.token.clone(),
        })
    }
}

impl ExplorerTransport for HttpTransport {
    fn get(&self, url: &str, query: &[(&'static str, String)]) -> Result<RawReply, TransportFailure> {
        let mut request = self
            .client
            .get(url)
            .query(query)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(classify_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(classify_reqwest_error)?;
        Ok(RawReply { status, body })
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        TransportFailure::Timeout
    } else if err.is_connect() {
        TransportFailure::Connect(err.to_string())
    } else {
        TransportFailure::Other(err.to_string())
    }
}

enum Attempt {
    Retry(DataUnavailable),
    Fail(DataUnavailable),
}

/// Opening explorer client implementing `MoveStatsProvider`.
///
/// Requests from every walk share one throttle so that two consecutive
/// requests are at least `rate_limit_delay_ms` apart. Timeouts, rate limiting
/// and server errors are retried with exponential backoff up to `max_retries`.
pub struct LichessExplorer<T = HttpTransport> {
    config: ExplorerConfig,
    transport: T,
    last_request: Mutex<Option<Instant>>,
}

impl LichessExplorer<HttpTransport> {
    pub fn new(config: ExplorerConfig) -> Result<Self, ExplorerError> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: ExplorerTransport> LichessExplorer<T> {
    pub fn with_transport(config: ExplorerConfig, transport: T) -> Self {
        LichessExplorer {
            config,
            transport,
            last_request: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Query parameters for one position and band.
    pub fn query(&self, position: &Position, band: RatingBand) -> Vec<(&'static str, String)> {
        vec![
            ("variant", self.config.variant.clone()),
            ("fen", position.fen().to_string()),
            ("speeds", self.config.speeds.join(",")),
            ("ratings", band.label()),
            ("moves", self.config.max_moves.to_string()),
            ("topGames", "0".to_string()),
            ("recentGames", "0".to_string()),
        ]
    }

    fn throttle(&self) {
        let delay = self.config.rate_limit_delay();
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < delay {
                thread::sleep(delay - elapsed);
            }
        }
        *last = Some(Instant::now());
    }

    fn attempt(&self, position: &Position, band: RatingBand) -> Result<CohortDistribution, Attempt> {
        self.throttle();
        let query = self.query(position, band);
        let reply = match self.transport.get(&self.config.base_url, &query) {
            Ok(reply) => reply,
            Err(TransportFailure::Timeout) => {
                return Err(Attempt::Retry(DataUnavailable::Timeout));
            }
            Err(TransportFailure::Connect(reason)) => {
                return Err(Attempt::Retry(DataUnavailable::Unreachable(reason)));
            }
            Err(TransportFailure::Other(reason)) => {
                return Err(Attempt::Fail(DataUnavailable::Unreachable(reason)));
            }
        };

        match reply.status {
            200..=299 => parse_explorer_response(&reply.body, band, position)
                .map_err(Attempt::Fail),
            429 => Err(Attempt::Retry(DataUnavailable::RateLimited)),
            500..=599 => Err(Attempt::Retry(DataUnavailable::Unreachable(format!(
                "server error {}",
                reply.status
            )))),
            status => Err(Attempt::Fail(DataUnavailable::Unreachable(format!(
                "unexpected status {status}"
            )))),
        }
    }
}

impl<T: ExplorerTransport> MoveStatsProvider for LichessExplorer<T> {
    fn fetch(
        &self,
        position: &Position,
        band: RatingBand,
    ) -> Result<CohortDistribution, DataUnavailable> {
        let mut attempt = 0;
        loop {
            match self.attempt(position, band) {
                Ok(distribution) => {
                    debug!(
                        band = %band,
                        total_games = distribution.total_games(),
                        moves = distribution.move_count(),
                        "fetched explorer stats"
                    );
                    return Ok(distribution);
                }
                Err(Attempt::Retry(reason)) if attempt < self.config.max_retries => {
                    let delay = self.config.backoff(attempt);
                    warn!(
                        band = %band,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        %reason,
                        "retrying explorer request"
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(Attempt::Retry(reason)) | Err(Attempt::Fail(reason)) => return Err(reason),
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    #[serde(default)]
    moves: Vec<ExplorerMove>,
}

#[derive(Debug, Deserialize)]
struct ExplorerMove {
    uci: String,
    #[serde(default)]
    white: u64,
    #[serde(default)]
    draws: u64,
    #[serde(default)]
    black: u64,
}

/// Turn an explorer JSON body into a distribution.
///
/// Outcomes are rewritten from the side to move's perspective: for a position
/// with black to move, black's results count as wins. Castling reported as
/// king onto rook (`e1h1`) is rewritten to the king's destination (`e1g1`).
/// The total is the sum of the per-move counts; a response without any games
/// is `NoGames`.
pub fn parse_explorer_response(
    body: &str,
    band: RatingBand,
    position: &Position,
) -> Result<CohortDistribution, DataUnavailable> {
    let board = parse_board(position.fen())
        .map_err(|reason| DataUnavailable::Malformed(format!("unreadable FEN: {reason}")))?;
    let mover = board.turn();
    let response: ExplorerResponse = serde_json::from_str(body)
        .map_err(|err| DataUnavailable::Malformed(err.to_string()))?;

    let rows = response.moves.into_iter().map(|entry| {
        let (wins, losses) = match mover {
            Color::White => (entry.white, entry.black),
            Color::Black => (entry.black, entry.white),
        };
        MoveStatRow::with_outcomes(standard_uci(&board, &entry.uci), wins, entry.draws, losses)
    });
    let distribution = CohortDistribution::new(band, rows);
    if distribution.is_empty() {
        return Err(DataUnavailable::NoGames);
    }
    Ok(distribution)
}
