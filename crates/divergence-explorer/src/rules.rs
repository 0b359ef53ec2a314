use divergence_core::{ChessRules, Position, RulesError};
use shakmaty::{
    CastlingMode, Chess, EnPassantMode, Position as _,
    fen::Fen,
    uci::UciMove,
};

/// Standard chess rules backed by `shakmaty`.
///
/// Moves are listed and reported in standard UCI, so castling is the king's
/// destination square (`e1g1`), never king onto rook (`e1h1`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ShakmatyRules;

impl ShakmatyRules {
    pub fn new() -> Self {
        ShakmatyRules
    }

    fn board(&self, position: &Position) -> Result<Chess, RulesError> {
        parse_board(position.fen()).map_err(|reason| RulesError::InvalidPosition {
            fen: position.fen().to_string(),
            reason,
        })
    }
}

impl ChessRules for ShakmatyRules {
    fn is_legal_position(&self, position: &Position) -> bool {
        self.board(position).is_ok()
    }

    fn apply_move(&self, position: &Position, uci: &str) -> Result<Position, RulesError> {
        let board = self.board(position)?;
        let illegal = || RulesError::IllegalMove {
            fen: position.fen().to_string(),
            uci: uci.to_string(),
        };

        let parsed = UciMove::from_ascii(uci.as_bytes()).map_err(|_| illegal())?;
        let chess_move = parsed.to_move(&board).map_err(|_| illegal())?;
        let next = board.play(&chess_move).map_err(|_| illegal())?;
        let fen = Fen(next.into_setup(EnPassantMode::Legal));
        Ok(Position::new(fen.to_string()))
    }

    fn legal_moves(&self, position: &Position) -> Result<Vec<String>, RulesError> {
        let board = self.board(position)?;
        Ok(board
            .legal_moves()
            .iter()
            .map(|chess_move| chess_move.to_uci(CastlingMode::Standard).to_string())
            .collect())
    }
}

pub(crate) fn parse_board(fen: &str) -> Result<Chess, String> {
    let fen = Fen::from_ascii(fen.as_bytes()).map_err(|err| err.to_string())?;
    fen.into_position::<Chess>(CastlingMode::Standard)
        .map_err(|err| err.to_string())
}

/// Rewrite `uci` in standard notation for `board`. Moves that do not parse
/// or are not legal here pass through unchanged.
pub(crate) fn standard_uci(board: &Chess, uci: &str) -> String {
    UciMove::from_ascii(uci.as_bytes())
        .ok()
        .and_then(|parsed| parsed.to_move(board).ok())
        .map(|chess_move| chess_move.to_uci(CastlingMode::Standard).to_string())
        .unwrap_or_else(|| uci.to_string())
}
