use std::collections::HashSet;

use crate::cohort::Position;

/// Mutable state of one trajectory. Owned by a single walk and dropped with it.
#[derive(Debug, Clone)]
pub struct WalkState {
    current: Position,
    ply: usize,
    history: Vec<Position>,
    moves: Vec<String>,
    visited: HashSet<String>,
    terminal: bool,
}

impl WalkState {
    /// Start a trajectory at `start` with ply 0.
    pub fn new(start: Position) -> Self {
        let mut visited = HashSet::new();
        visited.insert(start.repetition_key());
        WalkState {
            current: start.clone(),
            ply: 0,
            history: vec![start],
            moves: Vec::new(),
            visited,
            terminal: false,
        }
    }

    pub fn position(&self) -> &Position {
        &self.current
    }

    /// First position of the trajectory.
    pub fn start(&self) -> &Position {
        &self.history[0]
    }

    pub fn ply(&self) -> usize {
        self.ply
    }

    /// Every visited position, start first.
    pub fn history(&self) -> &[Position] {
        &self.history
    }

    /// Moves played from the start, in order.
    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn mark_terminal(&mut self) {
        self.terminal = true;
    }

    /// Move to `next` via `uci`. A repeated position ends the trajectory
    /// instead: the state is marked terminal and `false` is returned.
    pub fn advance(&mut self, next: Position, uci: impl Into<String>) -> bool {
        if !self.visited.insert(next.repetition_key()) {
            self.terminal = true;
            return false;
        }
        self.current = next.clone();
        self.history.push(next);
        self.moves.push(uci.into());
        self.ply += 1;
        true
    }
}
