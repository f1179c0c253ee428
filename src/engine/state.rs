//! A board together with the per-game scalars that travel with it.

use std::mem;

use rand::Rng;
use serde::Serialize;

use super::{Board, EngineError, Move, Score};

/// Snapshot of a game: board, score, best score, win flag and the directions
/// shown by replay viewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    board: Board,
    score: Score,
    best_score: Score,
    won: bool,
    prev_move: Option<Move>,
    next_move: Option<Move>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::from_board(Board::default())
    }
}

impl GameState {
    /// Fresh state with an empty board of side `dim` and all scalars zeroed.
    pub fn new(dim: usize) -> Result<Self, EngineError> {
        Ok(Self::from_board(Board::new(dim)?))
    }

    pub fn from_board(board: Board) -> Self {
        GameState { board, score: 0, best_score: 0, won: false, prev_move: None, next_move: None }
    }

    /// Reassemble a state from all of its parts (used by the text parser).
    pub fn from_parts(
        board: Board,
        score: Score,
        best_score: Score,
        won: bool,
        prev_move: Option<Move>,
        next_move: Option<Move>,
    ) -> Self {
        GameState { board, score, best_score, won, prev_move, next_move }
    }

    #[inline]
    pub fn board(&self) -> &Board { &self.board }

    #[inline]
    pub fn board_mut(&mut self) -> &mut Board { &mut self.board }

    #[inline]
    pub fn score(&self) -> Score { self.score }

    #[inline]
    pub fn best_score(&self) -> Score { self.best_score }

    #[inline]
    pub fn is_won(&self) -> bool { self.won }

    #[inline]
    pub fn prev_move(&self) -> Option<Move> { self.prev_move }

    #[inline]
    pub fn next_move(&self) -> Option<Move> { self.next_move }

    /// Deep copy `src` into `self`, reusing the grid allocation when possible.
    pub fn copy_from(&mut self, src: &GameState) {
        self.clone_from(src);
    }

    /// Start a new game on the current board size.
    ///
    /// Spawns twice the per-move tile count. The best score survives.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), EngineError> {
        self.board.reset();
        let initial = 2 * self.board.nrandom();
        self.board.generate_n_tiles(initial, rng)?;
        self.score = 0;
        self.won = false;
        self.prev_move = None;
        self.next_move = None;
        Ok(())
    }

    /// Hand a new board to this state and return the one it owned.
    pub fn replace_board(&mut self, board: Board) -> Board {
        mem::replace(&mut self.board, board)
    }

    /// Add merge points, raising the best score alongside.
    pub fn add_score(&mut self, points: Score) {
        self.score = self.score.saturating_add(points);
        self.best_score = self.best_score.max(self.score);
    }

    /// Raise the best score. Lower values are ignored.
    pub fn set_best_score(&mut self, best: Score) {
        self.best_score = self.best_score.max(best);
    }

    pub fn set_won(&mut self) {
        self.won = true;
    }

    pub fn set_prev_move(&mut self, dir: Option<Move>) {
        self.prev_move = dir;
    }

    pub fn set_next_move(&mut self, dir: Option<Move>) {
        self.next_move = dir;
    }

    /// Set the previous direction from its wire code; out-of-range codes leave the state untouched.
    pub fn set_prev_move_code(&mut self, code: u32) -> Result<(), EngineError> {
        self.prev_move = Move::from_code(code)?;
        Ok(())
    }

    /// Set the next direction from its wire code; out-of-range codes leave the state untouched.
    pub fn set_next_move_code(&mut self, code: u32) -> Result<(), EngineError> {
        self.next_move = Move::from_code(code)?;
        Ok(())
    }

    /// Slide the board; on change, score the merges and spawn new tiles.
    ///
    /// Returns whether the board changed. A `false` return leaves the state as it was.
    pub fn make_move<R: Rng + ?Sized>(&mut self, dir: Move, rng: &mut R) -> Result<bool, EngineError> {
        let shift = self.board.shift(dir);
        if !shift.changed {
            return Ok(false);
        }
        self.add_score(shift.points);
        if shift.won {
            self.won = true;
        }
        self.prev_move = Some(dir);
        self.next_move = None;
        let n = self.board.nrandom();
        self.board.generate_n_tiles(n, rng)?;
        Ok(true)
    }
}
