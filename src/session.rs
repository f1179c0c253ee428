//! Single-player game loop glue: moves, undo/redo, new games and replay files.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::config::{self, Config};
use crate::engine::{Board, EngineError, GameState, Move, Score};
use crate::history::MovesHistory;
use crate::serialization::SaveError;

/// Outcome of [`Session::play`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// The board changed.
    Moved,
    /// Nothing could slide in that direction; the state is unchanged.
    Blocked,
    /// The board changed and the sentinel tile appeared for the first time.
    Won,
    /// No direction can change the board any more.
    GameOver,
}

/// A game in progress with its history.
#[derive(Debug)]
pub struct Session<R: Rng> {
    config: Config,
    state: GameState,
    history: MovesHistory,
    rng: R,
}

impl<R: Rng> Session<R> {
    /// Start a new game of `config.dim`.
    pub fn new(config: Config, rng: R) -> Result<Self, EngineError> {
        let state = GameState::new(config.dim)?;
        let mut session = Session { config, state, history: MovesHistory::new(), rng };
        session.new_game()?;
        Ok(session)
    }

    #[inline]
    pub fn config(&self) -> &Config { &self.config }

    #[inline]
    pub fn state(&self) -> &GameState { &self.state }

    #[inline]
    pub fn history(&self) -> &MovesHistory { &self.history }

    /// Apply `dir`, committing the pre-move snapshot when the board changed.
    pub fn play(&mut self, dir: Move) -> Result<MoveResult, EngineError> {
        let was_won = self.state.is_won();
        let snapshot = self.state.clone();
        if !self.state.make_move(dir, &mut self.rng)? {
            return Ok(if self.is_over() { MoveResult::GameOver } else { MoveResult::Blocked });
        }
        self.history.record_move(&snapshot);

        if self.state.is_won() && !was_won {
            log::info!("reached {} with score {}", self.state.board().sentinel(), self.state.score());
            Ok(MoveResult::Won)
        } else if self.is_over() {
            Ok(MoveResult::GameOver)
        } else {
            Ok(MoveResult::Moved)
        }
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.state)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.state)
    }

    /// True once no move can change the board.
    pub fn is_over(&self) -> bool {
        self.state.board().is_stuck()
    }

    /// Reset the board and score and drop all history. The best score is kept.
    pub fn new_game(&mut self) -> Result<(), EngineError> {
        self.state.reset(&mut self.rng)?;
        self.history.clear();
        Ok(())
    }

    /// Switch to a `dim`-sided board and start over.
    ///
    /// An invalid `dim` leaves the session untouched.
    pub fn resize(&mut self, dim: usize) -> Result<(), EngineError> {
        let board = Board::new(dim)?;
        let old = self.state.replace_board(board);
        log::debug!("resized board {} -> {}", old.dim(), dim);
        self.config.dim = dim;
        self.new_game()
    }

    /// Whether the current best score may be recorded: undoing forfeits it.
    pub fn best_score_eligible(&self) -> bool {
        !self.history.did_undo()
    }

    /// Best score if it counts, `None` after any undo.
    pub fn recorded_best(&self) -> Option<Score> {
        self.best_score_eligible().then(|| self.state.best_score())
    }

    /// Write the game so far as a replay file under `dir` and return its path.
    ///
    /// Undo and redo stacks are written as they are; the replay ends on the current board.
    /// The live history is not modified.
    pub fn save_replay<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf, SaveError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let mut saved = self.history.clone();
        saved.new_replay_stack_ending_at(self.config.replay_delay_ms, &self.state);

        let path = config::replay_file_path(dir);
        saved.save(&path)?;
        log::info!("saved replay of {} frames to {}", saved.replay().nmoves, path.display());
        Ok(path)
    }

    /// [`save_replay`](Self::save_replay) into the configured replays folder.
    pub fn save_replay_default(&self) -> Result<PathBuf, SaveError> {
        self.save_replay(&self.config.replays_dir)
    }
}
