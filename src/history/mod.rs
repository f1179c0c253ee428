//! Undo/redo/replay history built from deep-copied game snapshots.
//!
//! - [`HistoryStack`]: a stack of [`HistoryNode`]s, each owning one `GameState`.
//! - [`MovesHistory`]: the undo, redo and replay stacks of a game, plus the
//!   sticky "player undid a move" flag.
//!
//! Commit protocol used by callers:
//! ```
//! use slide_2048::engine::{GameState, Move};
//! use slide_2048::history::MovesHistory;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut state = GameState::new(4).unwrap();
//! state.reset(&mut rng).unwrap();
//! let mut history = MovesHistory::new();
//!
//! for dir in Move::ALL {
//!     let before = state.clone();
//!     if state.make_move(dir, &mut rng).unwrap() {
//!         history.record_move(&before);
//!     }
//! }
//! let moves = history.undo_stack().len();
//! if history.undo(&mut state) {
//!     assert_eq!(history.undo_stack().len(), moves - 1);
//! }
//! ```

mod moves;
mod stack;

pub use moves::{MovesHistory, Replay};
pub use stack::{HistoryNode, HistoryStack};
