//! Board merge engine and game state.
//!
//! The engine works on square boards of side 4, 5, 6 or 8. Each side has a
//! fixed winning tile (the sentinel) and a fixed number of tiles spawned after
//! every successful move:
//!
//! ```text
//! dim  sentinel  spawned per move
//!  4     2048          1
//!  5    65536          1
//!  6     2048          2
//!  8    16384          1
//! ```
//!
//! Quick start:
//! ```
//! use slide_2048::engine::{GameState, Move};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut state = GameState::new(4).unwrap();
//! state.reset(&mut rng).unwrap();
//! let _moved = state.make_move(Move::Left, &mut rng).unwrap();
//! assert!(state.board().empty_count() < 16);
//! ```

use serde::Serialize;

mod board;
pub mod state;

pub use board::{Board, Shift};
pub use state::GameState;

/// Tile value stored in a board cell (0 = empty).
pub type Tile = u32;
/// Accumulated points.
pub type Score = u64;

/// Supported sides as `(dim, sentinel, spawned per move)`. The first row is the default.
const DIM_PARAMS: [(usize, Tile, usize); 4] = [(4, 2048, 1), (5, 65536, 1), (6, 2048, 2), (8, 16384, 1)];

/// Board side used when nothing else is requested.
pub const DEFAULT_DIM: usize = DIM_PARAMS[0].0;
/// Sentinel and spawn count of [`DEFAULT_DIM`].
pub(crate) const DEFAULT_PARAMS: (Tile, usize) = (DIM_PARAMS[0].1, DIM_PARAMS[0].2);

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four directions, in wire-code order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Wire code of an optional direction (NONE=0, UP=1, DOWN=2, LEFT=3, RIGHT=4).
    #[inline]
    pub fn code(dir: Option<Move>) -> u32 {
        match dir {
            None => 0,
            Some(Move::Up) => 1,
            Some(Move::Down) => 2,
            Some(Move::Left) => 3,
            Some(Move::Right) => 4,
        }
    }

    /// Inverse of [`Move::code`]. Out-of-range codes are rejected.
    #[inline]
    pub fn from_code(code: u32) -> Result<Option<Move>, EngineError> {
        match code {
            0 => Ok(None),
            1 => Ok(Some(Move::Up)),
            2 => Ok(Some(Move::Down)),
            3 => Ok(Some(Move::Left)),
            4 => Ok(Some(Move::Right)),
            other => Err(EngineError::InvalidDirection(other)),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("unsupported board dimension {0} (expected 4, 5, 6 or 8)")]
    InvalidDimension(usize),
    #[error("board has no empty cell")]
    BoardFull,
    #[error("invalid direction code {0}")]
    InvalidDirection(u32),
    #[error("expected {expected} tiles, found {found}")]
    TileCount { expected: usize, found: usize },
}

/// Sentinel and spawn count for a supported board side.
pub(crate) fn dim_params(dim: usize) -> Result<(Tile, usize), EngineError> {
    DIM_PARAMS
        .iter()
        .find(|(d, _, _)| *d == dim)
        .map(|&(_, sentinel, nrandom)| (sentinel, nrandom))
        .ok_or(EngineError::InvalidDimension(dim))
}
