//! slide-2048: a 2048 board merge engine with undo/redo/replay history
//!
//! This crate provides:
//! - `Board` and `GameState` with the directional slide/merge algorithm (`engine` module)
//! - Undo, redo and replay stacks of deep-copied snapshots (`history` module)
//! - A CRLF line-oriented text format for states, stacks and save files (`serialization` module)
//! - `Session`, which drives a single-player game and writes replay files
//!
//! Quick start:
//! ```
//! use slide_2048::config::Config;
//! use slide_2048::engine::Move;
//! use slide_2048::session::{MoveResult, Session};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut session = Session::new(Config::default(), StdRng::seed_from_u64(42)).unwrap();
//! let moved = Move::ALL
//!     .into_iter()
//!     .map(|dir| session.play(dir).unwrap())
//!     .any(|r| r != MoveResult::Blocked);
//! assert!(moved);
//! assert!(session.undo());
//!
//! let text = session.history().encode();
//! assert!(text.ends_with("\r\n"));
//! ```
//!
pub mod config;
pub mod engine;
pub mod history;
pub mod serialization;
pub mod session;
