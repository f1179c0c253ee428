use std::path::Path;

use serde::Serialize;

use super::HistoryStack;
use crate::engine::GameState;
use crate::serialization::{self as ser, ParseError, SaveError};

/// Playback copy of the undo history plus its cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Replay {
    /// Pause between frames, in milliseconds.
    pub delay: u64,
    /// Undo depth when the replay was built.
    pub nmoves: usize,
    /// Count of the node under the cursor (1-based from the bottom), 0 before the first frame.
    pub itcount: usize,
    /// Oldest snapshot on top.
    pub stack: HistoryStack,
}

/// Undo, redo and replay stacks for one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MovesHistory {
    did_undo: bool,
    undo: HistoryStack,
    redo: HistoryStack,
    replay: Replay,
}

impl MovesHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(did_undo: bool, undo: HistoryStack, redo: HistoryStack, replay: Replay) -> Self {
        MovesHistory { did_undo, undo, redo, replay }
    }

    /// Whether the player has undone a move since the last hard reset.
    #[inline]
    pub fn did_undo(&self) -> bool { self.did_undo }

    #[inline]
    pub fn undo_stack(&self) -> &HistoryStack { &self.undo }

    #[inline]
    pub fn redo_stack(&self) -> &HistoryStack { &self.redo }

    #[inline]
    pub fn replay(&self) -> &Replay { &self.replay }

    /// Hard reset: drop all stacks and forget past undos.
    pub fn clear(&mut self) {
        *self = MovesHistory::default();
    }

    /// Commit the state a move is about to be applied to.
    ///
    /// A new move invalidates everything that could have been redone.
    pub fn record_move(&mut self, pre_move: &GameState) {
        self.undo.push(pre_move);
        self.redo.clear();
    }

    /// Step `current` back to the last committed snapshot.
    ///
    /// `current` is kept on the redo stack. Returns false when there is nothing to undo.
    pub fn undo(&mut self, current: &mut GameState) -> bool {
        let Some(previous) = self.undo.peek_state() else {
            return false;
        };
        self.redo.push(current);
        current.copy_from(previous);
        self.undo.pop();
        self.did_undo = true;
        true
    }

    /// Re-apply the most recently undone snapshot. Returns false when there is nothing to redo.
    pub fn redo(&mut self, current: &mut GameState) -> bool {
        let Some(next) = self.redo.peek_state() else {
            return false;
        };
        self.undo.push(current);
        current.copy_from(next);
        self.redo.pop();
        true
    }

    /// Build the replay stack from the undo history.
    pub fn new_replay_stack(&mut self, delay: u64) {
        let stack = self.undo.duplicate_reversed();
        self.set_replay(delay, stack);
    }

    /// Build the replay stack from the undo history followed by `last`.
    ///
    /// Undo snapshots are pre-move states, so `last` is usually the live board.
    /// The undo and redo stacks are left as they are.
    pub fn new_replay_stack_ending_at(&mut self, delay: u64, last: &GameState) {
        let mut frames = self.undo.clone();
        frames.push(last);
        self.set_replay(delay, frames.duplicate_reversed());
    }

    fn set_replay(&mut self, delay: u64, stack: HistoryStack) {
        self.replay = Replay { delay, nmoves: stack.len(), itcount: 0, stack };
        log::debug!("built replay of {} moves (delay {} ms)", self.replay.nmoves, delay);
    }

    /// Position the replay cursor on the oldest snapshot.
    pub fn replay_first(&mut self) -> Option<&GameState> {
        let count = self.replay.stack.top()?.count();
        self.replay_seek(count)
    }

    /// Position the replay cursor on the newest snapshot.
    pub fn replay_last(&mut self) -> Option<&GameState> {
        let count = self.replay.stack.bottom()?.count();
        self.replay_seek(count)
    }

    /// Advance one snapshot forward in time. At the end the cursor stays put.
    pub fn replay_next(&mut self) -> Option<&GameState> {
        if self.replay.itcount == 0 {
            return self.replay_first();
        }
        let node = self.replay.stack.node(self.replay.itcount)?;
        let count = self.replay.stack.below(node)?.count();
        self.replay_seek(count)
    }

    /// Step one snapshot back in time. At the start the cursor stays put.
    pub fn replay_prev(&mut self) -> Option<&GameState> {
        let node = self.replay.stack.node(self.replay.itcount)?;
        let count = self.replay.stack.above(node)?.count();
        self.replay_seek(count)
    }

    /// Snapshot under the cursor.
    pub fn replay_current(&self) -> Option<&GameState> {
        self.replay.stack.node(self.replay.itcount).map(|node| node.state())
    }

    /// `(frames shown, total frames)` for progress display.
    pub fn replay_progress(&self) -> (usize, usize) {
        let total = self.replay.stack.len();
        let shown = match self.replay.itcount {
            0 => 0,
            count => (total + 1).saturating_sub(count),
        };
        (shown, total)
    }

    fn replay_seek(&mut self, count: usize) -> Option<&GameState> {
        self.replay.itcount = count;
        self.replay_current()
    }

    /// Text form of the whole history, as written to save files.
    pub fn encode(&self) -> String {
        ser::encode_history(self)
    }

    pub fn decode(text: &str) -> Result<Self, ParseError> {
        ser::parse_history(text)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SaveError> {
        ser::write_history_to_path(path, self)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SaveError> {
        ser::read_history_from_path(path)
    }

    /// Replace this history with the one stored at `path`.
    ///
    /// On error `self` is left exactly as it was.
    pub fn reload<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SaveError> {
        *self = Self::load(path)?;
        Ok(())
    }
}
