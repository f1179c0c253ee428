use serde::Serialize;

use crate::engine::GameState;

/// One snapshot in a [`HistoryStack`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryNode {
    count: usize,
    state: GameState,
}

impl HistoryNode {
    /// 1-based position from the bottom of the owning stack.
    #[inline]
    pub fn count(&self) -> usize { self.count }

    #[inline]
    pub fn state(&self) -> &GameState { &self.state }
}

/// Stack of deep-copied game snapshots, numbered 1.. from the bottom.
///
/// Backed by a `Vec`: the bottom node lives at index 0 and the top at the end,
/// so a node's index is always `count - 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStack {
    nodes: Vec<HistoryNode>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stack from states listed newest first, as they appear in save files.
    pub fn from_top_down<I>(states: I) -> Self
    where
        I: IntoIterator<Item = GameState>,
    {
        let mut loaded = HistoryStack::new();
        for state in states {
            loaded.push_owned(state);
        }
        loaded.into_reversed()
    }

    #[inline]
    pub fn len(&self) -> usize { self.nodes.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Push a deep copy of `state` on top.
    pub fn push(&mut self, state: &GameState) {
        self.push_owned(state.clone());
    }

    fn push_owned(&mut self, state: GameState) {
        let count = self.peek_count() + 1;
        self.nodes.push(HistoryNode { count, state });
    }

    /// Count of the top node, or 0 when empty.
    #[inline]
    pub fn peek_count(&self) -> usize {
        self.nodes.last().map_or(0, |node| node.count)
    }

    #[inline]
    pub fn peek_state(&self) -> Option<&GameState> {
        self.nodes.last().map(|node| &node.state)
    }

    /// Remove the top node, returning its state.
    pub fn pop(&mut self) -> Option<GameState> {
        self.nodes.pop().map(|node| node.state)
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Independent copy with the order flipped: the new top is this stack's bottom.
    ///
    /// ```
    /// use slide_2048::engine::GameState;
    /// use slide_2048::history::HistoryStack;
    ///
    /// let mut stack = HistoryStack::new();
    /// for score in [4, 8, 12] {
    ///     let mut s = GameState::default();
    ///     s.add_score(score);
    ///     stack.push(&s);
    /// }
    /// let flipped = stack.duplicate_reversed();
    /// assert_eq!(flipped.peek_state().unwrap().score(), 4);
    /// assert_eq!(flipped.duplicate_reversed(), stack);
    /// ```
    pub fn duplicate_reversed(&self) -> HistoryStack {
        let mut copy = HistoryStack { nodes: Vec::with_capacity(self.nodes.len()) };
        for node in self.nodes.iter().rev() {
            copy.push(&node.state);
        }
        copy
    }

    fn into_reversed(self) -> HistoryStack {
        let mut flipped = HistoryStack { nodes: Vec::with_capacity(self.nodes.len()) };
        for node in self.nodes.into_iter().rev() {
            flipped.push_owned(node.state);
        }
        flipped
    }

    #[inline]
    pub fn top(&self) -> Option<&HistoryNode> { self.nodes.last() }

    #[inline]
    pub fn bottom(&self) -> Option<&HistoryNode> { self.nodes.first() }

    /// Node directly below `node` (older), if any.
    pub fn below(&self, node: &HistoryNode) -> Option<&HistoryNode> {
        node.count.checked_sub(2).and_then(|idx| self.nodes.get(idx))
    }

    /// Node directly above `node` (newer), if any.
    pub fn above(&self, node: &HistoryNode) -> Option<&HistoryNode> {
        self.nodes.get(node.count)
    }

    /// Node with the given 1-based count.
    pub fn node(&self, count: usize) -> Option<&HistoryNode> {
        count.checked_sub(1).and_then(|idx| self.nodes.get(idx))
    }

    /// Nodes from bottom to top; `.rev()` walks top to bottom.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryNode> + ExactSizeIterator {
        self.nodes.iter()
    }
}
