use std::fmt;

use rand::Rng;
use serde::Serialize;

use super::{dim_params, EngineError, Move, Score, Tile, DEFAULT_DIM, DEFAULT_PARAMS};

/// Result of sliding a board in one direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shift {
    /// At least one tile slid or merged.
    pub changed: bool,
    /// Points earned by merges whose sum does not exceed the sentinel.
    pub points: Score,
    /// A merge produced exactly the sentinel value.
    pub won: bool,
}

/// Square 2048 board stored as a flat row-major grid.
///
/// `empty_count()` always equals the number of zero cells and `has_adjacent()`
/// reflects the grid after the last move or spawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    dim: usize,
    sentinel: Tile,
    nrandom: usize,
    nempty: usize,
    hasadjacent: bool,
    grid: Vec<Tile>,
}

impl Default for Board {
    fn default() -> Self {
        let (sentinel, nrandom) = DEFAULT_PARAMS;
        Board {
            dim: DEFAULT_DIM,
            sentinel,
            nrandom,
            nempty: DEFAULT_DIM * DEFAULT_DIM,
            hasadjacent: false,
            grid: vec![0; DEFAULT_DIM * DEFAULT_DIM],
        }
    }
}

impl Board {
    /// Create an empty board of side `dim` (4, 5, 6 or 8).
    pub fn new(dim: usize) -> Result<Self, EngineError> {
        let (sentinel, nrandom) = dim_params(dim)?;
        Ok(Board {
            dim,
            sentinel,
            nrandom,
            nempty: dim * dim,
            hasadjacent: false,
            grid: vec![0; dim * dim],
        })
    }

    /// Build a board from explicit row-major tile values.
    ///
    /// ```
    /// use slide_2048::engine::Board;
    /// let b = Board::from_tiles(4, vec![2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    /// assert_eq!(b.empty_count(), 14);
    /// assert!(b.has_adjacent());
    /// ```
    pub fn from_tiles(dim: usize, tiles: Vec<Tile>) -> Result<Self, EngineError> {
        let (sentinel, nrandom) = dim_params(dim)?;
        if tiles.len() != dim * dim {
            return Err(EngineError::TileCount { expected: dim * dim, found: tiles.len() });
        }
        let nempty = tiles.iter().filter(|&&v| v == 0).count();
        let hasadjacent = scan_adjacent(dim, &tiles);
        Ok(Board { dim, sentinel, nrandom, nempty, hasadjacent, grid: tiles })
    }

    #[inline]
    pub fn dim(&self) -> usize { self.dim }

    /// Tile value that wins the game on this board.
    #[inline]
    pub fn sentinel(&self) -> Tile { self.sentinel }

    /// Tiles spawned after each successful move.
    #[inline]
    pub fn nrandom(&self) -> usize { self.nrandom }

    #[inline]
    pub fn empty_count(&self) -> usize { self.nempty }

    #[inline]
    pub fn has_room(&self) -> bool { self.nempty > 0 }

    /// True if two horizontally or vertically neighbouring cells hold the same non-zero value.
    #[inline]
    pub fn has_adjacent(&self) -> bool { self.hasadjacent }

    /// No empty cell and no mergeable pair: no move can change the board.
    #[inline]
    pub fn is_stuck(&self) -> bool { !self.has_room() && !self.has_adjacent() }

    /// Row-major tile values.
    #[inline]
    pub fn tiles(&self) -> &[Tile] { &self.grid }

    /// Tile at `(row, col)`, or `None` outside the board.
    pub fn tile(&self, row: usize, col: usize) -> Option<Tile> {
        if row < self.dim && col < self.dim {
            Some(self.grid[row * self.dim + col])
        } else {
            None
        }
    }

    pub fn highest_tile(&self) -> Tile {
        self.grid.iter().copied().max().unwrap_or(0)
    }

    /// Empty every cell. Dimension, sentinel and spawn count are kept.
    pub fn reset(&mut self) {
        self.grid.fill(0);
        self.nempty = self.grid.len();
        self.hasadjacent = false;
    }

    /// Switch to a new side length and empty the board.
    ///
    /// On an unsupported `dim` the board is left untouched.
    pub fn resize_and_reset(&mut self, dim: usize) -> Result<(), EngineError> {
        let (sentinel, nrandom) = dim_params(dim)?;
        self.dim = dim;
        self.sentinel = sentinel;
        self.nrandom = nrandom;
        self.grid.clear();
        self.grid.resize(dim * dim, 0);
        self.reset();
        Ok(())
    }

    /// Place up to `n` random tiles (2 or 4, even odds) on distinct empty cells.
    ///
    /// `n` is clamped to the number of empty cells. Fails when the board is
    /// already full. Returns the number of tiles placed.
    pub fn generate_n_tiles<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> Result<usize, EngineError> {
        if self.nempty == 0 {
            return Err(EngineError::BoardFull);
        }
        let n = n.min(self.nempty);
        for _ in 0..n {
            let target = rng.gen_range(0..self.nempty);
            let slot = self
                .grid
                .iter()
                .enumerate()
                .filter(|(_, v)| **v == 0)
                .nth(target)
                .map(|(idx, _)| idx);
            let Some(idx) = slot else { break };
            self.grid[idx] = generate_random_tile(rng);
            self.nempty -= 1;
        }
        self.hasadjacent = scan_adjacent(self.dim, &self.grid);
        Ok(n)
    }

    /// Slide and merge every line toward the edge named by `dir`.
    ///
    /// Each line is compacted into a scratch buffer, merged from the near edge
    /// (a tile takes part in at most one merge per move), then written back
    /// packed against the near edge.
    ///
    /// ```
    /// use slide_2048::engine::{Board, Move};
    /// let mut b = Board::from_tiles(4, vec![2, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    /// let s = b.shift(Move::Left);
    /// assert!(s.changed);
    /// assert_eq!(s.points, 4);
    /// assert_eq!(&b.tiles()[..4], &[4, 2, 0, 0]);
    /// ```
    pub fn shift(&mut self, dir: Move) -> Shift {
        let dim = self.dim;
        let mut outcome = Shift::default();
        let mut scratch: Vec<Tile> = vec![0; dim];

        for line in 0..dim {
            let mut seen_empty = false;
            let mut slid = false;
            let mut len = 0;

            for pos in 0..dim {
                let idx = cell_index(dim, dir, line, pos);
                let val = self.grid[idx];
                if val == 0 {
                    seen_empty = true;
                    continue;
                }
                if seen_empty {
                    slid = true;
                }
                scratch[len] = val;
                len += 1;
                self.grid[idx] = 0;
            }

            let mut merged = false;
            let mut pos = 0;
            while pos + 1 < len {
                if scratch[pos] == scratch[pos + 1] {
                    let sum = scratch[pos].saturating_add(scratch[pos + 1]);
                    scratch[pos] = sum;
                    scratch[pos + 1] = 0;
                    self.nempty += 1;
                    if sum <= self.sentinel {
                        outcome.points += Score::from(sum);
                    }
                    if sum == self.sentinel {
                        outcome.won = true;
                    }
                    merged = true;
                    pos += 2;
                } else {
                    pos += 1;
                }
            }

            let mut out = 0;
            for &val in scratch[..len].iter().filter(|v| **v != 0) {
                self.grid[cell_index(dim, dir, line, out)] = val;
                out += 1;
            }

            outcome.changed |= slid || merged;
        }

        self.hasadjacent = scan_adjacent(dim, &self.grid);
        outcome
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(self.dim * 8 - 1);
        for (row_idx, row) in self.grid.chunks(self.dim).enumerate() {
            if row_idx != 0 {
                writeln!(f, "{rule}")?;
            }
            let cells: Vec<String> = row.iter().map(format_val).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

/// Grid index of the `pos`-th cell of `line`, counted from the edge `dir` slides toward.
#[inline(always)]
fn cell_index(dim: usize, dir: Move, line: usize, pos: usize) -> usize {
    match dir {
        Move::Left => line * dim + pos,
        Move::Right => line * dim + (dim - 1 - pos),
        Move::Up => pos * dim + line,
        Move::Down => (dim - 1 - pos) * dim + line,
    }
}

fn scan_adjacent(dim: usize, grid: &[Tile]) -> bool {
    for row in 0..dim {
        for col in 0..dim {
            let val = grid[row * dim + col];
            if val == 0 {
                continue;
            }
            if col + 1 < dim && grid[row * dim + col + 1] == val {
                return true;
            }
            if row + 1 < dim && grid[(row + 1) * dim + col] == val {
                return true;
            }
        }
    }
    false
}

fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile { if rng.gen_bool(0.5) { 2 } else { 4 } }

fn format_val(val: &Tile) -> String {
    match val {
        0 => String::from("       "),
        x => format!("{x:^7}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn board_with_row(row: [Tile; 4]) -> Board {
        let mut tiles = vec![0; 16];
        tiles[..4].copy_from_slice(&row);
        Board::from_tiles(4, tiles).unwrap()
    }

    #[test]
    fn new_derives_params_from_dim() {
        for (dim, sentinel, nrandom) in [(4, 2048, 1), (5, 65536, 1), (6, 2048, 2), (8, 16384, 1)] {
            let b = Board::new(dim).unwrap();
            assert_eq!(b.dim(), dim);
            assert_eq!(b.sentinel(), sentinel);
            assert_eq!(b.nrandom(), nrandom);
            assert_eq!(b.empty_count(), dim * dim);
            assert_eq!(b.tiles().len(), dim * dim);
            assert!(!b.has_adjacent());
        }
        assert_eq!(Board::new(3), Err(EngineError::InvalidDimension(3)));
        assert_eq!(Board::new(7), Err(EngineError::InvalidDimension(7)));
        assert_eq!(Board::default(), Board::new(DEFAULT_DIM).unwrap());
    }

    #[test]
    fn merge_no_triple() {
        let mut b = board_with_row([2, 2, 2, 0]);
        let s = b.shift(Move::Left);
        assert_eq!(&b.tiles()[..4], &[4, 2, 0, 0]);
        assert_eq!(s, Shift { changed: true, points: 4, won: false });
        assert_eq!(b.empty_count(), 14);
    }

    #[test]
    fn merge_two_pairs() {
        let mut b = board_with_row([2, 2, 4, 4]);
        let s = b.shift(Move::Left);
        assert_eq!(&b.tiles()[..4], &[4, 8, 0, 0]);
        assert_eq!(s.points, 12);
        assert_eq!(b.empty_count(), 14);
    }

    #[test]
    fn merge_prefers_near_edge() {
        let mut b = board_with_row([2, 2, 2, 0]);
        let s = b.shift(Move::Right);
        assert_eq!(&b.tiles()[..4], &[0, 0, 2, 4]);
        assert_eq!(s.points, 4);

        let mut b = board_with_row([4, 0, 0, 4]);
        b.shift(Move::Right);
        assert_eq!(&b.tiles()[..4], &[0, 0, 0, 8]);
    }

    #[test]
    fn no_op_line_reports_unchanged() {
        let mut b = board_with_row([2, 4, 8, 16]);
        let before = b.clone();
        let s = b.shift(Move::Left);
        assert!(!s.changed);
        assert_eq!(s.points, 0);
        assert_eq!(b, before);

        // Same row slides when moved the other way only if there is a gap.
        let mut b = board_with_row([2, 4, 8, 0]);
        assert!(!b.shift(Move::Left).changed);
        assert!(b.shift(Move::Right).changed);
        assert_eq!(&b.tiles()[..4], &[0, 2, 4, 8]);
    }

    #[test]
    fn vertical_moves() {
        #[rustfmt::skip]
        let tiles = vec![
            2, 0, 0, 0,
            2, 0, 4, 0,
            0, 0, 4, 0,
            4, 0, 0, 8,
        ];
        let mut up = Board::from_tiles(4, tiles.clone()).unwrap();
        let s = up.shift(Move::Up);
        #[rustfmt::skip]
        assert_eq!(up.tiles(), &[
            4, 0, 8, 8,
            4, 0, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
        ]);
        assert_eq!(s.points, 12);

        let mut down = Board::from_tiles(4, tiles).unwrap();
        down.shift(Move::Down);
        #[rustfmt::skip]
        assert_eq!(down.tiles(), &[
            0, 0, 0, 0,
            0, 0, 0, 0,
            4, 0, 0, 0,
            4, 0, 8, 8,
        ]);
        assert_eq!(down.empty_count(), 12);
    }

    #[test]
    fn reaching_sentinel_wins() {
        let mut b = board_with_row([1024, 1024, 0, 0]);
        let s = b.shift(Move::Left);
        assert!(s.won);
        assert_eq!(s.points, 2048);

        let mut b = board_with_row([1024, 1024, 1024, 1024]);
        let s = b.shift(Move::Left);
        assert!(s.won);
        assert_eq!(s.points, 4096);
        assert_eq!(&b.tiles()[..4], &[2048, 2048, 0, 0]);
    }

    #[test]
    fn sums_above_sentinel_score_nothing() {
        let mut b = board_with_row([2048, 2048, 0, 0]);
        let s = b.shift(Move::Left);
        assert!(s.changed);
        assert!(!s.won);
        assert_eq!(s.points, 0);
        assert_eq!(b.tile(0, 0), Some(4096));
    }

    #[test]
    fn adjacency_is_recomputed() {
        let mut b = board_with_row([2, 0, 2, 0]);
        assert!(!b.has_adjacent());
        b.shift(Move::Left);
        assert!(!b.has_adjacent());
        assert_eq!(b.tile(0, 0), Some(4));

        let b = Board::from_tiles(4, {
            let mut t = vec![0; 16];
            t[1] = 8;
            t[5] = 8;
            t
        })
        .unwrap();
        assert!(b.has_adjacent());
    }

    #[test]
    fn stuck_board() {
        let tiles: Vec<Tile> = (0..16).map(|i| if (i / 4 + i % 4) % 2 == 0 { 2 } else { 4 }).collect();
        let mut b = Board::from_tiles(4, tiles).unwrap();
        assert!(b.is_stuck());
        for dir in Move::ALL {
            assert!(!b.shift(dir).changed);
        }
    }

    #[test]
    fn spawn_respects_empty_cells() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut b = board_with_row([8, 16, 32, 64]);
        let placed = b.generate_n_tiles(100, &mut rng).unwrap();
        assert_eq!(placed, 12);
        assert_eq!(&b.tiles()[..4], &[8, 16, 32, 64]);
        assert_eq!(b.empty_count(), 0);
        assert!(b.tiles()[4..].iter().all(|&v| v == 2 || v == 4));
        assert_eq!(b.generate_n_tiles(1, &mut rng), Err(EngineError::BoardFull));
    }

    #[test]
    fn spawn_places_exactly_n() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut b = Board::new(6).unwrap();
        assert_eq!(b.generate_n_tiles(2, &mut rng).unwrap(), 2);
        assert_eq!(b.empty_count(), 34);
        assert_eq!(b.tiles().iter().filter(|&&v| v != 0).count(), 2);
    }

    #[test]
    fn reset_and_resize() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut b = Board::new(4).unwrap();
        b.generate_n_tiles(5, &mut rng).unwrap();
        b.reset();
        assert_eq!(b, Board::new(4).unwrap());

        b.resize_and_reset(8).unwrap();
        assert_eq!(b, Board::new(8).unwrap());

        assert_eq!(b.resize_and_reset(9), Err(EngineError::InvalidDimension(9)));
        assert_eq!(b.dim(), 8);
        assert_eq!(b.sentinel(), 16384);
    }

    #[test]
    fn from_tiles_rejects_bad_length() {
        assert_eq!(
            Board::from_tiles(4, vec![0; 15]),
            Err(EngineError::TileCount { expected: 16, found: 15 })
        );
    }

    #[test]
    fn display_has_one_line_per_row() {
        let b = board_with_row([2, 0, 0, 2048]);
        let text = b.to_string();
        assert!(text.contains("2048"));
        assert_eq!(text.lines().count(), 7);
    }
}
