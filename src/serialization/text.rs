//! Line-oriented text codec for boards, states, stacks and whole histories.
//!
//! Grammar (every record ends with `\r\n`):
//!
//! ```text
//! board   := dim sentinel nrandom nempty hasadjacent '#' v0 v1 ... v(dim²-1)
//!          | "NULL#"
//! state   := score bscore iswin prevmv nextmv '@' board
//!          | "NULL@"
//! node    := count ':' state
//! stack   := node (top first, counts N, N-1, ..., 1)
//!          | "NULL:"
//! file    := didundo CRLF stack(undo) stack(redo) delay nmoves itcount CRLF stack(replay)
//! ```
//!
//! Booleans are written as `0`/`1`; directions use the [`Move::code`] table.
//! Parsers accept both `\r\n` and `\n` line endings.

use std::fmt::Write as _;
use std::str::{FromStr, Lines, SplitWhitespace};

use crate::engine::{Board, EngineError, GameState, Move};
use crate::history::{HistoryStack, MovesHistory, Replay};

const NULL_TOKEN: &str = "NULL";
const EOL: &str = "\r\n";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing '{0}' delimiter")]
    MissingDelimiter(char),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid value {value:?} for `{field}`")]
    InvalidNumber { field: &'static str, value: String },
    #[error("inconsistent data: {0}")]
    Inconsistent(&'static str),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected trailing data")]
    TrailingData,
    #[error("line {line}: {source}")]
    AtLine { line: usize, source: Box<ParseError> },
}

impl ParseError {
    fn at_line(self, line: usize) -> ParseError {
        match self {
            already @ ParseError::AtLine { .. } => already,
            other => ParseError::AtLine { line, source: Box::new(other) },
        }
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a board (or the null marker) as one CRLF-terminated line.
pub fn encode_board(board: Option<&Board>) -> String {
    let mut out = String::new();
    write_board(&mut out, board);
    out
}

/// Encode a state (or the null marker) as one CRLF-terminated line.
pub fn encode_state(state: Option<&GameState>) -> String {
    let mut out = String::new();
    write_state(&mut out, state);
    out
}

/// Encode a stack, one line per node from the top down.
pub fn encode_stack(stack: &HistoryStack) -> String {
    let mut out = String::new();
    write_stack(&mut out, stack);
    out
}

/// Encode a complete history in save-file layout.
pub fn encode_history(history: &MovesHistory) -> String {
    let mut out = String::new();
    let replay = history.replay();
    let _ = write!(out, "{}{EOL}", u8::from(history.did_undo()));
    write_stack(&mut out, history.undo_stack());
    write_stack(&mut out, history.redo_stack());
    let _ = write!(out, "{} {} {}{EOL}", replay.delay, replay.nmoves, replay.itcount);
    write_stack(&mut out, &replay.stack);
    out
}

// Writing into a String never fails, so the fmt::Result values are dropped.
fn write_board(out: &mut String, board: Option<&Board>) {
    let Some(b) = board else {
        let _ = write!(out, "{NULL_TOKEN}#{EOL}");
        return;
    };
    let _ = write!(
        out,
        "{} {} {} {} {}#",
        b.dim(),
        b.sentinel(),
        b.nrandom(),
        b.empty_count(),
        u8::from(b.has_adjacent())
    );
    for (idx, v) in b.tiles().iter().enumerate() {
        if idx != 0 {
            out.push(' ');
        }
        let _ = write!(out, "{v}");
    }
    out.push_str(EOL);
}

fn write_state(out: &mut String, state: Option<&GameState>) {
    let Some(s) = state else {
        let _ = write!(out, "{NULL_TOKEN}@{EOL}");
        return;
    };
    let _ = write!(
        out,
        "{} {} {} {} {}@",
        s.score(),
        s.best_score(),
        u8::from(s.is_won()),
        Move::code(s.prev_move()),
        Move::code(s.next_move())
    );
    write_board(out, Some(s.board()));
}

fn write_stack(out: &mut String, stack: &HistoryStack) {
    if stack.is_empty() {
        let _ = write!(out, "{NULL_TOKEN}:{EOL}");
        return;
    }
    for node in stack.iter().rev() {
        let _ = write!(out, "{}:", node.count());
        write_state(out, Some(node.state()));
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Whitespace-separated numeric fields of one record section.
struct Fields<'a> {
    tokens: SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn new(section: &'a str) -> Self {
        Fields { tokens: section.split_whitespace() }
    }

    fn next<T: FromStr>(&mut self, field: &'static str) -> Result<T, ParseError> {
        let token = self.tokens.next().ok_or(ParseError::MissingField(field))?;
        token
            .parse()
            .map_err(|_| ParseError::InvalidNumber { field, value: token.to_string() })
    }

    fn next_flag(&mut self, field: &'static str) -> Result<bool, ParseError> {
        match self.next::<u8>(field)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ParseError::InvalidNumber { field, value: other.to_string() }),
        }
    }

    fn finish(mut self) -> Result<(), ParseError> {
        match self.tokens.next() {
            Some(_) => Err(ParseError::TrailingData),
            None => Ok(()),
        }
    }
}

fn strip_eol(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line)
}

/// Split `line` at the first `delim`; `Ok(None)` when the head is the null marker.
fn split_record(line: &str, delim: char) -> Result<Option<(&str, &str)>, ParseError> {
    let (head, rest) = line.split_once(delim).ok_or(ParseError::MissingDelimiter(delim))?;
    if head.trim() == NULL_TOKEN {
        if !rest.trim().is_empty() {
            return Err(ParseError::TrailingData);
        }
        return Ok(None);
    }
    Ok(Some((head, rest)))
}

/// Parse one board record. `NULL#` yields `Ok(None)`.
pub fn parse_board(line: &str) -> Result<Option<Board>, ParseError> {
    let Some((meta, values)) = split_record(strip_eol(line), '#')? else {
        return Ok(None);
    };

    let mut fields = Fields::new(meta);
    let dim: usize = fields.next("dim")?;
    let sentinel: u32 = fields.next("sentinel")?;
    let nrandom: usize = fields.next("nrandom")?;
    let nempty: usize = fields.next("nempty")?;
    // Cached flag; rebuilt from the tiles below.
    let _hasadjacent = fields.next_flag("hasadjacent")?;
    fields.finish()?;

    let mut tiles = Vec::with_capacity(dim.saturating_mul(dim).min(64));
    let mut values = Fields::new(values);
    while let Some(token) = values.tokens.next() {
        let v = token
            .parse()
            .map_err(|_| ParseError::InvalidNumber { field: "tile", value: token.to_string() })?;
        tiles.push(v);
    }

    let board = Board::from_tiles(dim, tiles)?;
    if board.sentinel() != sentinel {
        return Err(ParseError::Inconsistent("sentinel does not match board dimension"));
    }
    if board.nrandom() != nrandom {
        return Err(ParseError::Inconsistent("spawn count does not match board dimension"));
    }
    if board.empty_count() != nempty {
        return Err(ParseError::Inconsistent("empty-cell count does not match tiles"));
    }
    Ok(Some(board))
}

/// Parse one game-state record. `NULL@` yields `Ok(None)`.
pub fn parse_state(line: &str) -> Result<Option<GameState>, ParseError> {
    let Some((meta, board_text)) = split_record(strip_eol(line), '@')? else {
        return Ok(None);
    };

    let mut fields = Fields::new(meta);
    let score = fields.next("score")?;
    let best_score = fields.next("bscore")?;
    let won = fields.next_flag("iswin")?;
    let prev_move = Move::from_code(fields.next("prevmv")?)?;
    let next_move = Move::from_code(fields.next("nextmv")?)?;
    fields.finish()?;

    let board = parse_board(board_text)?.ok_or(ParseError::Inconsistent("game state without a board"))?;
    Ok(Some(GameState::from_parts(board, score, best_score, won, prev_move, next_move)))
}

/// Parse one stack-node record into `(count, state)`. `NULL:` yields `Ok(None)`.
pub fn parse_node(line: &str) -> Result<Option<(usize, GameState)>, ParseError> {
    let Some((count_text, state_text)) = split_record(strip_eol(line), ':')? else {
        return Ok(None);
    };
    let mut fields = Fields::new(count_text);
    let count: usize = fields.next("count")?;
    fields.finish()?;
    if count == 0 {
        return Err(ParseError::Inconsistent("node count must start at 1"));
    }
    let state = parse_state(state_text)?.ok_or(ParseError::Inconsistent("history node without a state"))?;
    Ok(Some((count, state)))
}

/// Parse a standalone stack (the output of [`encode_stack`]).
pub fn parse_stack(text: &str) -> Result<HistoryStack, ParseError> {
    let mut reader = LineReader::new(text);
    let stack = reader.stack()?;
    reader.finish()?;
    Ok(stack)
}

/// Parse a complete history in save-file layout.
///
/// Nothing is returned unless every section parsed and validated.
pub fn parse_history(text: &str) -> Result<MovesHistory, ParseError> {
    let mut reader = LineReader::new(text);

    let did_undo = reader.record(|line| {
        let mut fields = Fields::new(line);
        let flag = fields.next_flag("didundo")?;
        fields.finish()?;
        Ok(flag)
    })?;
    let undo = reader.stack()?;
    let redo = reader.stack()?;
    let (delay, nmoves, itcount) = reader.record(|line| {
        let mut fields = Fields::new(line);
        let delay: u64 = fields.next("delay")?;
        let nmoves: usize = fields.next("nmoves")?;
        let itcount: usize = fields.next("itcount")?;
        fields.finish()?;
        Ok((delay, nmoves, itcount))
    })?;
    let replay_line = reader.line_no + 1;
    let stack = reader.stack()?;
    reader.finish()?;

    if nmoves != stack.len() {
        return Err(ParseError::Inconsistent("replay move count does not match replay stack").at_line(replay_line));
    }
    if itcount > stack.len() {
        return Err(ParseError::Inconsistent("replay cursor past the end of the replay").at_line(replay_line));
    }

    Ok(MovesHistory::from_parts(did_undo, undo, redo, Replay { delay, nmoves, itcount, stack }))
}

/// Line cursor that tags errors with 1-based line numbers.
struct LineReader<'a> {
    lines: Lines<'a>,
    line_no: usize,
}

impl<'a> LineReader<'a> {
    fn new(text: &'a str) -> Self {
        LineReader { lines: text.lines(), line_no: 0 }
    }

    fn next_line(&mut self) -> Result<&'a str, ParseError> {
        let line = self.lines.next().ok_or(ParseError::UnexpectedEof)?;
        self.line_no += 1;
        Ok(line)
    }

    fn record<T>(&mut self, parse: impl FnOnce(&str) -> Result<T, ParseError>) -> Result<T, ParseError> {
        let line = self.next_line()?;
        parse(line).map_err(|e| e.at_line(self.line_no))
    }

    /// Read one stack block: either `NULL:` or nodes counting down to 1.
    fn stack(&mut self) -> Result<HistoryStack, ParseError> {
        let Some((top, state)) = self.record(parse_node)? else {
            return Ok(HistoryStack::new());
        };
        let mut states = Vec::with_capacity(top.min(1024));
        states.push(state);
        for expected in (1..top).rev() {
            let node = self.record(parse_node)?;
            match node {
                Some((count, state)) if count == expected => states.push(state),
                Some(_) => {
                    return Err(ParseError::Inconsistent("node counts must descend by one").at_line(self.line_no))
                }
                None => return Err(ParseError::Inconsistent("empty-stack marker inside a stack").at_line(self.line_no)),
            }
        }
        Ok(HistoryStack::from_top_down(states))
    }

    /// Only blank lines may follow the last section.
    fn finish(mut self) -> Result<(), ParseError> {
        for line in self.lines.by_ref() {
            self.line_no += 1;
            if !line.trim().is_empty() {
                return Err(ParseError::TrailingData.at_line(self.line_no));
            }
        }
        Ok(())
    }
}
