//! Text save format for game histories.
//!
//! `text` holds the CRLF line codec for boards, states, stacks and whole
//! histories; `savefile` moves that text to and from disk.

mod savefile;
mod text;

pub use savefile::{read_history_from_path, write_history_to_path, SaveError};
pub use text::{
    encode_board,
    encode_history,
    encode_stack,
    encode_state,
    parse_board,
    parse_history,
    parse_node,
    parse_stack,
    parse_state,
    ParseError,
};
