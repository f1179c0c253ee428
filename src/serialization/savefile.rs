use std::fs;
use std::io;
use std::path::Path;

use super::text::{encode_history, parse_history, ParseError};
use crate::history::MovesHistory;

#[derive(thiserror::Error, Debug)]
pub enum SaveError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Write the text form of `history` to a file, replacing any previous content.
pub fn write_history_to_path<P: AsRef<Path>>(path: P, history: &MovesHistory) -> Result<(), SaveError> {
    let path = path.as_ref();
    let text = encode_history(history);
    fs::write(path, text.as_bytes())?;
    log::debug!(
        "saved history to {} ({} undo, {} redo, {} replay)",
        path.display(),
        history.undo_stack().len(),
        history.redo_stack().len(),
        history.replay().stack.len()
    );
    Ok(())
}

/// Read and validate a history file.
pub fn read_history_from_path<P: AsRef<Path>>(path: P) -> Result<MovesHistory, SaveError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    match parse_history(&text) {
        Ok(history) => {
            log::debug!("loaded history from {}", path.display());
            Ok(history)
        }
        Err(e) => {
            log::warn!("rejecting history file {}: {}", path.display(), e);
            Err(e.into())
        }
    }
}
