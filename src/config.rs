//! Runtime settings shared by the session and the binaries.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use walkdir::WalkDir;

pub use crate::engine::DEFAULT_DIM;

/// Folder replays are written to, relative to the working directory.
pub const REPLAYS_DIR: &str = "replays";
/// Extension of replay files (without the dot).
pub const REPLAY_EXTENSION: &str = "2048";
/// Frame delay used when none is configured.
pub const DEFAULT_REPLAY_DELAY_MS: u64 = 250;

/// Session configuration.
///
/// - `dim`: board side, one of 4, 5, 6 or 8.
/// - `replay_delay_ms`: delay stored in saved replays and used by playback.
/// - `replays_dir`: where `save_replay` and `replay list` look.
/// - `seed`: fixed RNG seed for reproducible games; `None` seeds from entropy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub dim: usize,
    pub replay_delay_ms: u64,
    pub replays_dir: PathBuf,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dim: DEFAULT_DIM,
            replay_delay_ms: DEFAULT_REPLAY_DELAY_MS,
            replays_dir: PathBuf::from(REPLAYS_DIR),
            seed: None,
        }
    }
}

/// Whether `path` carries the replay extension.
pub fn is_replay_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == REPLAY_EXTENSION)
}

/// Replay files directly inside `dir`, sorted by file name.
///
/// A missing directory is treated as empty.
pub fn list_replays<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, walkdir::Error> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() && is_replay_file(entry.path()) {
            found.push(entry.into_path());
        }
    }
    found.sort();
    Ok(found)
}

/// Fresh replay path under `dir`, named after the current UNIX time.
///
/// A numeric suffix is appended when a file of that name already exists.
pub fn replay_file_path<P: AsRef<Path>>(dir: P) -> PathBuf {
    let dir = dir.as_ref();
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut path = dir.join(format!("replay-{stamp}.{REPLAY_EXTENSION}"));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("replay-{stamp}-{n}.{REPLAY_EXTENSION}"));
        n += 1;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.dim, 4);
        assert_eq!(cfg.replay_delay_ms, 250);
        assert_eq!(cfg.replays_dir, PathBuf::from("replays"));
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn serializes_to_json() {
        let json = serde_json::to_value(Config { seed: Some(9), ..Config::default() }).unwrap();
        assert_eq!(json["dim"], 4);
        assert_eq!(json["replays_dir"], "replays");
        assert_eq!(json["seed"], 9);
    }

    #[test]
    fn lists_only_replays_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.2048", "a.2048", "notes.txt", "c.2048.bak"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested.2048")).unwrap();

        let found = list_replays(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.2048", "b.2048"]);
    }

    #[test]
    fn missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_replays(dir.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn replay_paths_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let first = replay_file_path(dir.path());
        assert!(is_replay_file(&first));
        fs::write(&first, b"").unwrap();
        let second = replay_file_path(dir.path());
        assert_ne!(first, second);
        assert!(is_replay_file(&second));
    }
}
