use rand::{rngs::StdRng, SeedableRng};
use slide_2048::config::{self, Config};
use slide_2048::engine::{GameState, Move};
use slide_2048::history::MovesHistory;
use slide_2048::serialization::{encode_state, ParseError, SaveError};
use slide_2048::session::{MoveResult, Session};
use std::fs;

fn play_moves(session: &mut Session<StdRng>, n: usize) -> Vec<GameState> {
    let mut seen = vec![session.state().clone()];
    let mut i = 0;
    while seen.len() <= n {
        match session.play(Move::ALL[i % 4]).unwrap() {
            MoveResult::Blocked => {}
            MoveResult::GameOver if session.history().undo_stack().len() + 1 == seen.len() => break,
            _ => seen.push(session.state().clone()),
        }
        i += 1;
    }
    seen
}

#[test]
fn session_save_load_replay() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config { seed: Some(99), replay_delay_ms: 40, replays_dir: dir.path().join("replays"), ..Config::default() };
    let mut session = Session::new(cfg, StdRng::seed_from_u64(99)).unwrap();
    let frames = play_moves(&mut session, 12);

    let path = session.save_replay_default().unwrap();
    assert_eq!(config::list_replays(dir.path().join("replays")).unwrap(), vec![path.clone()]);

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with("0\r\n"));

    let mut loaded = MovesHistory::load(&path).unwrap();
    assert_eq!(loaded.replay().delay, 40);
    assert_eq!(loaded.replay().nmoves, frames.len());

    let mut played = Vec::new();
    while let Some(s) = loaded.replay_next() {
        played.push(s.clone());
    }
    assert_eq!(played, frames);
    assert_eq!(loaded.replay_progress(), (frames.len(), frames.len()));
}

#[test]
fn undo_across_save_and_load() {
    let mut session = Session::new(Config::default(), StdRng::seed_from_u64(5)).unwrap();
    let frames = play_moves(&mut session, 6);
    assert!(session.undo());
    assert!(session.undo());
    assert_eq!(encode_state(Some(session.state())), encode_state(Some(&frames[frames.len() - 3])));

    let tmp = tempfile::NamedTempFile::new().unwrap();
    session.history().save(tmp.path()).unwrap();
    let mut loaded = MovesHistory::load(tmp.path()).unwrap();
    assert_eq!(&loaded, session.history());
    assert!(loaded.did_undo());

    let mut current = session.state().clone();
    assert!(loaded.redo(&mut current));
    assert_eq!(current, frames[frames.len() - 2]);
    assert!(loaded.redo(&mut current));
    assert_eq!(current, frames[frames.len() - 1]);
    assert!(!loaded.redo(&mut current));
}

#[test]
fn truncated_file_is_rejected_whole() {
    let mut session = Session::new(Config::default(), StdRng::seed_from_u64(8)).unwrap();
    play_moves(&mut session, 4);
    let text = session.history().encode();
    let cut = &text[..text.len() / 2];

    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(tmp.path(), cut).unwrap();

    let mut history = MovesHistory::new();
    let err = history.reload(tmp.path()).unwrap_err();
    assert!(matches!(err, SaveError::Parse(_)));
    assert_eq!(history, MovesHistory::new());

    assert!(matches!(MovesHistory::decode(""), Err(ParseError::UnexpectedEof)));
}

#[test]
fn resized_game_round_trips() {
    let mut session = Session::new(Config::default(), StdRng::seed_from_u64(3)).unwrap();
    session.resize(8).unwrap();
    play_moves(&mut session, 5);
    let text = session.history().encode();
    // Bottom of the undo stack is the opening position of the 8x8 game.
    assert!(text.lines().nth(5).unwrap().starts_with("1:0 0 0 0 0@8 16384 1 "));
    assert_eq!(&MovesHistory::decode(&text).unwrap(), session.history());
}
