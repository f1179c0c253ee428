use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use slide_2048::config::{self, REPLAYS_DIR};
use slide_2048::engine::{GameState, Move};
use slide_2048::history::MovesHistory;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "replay", about = "Inspect and play back saved 2048 replay files")]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// List replay files in a directory
    List {
        #[arg(default_value = REPLAYS_DIR)]
        dir: PathBuf,
    },
    /// Print a summary of one replay file
    Show { file: PathBuf },
    /// Play a replay frame by frame
    Play {
        file: PathBuf,
        /// Override the delay stored in the file (milliseconds)
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Only show the progress bar, not the boards
        #[arg(short, long)]
        quiet: bool,
    },
    /// Print a replay file as JSON
    Dump {
        file: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    match args.cmd {
        Cmd::List { dir } => list(&dir),
        Cmd::Show { file } => show(&file),
        Cmd::Play { file, delay_ms, quiet } => play(&file, delay_ms, quiet),
        Cmd::Dump { file, pretty } => dump(&file, pretty),
    }
}

fn load(path: &Path) -> anyhow::Result<MovesHistory> {
    MovesHistory::load(path).with_context(|| format!("failed to load replay {}", path.display()))
}

fn direction_name(dir: Option<Move>) -> &'static str {
    match dir {
        None => "-",
        Some(Move::Up) => "up",
        Some(Move::Down) => "down",
        Some(Move::Left) => "left",
        Some(Move::Right) => "right",
    }
}

fn list(dir: &Path) -> anyhow::Result<()> {
    let files = config::list_replays(dir)?;
    if files.is_empty() {
        println!("No replays in {}", dir.display());
        return Ok(());
    }
    for path in files {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        match MovesHistory::load(&path) {
            Ok(history) => println!("{name}\t{} moves", history.replay().nmoves),
            Err(e) => println!("{name}\tunreadable: {e}"),
        }
    }
    Ok(())
}

fn show(path: &Path) -> anyhow::Result<()> {
    let mut history = load(path)?;
    let replay = history.replay();
    println!("File:        {}", path.display());
    println!("Undo depth:  {}", history.undo_stack().len());
    println!("Redo depth:  {}", history.redo_stack().len());
    println!("Undo used:   {}", history.did_undo());
    println!("Frames:      {} (delay {} ms, cursor {})", replay.nmoves, replay.delay, replay.itcount);
    if let Some(last) = history.replay_last() {
        println!("Final score: {} (best {})", last.score(), last.best_score());
        println!("Won:         {}", last.is_won());
        println!("{}", last.board());
    }
    Ok(())
}

fn frame_text(state: &GameState) -> String {
    format!(
        "score: {} | last move: {}\n{}",
        state.score(),
        direction_name(state.prev_move()),
        state.board()
    )
}

fn play(path: &Path, delay_override: Option<u64>, quiet: bool) -> anyhow::Result<()> {
    let mut history = load(path)?;
    let delay = Duration::from_millis(delay_override.unwrap_or(history.replay().delay));
    let (_, total) = history.replay_progress();
    if total == 0 {
        anyhow::bail!("replay {} has no frames", path.display());
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} frames | {msg}")?);

    // Always start from the first frame, whatever cursor the file was saved with.
    let mut frame = history.replay_first().map(|s| (frame_text(s), s.score()));
    while let Some((text, score)) = frame.take() {
        let (shown, _) = history.replay_progress();
        if !quiet {
            pb.println(text);
        }
        pb.set_position(shown as u64);
        pb.set_message(format!("score: {score}"));
        if shown == total {
            break;
        }
        thread::sleep(delay);
        frame = history.replay_next().map(|s| (frame_text(s), s.score()));
    }
    pb.finish();
    Ok(())
}

fn dump(path: &Path, pretty: bool) -> anyhow::Result<()> {
    let history = load(path)?;
    let json = if pretty {
        serde_json::to_string_pretty(&history)?
    } else {
        serde_json::to_string(&history)?
    };
    println!("{json}");
    Ok(())
}
