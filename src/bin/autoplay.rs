use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use slide_2048::config::{Config, DEFAULT_DIM, DEFAULT_REPLAY_DELAY_MS, REPLAYS_DIR};
use slide_2048::engine::Move;
use slide_2048::session::{MoveResult, Session};
use std::path::PathBuf;

/// Corner-hugging order: the first direction that changes the board wins.
const POLICY: [Move; 4] = [Move::Down, Move::Left, Move::Right, Move::Up];

#[derive(Debug, Parser)]
#[command(name = "autoplay", about = "Play a seeded game with a fixed policy and save it as a replay")]
struct Args {
    /// Board side (4, 5, 6 or 8)
    #[arg(long, default_value_t = DEFAULT_DIM)]
    dim: usize,

    /// RNG seed; omit for a random game
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many successful moves
    #[arg(long, default_value_t = 10_000)]
    max_moves: u64,

    /// Undo and immediately redo every N moves (0 disables)
    #[arg(long, default_value_t = 0)]
    undo_every: u64,

    /// Replay frame delay in milliseconds
    #[arg(long, default_value_t = DEFAULT_REPLAY_DELAY_MS)]
    delay_ms: u64,

    /// Directory the replay file is written to
    #[arg(short, long, default_value = REPLAYS_DIR)]
    out_dir: PathBuf,

    /// Print the board after every move
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = Config {
        dim: args.dim,
        replay_delay_ms: args.delay_ms,
        replays_dir: args.out_dir.clone(),
        seed: args.seed,
    };
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(config, rng)?;
    if args.verbose {
        println!("{}", session.state().board());
    }

    let mut moves: u64 = 0;
    while moves < args.max_moves {
        let mut outcome = MoveResult::Blocked;
        for dir in POLICY {
            outcome = session.play(dir)?;
            if outcome != MoveResult::Blocked {
                break;
            }
        }
        match outcome {
            MoveResult::Blocked => break,
            MoveResult::Won => println!("Reached {} after {} moves", session.state().board().sentinel(), moves + 1),
            MoveResult::GameOver | MoveResult::Moved => {}
        }
        moves += 1;

        if args.undo_every > 0 && moves % args.undo_every == 0 && session.undo() {
            if !session.redo() {
                anyhow::bail!("redo failed right after undo at move {moves}");
            }
        }
        if args.verbose {
            println!("{}", session.state().board());
        }
        if outcome == MoveResult::GameOver {
            break;
        }
    }

    let state = session.state();
    println!(
        "Moves: {} | score: {} | highest tile: {} | best score counted: {}",
        moves,
        state.score(),
        state.board().highest_tile(),
        session.best_score_eligible()
    );
    let path = session.save_replay_default()?;
    println!("Replay written to {}", path.display());
    Ok(())
}
