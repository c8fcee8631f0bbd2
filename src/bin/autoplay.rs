//! Headless autoplayer: plays one game with the best-move search and
//! prints a summary. Handy for balancing difficulties and for benchmarks.

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;

use blockdoku::adapter::{load_from_path, save_to_path};
use blockdoku::core::{GameEngine, GameOptions};
use blockdoku::engine::Autoplayer;
use blockdoku::types::Difficulty;

/// Play Blockdoku automatically
#[derive(Debug, Parser)]
#[command(name = "autoplay", version, about)]
struct Args {
    /// RNG seed for the block supply
    #[arg(short, long, default_value_t = 1)]
    seed: u32,
    /// easy, normal, hard or expert
    #[arg(short, long, default_value = "normal")]
    difficulty: String,
    /// Stop after this many moves
    #[arg(short, long, default_value_t = Autoplayer::DEFAULT_MAX_MOVES)]
    max_moves: u32,
    /// Number of games, each seeded `seed + i`
    #[arg(short, long, default_value_t = 1)]
    games: u32,
    /// Resume from a save file instead of starting fresh (single game only)
    #[arg(long)]
    resume: Option<String>,
    /// Write the final state of the last game here
    #[arg(long)]
    save: Option<String>,
}

fn main() -> Result<()> {
    blockdoku::init_logging();
    let args = Args::parse();

    let Some(difficulty) = Difficulty::from_str(&args.difficulty) else {
        bail!("unknown difficulty {:?}", args.difficulty);
    };
    if args.resume.is_some() && args.games > 1 {
        bail!("--resume plays a single game");
    }

    let player = Autoplayer::new(args.max_moves);
    let mut total_score = 0u64;
    let mut last = None;

    for i in 0..args.games.max(1) {
        let seed = args.seed.wrapping_add(i);
        let mut engine = GameEngine::new(seed, GameOptions::new(difficulty));
        if let Some(path) = &args.resume {
            let snap = load_from_path(path)?;
            engine.restore(&snap)?;
            info!(path = %path, "resumed");
        }

        let report = player.run(&mut engine);
        total_score += report.score as u64;
        println!(
            "game {:>3} seed {:>10}: score {:>7} level {:>3} lines {:>5} max combo {:>3} moves {:>5}{}",
            i + 1,
            seed,
            report.score,
            report.level,
            report.lines,
            report.max_combo,
            report.moves,
            if report.game_over { "" } else { " (capped)" }
        );
        last = Some(engine);
    }

    if args.games > 1 {
        println!("average score {}", total_score / args.games as u64);
    }

    if let (Some(path), Some(engine)) = (&args.save, &last) {
        save_to_path(path, &engine.snapshot())?;
        println!("saved to {}", path);
    }
    Ok(())
}
