//! Headless runner.
//!
//! Builds an engine from `CANDY_*` variables and flags, runs the requested
//! operations and prints every outcome plus the final snapshot as one JSON
//! document on stdout.

use anyhow::Result;
use serde::Serialize;

use candy_cascade::cli::parse_headless_args;
use candy_cascade::core::{AutoMovesOutcome, BoardSnapshot, ColorBombOutcome, Engine, EngineConfig};
use candy_cascade::logging;

#[derive(Debug, Serialize)]
struct Report {
    seed: Option<u32>,
    initial: Vec<String>,
    color_bomb: Option<ColorBombOutcome>,
    automatic_moves: Option<AutoMovesOutcome>,
    final_board: Vec<String>,
    snapshot: BoardSnapshot,
}

fn main() -> Result<()> {
    logging::init_from_env()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let parsed = parse_headless_args(&args, EngineConfig::from_env())?;

    let mut engine = Engine::from_config(&parsed.config)?;
    let initial = engine.snapshot().to_text();

    let color_bomb = match parsed.bomb {
        Some(target) => Some(engine.trigger_color_bomb(target)?),
        None => None,
    };
    let automatic_moves = if parsed.auto > 0 {
        Some(engine.run_automatic_moves(parsed.auto)?)
    } else {
        None
    };

    let snapshot = engine.snapshot();
    let report = Report {
        seed: engine.seed(),
        initial,
        color_bomb,
        automatic_moves,
        final_board: snapshot.to_text(),
        snapshot,
    };

    let json = if parsed.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}
