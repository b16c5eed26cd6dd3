//! ArcLink Headless Puzzle Harness
//!
//! Loads a level pack and exercises every level through the puzzle rules:
//! scripted solutions, snapshot round trips and seeded random play with
//! board invariants checked after every step. No rendering, no input.
//!
//! Usage:
//!   cargo run -p arclink-simtest
//!   cargo run -p arclink-simtest -- --verbose --seed 7
//!   cargo run -p arclink-simtest -- --levels my_pack.json --save progress.bin

mod levels;
mod printer;
mod progress;

use anyhow::Result;
use arclink_logic::geometry::Orientation;
use arclink_logic::level::{build_board, Level};
use arclink_logic::puzzle::Puzzle;
use clap::Parser;
use levels::LevelPack;
use progress::Progress;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "arclink-simtest", about = "Headless puzzle harness for ArcLink")]
struct Args {
    /// Level pack to check instead of the bundled one
    #[arg(long)]
    levels: Option<PathBuf>,

    /// Print every check and the boards
    #[arg(short, long)]
    verbose: bool,

    /// Seed for random play
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Random moves played per level
    #[arg(long, default_value_t = 200)]
    random_moves: usize,

    /// Write progress for the pack to this file
    #[arg(long)]
    save: Option<PathBuf>,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn new(name: impl Into<String>, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    println!("=== ArcLink Puzzle Harness ===\n");

    let pack = match &args.levels {
        Some(path) => LevelPack::load(path)?,
        None => LevelPack::bundled()?,
    };
    log::info!(
        "pack '{}' v{}: {} levels",
        pack.info.title,
        pack.info.version,
        pack.levels.len()
    );
    if let Some(current) = pack.level(pack.current_level) {
        log::info!("current level: {}", current.name);
    }

    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut progress = Progress::new(pack.levels.clone());

    // 1. Pack-level checks
    results.extend(validate_pack(&pack));

    // 2. Per-level checks
    for (index, level) in pack.levels.iter().enumerate() {
        println!("--- Level {}: {} ---", index, level.name);
        results.extend(validate_level(level, &args, &mut rng));

        if let Some(puzzle) = solved_session(level) {
            progress.record(index, level, &puzzle);
        }
    }

    // 3. Progress persistence
    if let Some(path) = &args.save {
        results.extend(validate_progress(&progress, path));
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

// ── 1. Pack ─────────────────────────────────────────────────────────────

fn validate_pack(pack: &LevelPack) -> Vec<TestResult> {
    println!("--- Pack ---");
    let mut results = Vec::new();

    results.push(TestResult::new(
        "pack_not_empty",
        !pack.levels.is_empty(),
        format!("{} levels", pack.levels.len()),
    ));

    results.push(TestResult::new(
        "pack_current_level_in_range",
        pack.current_level < pack.levels.len().max(1),
        format!("current level {}", pack.current_level),
    ));

    let round_trip = pack
        .to_json()
        .and_then(|json| LevelPack::parse(&json))
        .map(|back| back == *pack);
    results.push(TestResult::new(
        "pack_json_round_trip",
        matches!(round_trip, Ok(true)),
        match round_trip {
            Ok(true) => "identical after re-encoding".to_string(),
            Ok(false) => "pack changed after re-encoding".to_string(),
            Err(e) => format!("{:#}", e),
        },
    ));

    results
}

// ── 2. Levels ───────────────────────────────────────────────────────────

fn validate_level(level: &Level, args: &Args, rng: &mut StdRng) -> Vec<TestResult> {
    let tag = |check: &str| format!("{}/{}", level.name, check);
    let mut results = Vec::new();

    let board = match build_board(level) {
        Ok(b) => b,
        Err(e) => {
            results.push(TestResult::new(tag("build"), false, e.to_string()));
            return results;
        }
    };
    results.push(TestResult::new(
        tag("build"),
        true,
        format!(
            "{} nodes, {} arcs, {} islands",
            board.grid().node_count(),
            board.live_arc_count(),
            board.islands().island_count()
        ),
    ));

    let errors = board.check_invariants();
    results.push(TestResult::new(
        tag("invariants"),
        errors.is_empty(),
        if errors.is_empty() {
            "consistent".to_string()
        } else {
            errors.join("; ")
        },
    ));

    let puzzle = match Puzzle::from_level(level) {
        Ok(p) => p,
        Err(e) => {
            results.push(TestResult::new(tag("session"), false, e.to_string()));
            return results;
        }
    };
    results.push(TestResult::new(
        tag("not_won_at_start"),
        !puzzle.is_won(),
        format!("holding: {}", puzzle.is_holding()),
    ));

    if args.verbose {
        let sources = puzzle.board().pull_sources();
        let targets = puzzle.push_targets();
        print!(
            "{}",
            printer::render(puzzle.board(), &sources, &targets)
        );
    }

    results.push(replay_tutorial(level, &tag("tutorial")));
    results.push(random_play(puzzle.clone(), args.random_moves, rng, &tag("random_play")));
    results.push(snapshot_round_trip(&puzzle, &tag("snapshot")));

    results
}

/// Play the scripted steps: pull when idle, push when holding.
fn replay_tutorial(level: &Level, name: &str) -> TestResult {
    let Some(steps) = &level.tutorial else {
        return TestResult::new(name, true, "no tutorial");
    };
    let mut puzzle = match Puzzle::from_level(level) {
        Ok(p) => p,
        Err(e) => return TestResult::new(name, false, e.to_string()),
    };

    for (i, step) in steps.iter().enumerate() {
        let result = if puzzle.is_holding() {
            puzzle.push_arc_at(step.point, step.direction)
        } else {
            puzzle.pull_arc_at(step.point, step.direction)
        };
        if let Err(e) = result {
            return TestResult::new(name, false, format!("step {} ({}): {}", i, step.point, e));
        }
    }

    TestResult::new(
        name,
        puzzle.is_won(),
        format!(
            "{} steps, {} moves, won: {}",
            steps.len(),
            puzzle.moves(),
            puzzle.is_won()
        ),
    )
}

/// Seeded random pulls and pushes; invariants must hold after each step.
fn random_play(mut puzzle: Puzzle, steps: usize, rng: &mut StdRng, name: &str) -> TestResult {
    let mut played = 0;
    for step in 0..steps {
        if puzzle.is_holding() {
            let targets = puzzle.push_targets();
            let Some(field) = targets.choose(rng) else {
                return TestResult::new(name, false, format!("step {}: held arc has no target", step));
            };
            if let Err(e) = puzzle.push_arc(field) {
                return TestResult::new(name, false, format!("step {}: push {}: {}", step, field, e));
            }
        } else {
            let sources = puzzle.board().pull_sources();
            let Some(arc) = sources.choose(rng).and_then(|f| f.arc()) else {
                break;
            };
            let direction = Orientation::ALL[rng.gen_range(0..Orientation::ALL.len())];
            if let Err(e) = puzzle.pull_arc(arc, direction) {
                return TestResult::new(name, false, format!("step {}: pull: {}", step, e));
            }
        }
        played += 1;

        let errors = puzzle.board().check_invariants();
        if !errors.is_empty() {
            return TestResult::new(name, false, format!("step {}: {}", step, errors.join("; ")));
        }
    }

    TestResult::new(
        name,
        true,
        format!(
            "{} steps, {} moves, {} wins, {} islands",
            played,
            puzzle.moves(),
            puzzle.win_count(),
            puzzle.board().islands().island_count()
        ),
    )
}

/// A snapshot rebuilds into a session that snapshots identically.
fn snapshot_round_trip(puzzle: &Puzzle, name: &str) -> TestResult {
    let snapshot = puzzle.to_level();
    let rebuilt = match Puzzle::from_level(&snapshot) {
        Ok(p) => p,
        Err(e) => return TestResult::new(name, false, e.to_string()),
    };
    let same = rebuilt.to_level() == snapshot;
    let json_same = serde_json::to_string(&snapshot)
        .ok()
        .and_then(|json| serde_json::from_str::<Level>(&json).ok())
        .is_some_and(|back| back == snapshot);

    TestResult::new(
        name,
        same && json_same && !rebuilt.is_holding(),
        format!(
            "{} nodes, {} arcs, rebuild equal: {}, json equal: {}",
            snapshot.nodes.len(),
            snapshot.arcs.len(),
            same,
            json_same
        ),
    )
}

/// Session left in the state the tutorial reaches, if it has one.
fn solved_session(level: &Level) -> Option<Puzzle> {
    let steps = level.tutorial.as_ref()?;
    let mut puzzle = Puzzle::from_level(level).ok()?;
    for step in steps {
        let result = if puzzle.is_holding() {
            puzzle.push_arc_at(step.point, step.direction)
        } else {
            puzzle.pull_arc_at(step.point, step.direction)
        };
        result.ok()?;
    }
    Some(puzzle)
}

// ── 3. Progress ─────────────────────────────────────────────────────────

fn validate_progress(progress: &Progress, path: &std::path::Path) -> Vec<TestResult> {
    println!("--- Progress ---");
    let mut results = Vec::new();

    if let Err(e) = progress.save(path) {
        results.push(TestResult::new("progress_save", false, format!("{:#}", e)));
        return results;
    }
    results.push(TestResult::new(
        "progress_save",
        true,
        format!("{}", path.display()),
    ));

    let loaded = Progress::load(path);
    results.push(TestResult::new(
        "progress_reload",
        matches!(&loaded, Ok(p) if p == progress),
        match &loaded {
            Ok(p) => format!(
                "{} levels, {} won",
                p.levels.len(),
                p.levels.iter().filter(|l| l.win_count > 0).count()
            ),
            Err(e) => format!("{:#}", e),
        },
    ));

    results
}
