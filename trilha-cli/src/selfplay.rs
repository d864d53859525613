//! Selfplay command - the heuristic opponent on both seats
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_games(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: formatting utilities

use anyhow::{ensure, Result};
use clap::Args;
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;

use trilha_core::{GameMode, GameState, HeuristicAi, Player};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SelfplayArgs {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Turn cap per game; games still running are counted as unfinished
    #[arg(long, default_value = "300")]
    pub max_turns: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    seed: u64,
    winner: Option<Player>,
    turns: u32,
    selections: usize,
}

/// Aggregated results
#[derive(Clone, Debug, Serialize)]
struct SelfplayResults {
    total_games: usize,
    player_one_wins: usize,
    player_two_wins: usize,
    unfinished: usize,
    avg_turns: f32,
    games: Vec<GameRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run selfplay command
///
/// 1. Play every game (in parallel, one seed each)
/// 2. Report results
pub fn run(args: SelfplayArgs, seed: Option<u64>) -> Result<()> {
    ensure!(args.games > 0, "--games must be at least 1");

    let base_seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    tracing::info!(
        "Starting selfplay: {} games, max {} turns, seed {}",
        args.games,
        args.max_turns,
        base_seed
    );

    let results = play_games(args.games, args.max_turns, base_seed);
    report_results(&results, args.json)?;

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play_games(games: usize, max_turns: u32, base_seed: u64) -> SelfplayResults {
    let records: Vec<GameRecord> = (0..games)
        .into_par_iter()
        .map(|i| play_single_game(i + 1, base_seed.wrapping_add(i as u64), max_turns))
        .collect();

    compute_statistics(records)
}

fn report_results(results: &SelfplayResults, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn play_single_game(game_number: usize, seed: u64, max_turns: u32) -> GameRecord {
    let mut ai = HeuristicAi::with_seed(seed);
    let (state, selections) = ai.play_game(GameState::new(GameMode::PlayerVsPlayer), max_turns);

    tracing::debug!(
        game_number,
        winner = ?state.winner(),
        turns = state.turn(),
        "game finished"
    );

    GameRecord {
        game_number,
        seed,
        winner: state.winner(),
        turns: state.turn(),
        selections,
    }
}

fn compute_statistics(games: Vec<GameRecord>) -> SelfplayResults {
    let wins = |player| games.iter().filter(|g| g.winner == Some(player)).count();
    let player_one_wins = wins(Player::One);
    let player_two_wins = wins(Player::Two);
    let unfinished = games.iter().filter(|g| g.winner.is_none()).count();

    let total_turns: u64 = games.iter().map(|g| g.turns as u64).sum();
    let avg_turns = if games.is_empty() {
        0.0
    } else {
        total_turns as f32 / games.len() as f32
    };

    SelfplayResults {
        total_games: games.len(),
        player_one_wins,
        player_two_wins,
        unfinished,
        avg_turns,
        games,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn percent(count: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f32 / total as f32
    }
}

fn print_text_results(results: &SelfplayResults) {
    let total = results.total_games;

    println!("\n=== Selfplay Results ===");
    println!("Total games:    {}", total);
    println!(
        "Player 1 wins:  {} ({:.1}%)",
        results.player_one_wins,
        percent(results.player_one_wins, total)
    );
    println!(
        "Player 2 wins:  {} ({:.1}%)",
        results.player_two_wins,
        percent(results.player_two_wins, total)
    );
    println!(
        "Unfinished:     {} ({:.1}%)",
        results.unfinished,
        percent(results.unfinished, total)
    );
    println!("Avg turns:      {:.1}", results.avg_turns);
}
