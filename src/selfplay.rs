//! Persona-versus-persona self-play.
//!
//! Plays complete games with an AI persona on each side and records a
//! per-turn summary of each. Games are independent, so with more than one
//! thread they run concurrently on a rayon pool and are streamed back to
//! the caller as they finish.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::{take_turn, AiState, Persona};
use crate::config::GameConfig;
use crate::engine::Game;
use crate::model::{FleetComposition, Resources, Side, VictoryType};

/// Hard stop for games whose configuration disables the turn limit.
const SAFETY_TURNS: u32 = 1_000;

/// Configuration for a self-play run.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    pub player_persona: Persona,
    pub ai_persona: Persona,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Base seed; game `i` uses `seed + i`. 0 draws a fresh seed per game.
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
    pub game: GameConfig,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            player_persona: Persona::Aggressor,
            ai_persona: Persona::Economist,
            threads: 4,
            seed: 0,
            quiet: false,
            game: GameConfig::default(),
        }
    }
}

/// State of both sides after one resolved turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSummary {
    pub turn: u32,
    pub player_fleet_value: i64,
    pub ai_fleet_value: i64,
    pub player_resources: Resources,
    pub ai_resources: Resources,
    pub battles: usize,
}

/// A complete self-play game record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Sequential game ID.
    pub game_id: usize,
    /// Seed that replays this game exactly.
    pub seed: u64,
    pub player_persona: Persona,
    pub ai_persona: Persona,
    pub winner: Option<Side>,
    pub victory_type: Option<VictoryType>,
    /// Last turn resolved.
    pub final_turn: u32,
    pub final_player_fleet: FleetComposition,
    pub final_ai_fleet: FleetComposition,
    /// Turns whose resolution failed and were skipped.
    pub failed_turns: usize,
    pub turns: Vec<TurnSummary>,
}

impl GameRecord {
    pub fn total_battles(&self) -> usize {
        self.turns.iter().map(|t| t.battles).sum()
    }
}

/// Plays one game to completion.
pub fn play_game(config: &SelfPlayConfig, game_id: usize, seed: u64) -> GameRecord {
    let mut game = Game::with_seed(config.game.clone(), seed);
    let mut player = AiState::new(config.player_persona);
    let mut ai = AiState::new(config.ai_persona);
    let mut turns = Vec::new();
    let mut failed_turns = 0;

    for _ in 0..SAFETY_TURNS {
        if game.is_game_over() {
            break;
        }
        let turn = game.turn();
        take_turn(&mut game, Side::Player, &mut player);
        take_turn(&mut game, Side::Ai, &mut ai);
        let result = game.end_turn();
        if !result.success {
            failed_turns += 1;
            continue;
        }
        let state = game.state();
        turns.push(TurnSummary {
            turn,
            player_fleet_value: game.config().fleet_value(&state.player.fleet.total()),
            ai_fleet_value: game.config().fleet_value(&state.ai.fleet.total()),
            player_resources: state.player.resources,
            ai_resources: state.ai.resources,
            battles: result.combat_events.len(),
        });
    }

    let state = game.state();
    GameRecord {
        game_id,
        seed,
        player_persona: config.player_persona,
        ai_persona: config.ai_persona,
        winner: state.winner,
        victory_type: state.victory_type,
        final_turn: turns.last().map_or(0, |t| t.turn),
        final_player_fleet: state.player.fleet.total(),
        final_ai_fleet: state.ai.fleet.total(),
        failed_turns,
        turns,
    }
}

/// Runs self-play and collects all game records, in completion order.
pub fn run_self_play(config: &SelfPlayConfig) -> Vec<GameRecord> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| {
        games.push(game);
    });
    games
}

/// Runs self-play, calling `on_game` with each completed game record.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    if config.threads > 1 {
        run_self_play_parallel(config, on_game);
    } else {
        run_self_play_sequential(config, on_game);
    }
}

fn game_seed(config: &SelfPlayConfig, i: usize) -> u64 {
    if config.seed != 0 {
        config.seed.wrapping_add(i as u64)
    } else {
        rand::thread_rng().gen()
    }
}

fn report(config: &SelfPlayConfig, n: usize, game: &GameRecord, started: Instant) {
    if config.quiet {
        return;
    }
    let outcome = match (game.winner, game.victory_type) {
        (Some(w), Some(v)) => format!("{} wins ({})", w, v.name()),
        _ => "no winner".to_string(),
    };
    tracing::info!(
        "game {}/{}: {} on turn {} ({:.2}s)",
        n,
        config.num_games,
        outcome,
        game.final_turn,
        started.elapsed().as_secs_f64()
    );
}

/// Sequential self-play: plays games one at a time.
fn run_self_play_sequential<F>(config: &SelfPlayConfig, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let started = Instant::now();
        let game = play_game(config, i, game_seed(config, i));
        report(config, i + 1, &game, started);
        on_game(game);
    }
}

/// Parallel self-play on a dedicated rayon pool. Completed games are sent
/// over a channel and handed to the callback on the calling thread.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, mut on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let pool = match rayon::ThreadPoolBuilder::new().num_threads(config.threads).build() {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(error = %e, "failed to build thread pool; playing sequentially");
            return run_self_play_sequential(config, on_game);
        }
    };

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<GameRecord>();

    std::thread::scope(|scope| {
        scope.spawn(|| {
            pool.install(|| {
                (0..config.num_games).into_par_iter().for_each_with(tx, |tx, i| {
                    let started = Instant::now();
                    let game = play_game(config, i, game_seed(config, i));
                    let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    report(config, n, &game, started);
                    let _ = tx.send(game);
                });
            });
        });

        for game in rx {
            on_game(game);
        }
    });
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        write_game_json(game, out)?;
    }
    out.flush()
}

/// Writes a single game record as one JSON line.
pub fn write_game_json<W: Write>(game: &GameRecord, out: &mut W) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, game)?;
    writeln!(out)
}

/// Aggregate results of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub games: usize,
    pub player_wins: usize,
    pub ai_wins: usize,
    pub no_winner: usize,
    pub military: usize,
    pub economic: usize,
    pub turn_limit: usize,
    pub total_turns: u64,
    pub total_battles: usize,
}

pub fn summarize(games: &[GameRecord]) -> Summary {
    let mut s = Summary { games: games.len(), ..Summary::default() };
    for game in games {
        match game.winner {
            Some(Side::Player) => s.player_wins += 1,
            Some(Side::Ai) => s.ai_wins += 1,
            None => s.no_winner += 1,
        }
        match game.victory_type {
            Some(VictoryType::Military) => s.military += 1,
            Some(VictoryType::Economic) => s.economic += 1,
            Some(VictoryType::TurnLimit) => s.turn_limit += 1,
            Some(VictoryType::Stalemate) | None => {}
        }
        s.total_turns += game.final_turn as u64;
        s.total_battles += game.total_battles();
    }
    s
}

/// Prints a summary of a run to stderr.
pub fn print_summary(config: &SelfPlayConfig, games: &[GameRecord]) {
    let s = summarize(games);
    let n = s.games.max(1) as f64;
    eprintln!("=== Self-Play Summary ===");
    eprintln!("Games: {} ({} vs {})", s.games, config.player_persona, config.ai_persona);
    eprintln!("Player ({}) wins: {}", config.player_persona, s.player_wins);
    eprintln!("AI ({}) wins: {}", config.ai_persona, s.ai_wins);
    eprintln!("No winner: {}", s.no_winner);
    eprintln!("By type: military {}, economic {}, turn limit {}", s.military, s.economic, s.turn_limit);
    eprintln!("Avg turns/game: {:.1}", s.total_turns as f64 / n);
    eprintln!("Avg battles/game: {:.1}", s.total_battles as f64 / n);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick(threads: usize) -> SelfPlayConfig {
        let mut config = SelfPlayConfig { num_games: 3, threads, seed: 42, quiet: true, ..SelfPlayConfig::default() };
        config.game.victory.max_turns = 30;
        config
    }

    #[test]
    fn play_single_game_completes() {
        let config = quick(1);
        let game = play_game(&config, 0, 42);
        assert_eq!(game.failed_turns, 0);
        assert!(game.final_turn >= 1 && game.final_turn <= 30);
        assert!(game.victory_type.is_some());
        assert_eq!(game.turns.len() as u32, game.final_turn);
    }

    #[test]
    fn same_seed_same_game() {
        let config = quick(1);
        assert_eq!(play_game(&config, 0, 7), play_game(&config, 0, 7));
    }

    #[test]
    fn sequential_run_produces_correct_count() {
        let games = run_self_play(&quick(1));
        assert_eq!(games.len(), 3);
        let ids: Vec<_> = games.iter().map(|g| g.game_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn parallel_run_matches_sequential() {
        let mut parallel = run_self_play(&quick(2));
        parallel.sort_by_key(|g| g.game_id);
        assert_eq!(parallel, run_self_play(&quick(1)));
    }

    #[test]
    fn jsonl_output_is_valid() {
        let games = run_self_play(&quick(1));
        let mut buf = Vec::new();
        write_jsonl(&games, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        for (line, game) in lines.iter().zip(&games) {
            let back: GameRecord = serde_json::from_str(line).unwrap();
            assert_eq!(&back, game);
        }
    }

    #[test]
    fn summary_counts_outcomes() {
        let games = run_self_play(&quick(1));
        let s = summarize(&games);
        assert_eq!(s.games, 3);
        assert_eq!(s.player_wins + s.ai_wins + s.no_winner, 3);
    }
}
