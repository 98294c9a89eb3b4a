//! Self-play CLI.
//!
//! Plays persona-versus-persona games and writes one JSON record per game.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use fleetfall::ai::Persona;
use fleetfall::config::{load_config, GameConfig};
use fleetfall::logging::init_logging;
use fleetfall::selfplay::{self, SelfPlayConfig};

/// Persona-versus-persona self-play
#[derive(Parser, Debug)]
#[command(name = "selfplay")]
#[command(about = "Play AI-vs-AI games and write JSONL game records")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Persona playing the player side
    #[arg(long, default_value = "aggressor")]
    player: Persona,

    /// Persona playing the AI side
    #[arg(long, default_value = "economist")]
    ai: Persona,

    /// Number of parallel threads
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Base random seed, 0 for entropy
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Game configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the turn limit
    #[arg(long)]
    max_turns: Option<u32>,

    /// Output file path (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Suppress progress and summary output
    #[arg(long)]
    quiet: bool,

    /// Debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut game = match &args.config {
        Some(path) => match load_config(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };
    if let Some(max_turns) = args.max_turns {
        game.victory.max_turns = max_turns;
    }

    let config = SelfPlayConfig {
        num_games: args.games,
        player_persona: args.player,
        ai_persona: args.ai,
        threads: args.threads,
        seed: args.seed,
        quiet: args.quiet,
        game,
    };

    if !config.quiet {
        eprintln!(
            "Self-play: {} games, {} vs {}, {} threads",
            config.num_games, config.player_persona, config.ai_persona, config.threads
        );
    }

    let out: Box<dyn Write + Send> = match &args.output {
        Some(path) => match File::create(path) {
            Ok(f) => Box::new(f),
            Err(e) => {
                eprintln!("error: failed to create {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Box::new(io::stdout()),
    };
    let mut writer = BufWriter::new(out);

    let start = Instant::now();
    let mut games = Vec::with_capacity(config.num_games);
    let mut write_error = None;
    selfplay::run_self_play_with_callback(&config, |record| {
        if write_error.is_none() {
            if let Err(e) = selfplay::write_game_json(&record, &mut writer) {
                write_error = Some(e);
            }
        }
        games.push(record);
    });
    if let Err(e) = writer.flush() {
        write_error.get_or_insert(e);
    }
    if let Some(e) = write_error {
        eprintln!("error: failed to write output: {}", e);
        return ExitCode::FAILURE;
    }

    if !config.quiet {
        let elapsed = start.elapsed();
        eprintln!(
            "Completed {} games in {:.1}s ({:.1} games/s)",
            games.len(),
            elapsed.as_secs_f64(),
            games.len() as f64 / elapsed.as_secs_f64().max(1e-9)
        );
        selfplay::print_summary(&config, &games);
    }
    ExitCode::SUCCESS
}
