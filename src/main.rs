//! Fleetfall: play a fleet strategy game against an AI persona.
//!
//! Reads commands from stdin and writes responses to stdout; logs go to
//! stderr. Type `help` for the command list.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fleetfall::ai::{take_turn, AiState, Persona};
use fleetfall::config::{load_config, GameConfig};
use fleetfall::engine::{Ack, Game};
use fleetfall::logging::init_logging;
use fleetfall::model::{Command, Side};
use fleetfall::protocol::{format_scan, format_status, format_turn_result, parse_command, CliCommand, HELP};

/// Play fleetfall against an AI persona
#[derive(Parser, Debug)]
#[command(name = "fleetfall")]
#[command(about = "Interactive fleet strategy game against an AI opponent")]
struct Args {
    /// AI persona: aggressor, economist, trickster or hybrid
    #[arg(long, default_value = "hybrid")]
    persona: Persona,

    /// Game configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };
    let game = match args.seed {
        Some(seed) => Game::with_seed(config, seed),
        None => Game::new(config),
    };

    match run(game, AiState::new(args.persona)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Runs the command loop until `quit`, end of input, or the end of the game.
fn run(mut game: Game, mut ai: AiState) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    writeln!(out, "fleetfall: you command the player fleet against the {} AI. Type 'help' for commands.", ai.persona)?;
    write!(out, "{}", format_status(&game, Side::Player))?;
    out.flush()?;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            CliCommand::Quit => break,
            CliCommand::Help => writeln!(out, "{}", HELP)?,
            CliCommand::Status => write!(out, "{}", format_status(&game, Side::Player))?,
            CliCommand::Game(Command::EndTurn) => {
                take_turn(&mut game, Side::Ai, &mut ai);
                match game.submit(Side::Player, Command::EndTurn) {
                    Ok(Ack::Resolved(result)) => {
                        write!(out, "{}", format_turn_result(&result))?;
                        if result.game_ended {
                            out.flush()?;
                            break;
                        }
                        write!(out, "{}", format_status(&game, Side::Player))?;
                    }
                    Ok(_) => {}
                    Err(e) => writeln!(out, "rejected: {}", e)?,
                }
            }
            CliCommand::Game(command) => match game.submit(Side::Player, command) {
                Ok(Ack::Queued) => writeln!(out, "ok")?,
                Ok(Ack::Scanned(scan)) => writeln!(out, "{}", format_scan(&scan))?,
                Ok(Ack::Resolved(result)) => write!(out, "{}", format_turn_result(&result))?,
                Err(e) => writeln!(out, "rejected: {}", e)?,
            },
        }
        out.flush()?;
    }
    out.flush()
}
