//! Interactive command parser.
//!
//! Parses one line of player input into a `CliCommand` the main loop can
//! dispatch on. Game commands map directly onto `model::Command`; the rest
//! only affect the session.

use crate::model::{BuildTarget, Command, FleetComposition, ScanTier};

/// A parsed line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliCommand {
    /// A command for the engine.
    Game(Command),

    /// Print the current state.
    Status,

    /// Print the command reference.
    Help,

    /// Leave the game.
    Quit,
}

/// Command reference shown by `help`.
pub const HELP: &str = "\
commands:
  build <frigate|cruiser|battleship|mine|reactor> <n>   queue construction
  attack <frigates> <cruisers> <battleships>            send a fleet against the enemy
  scan <basic|advanced|deep>                            buy intelligence on the enemy home
  cancel <index>                                        cancel a queued order (no refund)
  end                                                   end the turn
  status                                                show the game state
  help                                                  show this text
  quit                                                  leave the game";

/// Parses a single line of input.
///
/// Returns `None` for empty lines and unrecognized commands. Malformed
/// arguments for known commands also return `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<CliCommand> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (&head, args) = tokens.split_first()?;

    match head.to_ascii_lowercase().as_str() {
        "end" | "endturn" | "end_turn" => Some(CliCommand::Game(Command::EndTurn)),
        "status" | "s" => Some(CliCommand::Status),
        "help" | "?" => Some(CliCommand::Help),
        "quit" | "exit" => Some(CliCommand::Quit),

        "build" => parse_build(args),
        "attack" => parse_attack(args),
        "scan" => parse_scan(args),
        "cancel" => parse_cancel(args),

        other => {
            tracing::warn!(command = other, "unknown command");
            None
        }
    }
}

/// Parses `build <target> <n>`.
fn parse_build(args: &[&str]) -> Option<CliCommand> {
    let [target, quantity] = args else {
        tracing::warn!("malformed build: expected 'build <target> <n>'");
        return None;
    };
    let Some(target) = BuildTarget::from_name(target) else {
        tracing::warn!(target, "unknown build target");
        return None;
    };
    let quantity = parse_number::<u32>("quantity", quantity)?;
    Some(CliCommand::Game(Command::Build { target, quantity }))
}

/// Parses `attack <frigates> <cruisers> <battleships>`.
fn parse_attack(args: &[&str]) -> Option<CliCommand> {
    let [f, c, b] = args else {
        tracing::warn!("malformed attack: expected 'attack <frigates> <cruisers> <battleships>'");
        return None;
    };
    let fleet = FleetComposition::new(
        parse_number("frigates", f)?,
        parse_number("cruisers", c)?,
        parse_number("battleships", b)?,
    );
    Some(CliCommand::Game(Command::Attack { fleet }))
}

/// Parses `scan <tier>`, defaulting to a basic scan.
fn parse_scan(args: &[&str]) -> Option<CliCommand> {
    let tier = match args {
        [] => ScanTier::Basic,
        [name] => match ScanTier::from_name(name) {
            Some(t) => t,
            None => {
                tracing::warn!(tier = name, "unknown scan tier");
                return None;
            }
        },
        _ => {
            tracing::warn!("malformed scan: expected 'scan <basic|advanced|deep>'");
            return None;
        }
    };
    Some(CliCommand::Game(Command::Scan { tier }))
}

/// Parses `cancel <index>`.
fn parse_cancel(args: &[&str]) -> Option<CliCommand> {
    let [index] = args else {
        tracing::warn!("malformed cancel: expected 'cancel <index>'");
        return None;
    };
    let index = parse_number::<usize>("index", index)?;
    Some(CliCommand::Game(Command::Cancel { index }))
}

fn parse_number<T: std::str::FromStr>(field: &str, token: &str) -> Option<T> {
    match token.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(field, value = token, "invalid number");
            None
        }
    }
}
