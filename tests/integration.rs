//! Integration tests for the fleetfall binary.
//!
//! Spawns the interactive game, sends commands via stdin, and checks the
//! responses on stdout.

use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

/// Sends a sequence of commands to the game and collects stdout lines.
fn run_game(args: &[&str], commands: &[&str]) -> (bool, Vec<String>) {
    let exe = env!("CARGO_BIN_EXE_fleetfall");
    let mut child = Command::new(exe)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start fleetfall");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let reader = std::io::BufReader::new(stdout);

    for cmd in commands {
        // The game may exit early on game over; later writes can fail.
        if writeln!(stdin, "{}", cmd).is_err() {
            break;
        }
    }
    let _ = stdin.flush();
    drop(stdin);

    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    (status.success(), lines)
}

fn seeded(commands: &[&str]) -> Vec<String> {
    let (ok, lines) = run_game(&["--seed", "7", "--persona", "economist"], commands);
    assert!(ok);
    lines
}

#[test]
fn greets_and_shows_status() {
    let lines = seeded(&["quit"]);
    assert!(lines[0].starts_with("fleetfall:"));
    assert!(lines[0].contains("economist"));
    assert!(lines.iter().any(|l| l == "turn 1 (early)"));
    assert!(lines.iter().any(|l| l == "home fleet: 10F/5C/2B (10F/5C/2B uncommitted)"));
}

#[test]
fn build_then_end_turn_advances() {
    let lines = seeded(&["build frigate 2", "end", "quit"]);
    assert!(lines.iter().any(|l| l == "ok"));
    assert!(lines.iter().any(|l| l == "turn 2 (early)"));
    assert!(lines.iter().any(|l| l.starts_with("home fleet: 12F/5C/2B")));
}

#[test]
fn rejected_commands_are_reported() {
    let lines = seeded(&["build battleship 100", "attack 0 0 0", "cancel 3", "quit"]);
    let rejected: Vec<_> = lines.iter().filter(|l| l.starts_with("rejected: ")).collect();
    assert_eq!(rejected.len(), 3, "{:?}", lines);
    assert!(rejected[0].contains("insufficient resources"));
    assert!(rejected[1].contains("empty"));
    assert!(rejected[2].contains("index 3"));
}

#[test]
fn unknown_and_malformed_input_is_ignored() {
    let with_noise = seeded(&["", "dance", "build dreadnought 2", "attack 1 2", "quit"]);
    let without = seeded(&["quit"]);
    assert_eq!(with_noise, without);
}

#[test]
fn scan_prints_report() {
    let lines = seeded(&["scan deep", "quit"]);
    assert!(lines.iter().any(|l| l.starts_with("deep scan on turn 1: enemy home 10F/5C/2B")));
}

#[test]
fn attack_fights_next_turn() {
    let lines = seeded(&["attack 10 5 2", "end", "end", "quit"]);
    assert!(lines.iter().any(|l| l.starts_with("turn 2: player attacked ai with 10F/5C/2B")), "{:?}", lines);
}

#[test]
fn help_lists_commands() {
    let lines = seeded(&["help", "quit"]);
    assert!(lines.iter().any(|l| l.trim_start().starts_with("build <frigate|cruiser|battleship|mine|reactor> <n>")));
}

#[test]
fn eof_exits_cleanly() {
    let (ok, lines) = run_game(&["--seed", "1"], &[]);
    assert!(ok);
    assert!(!lines.is_empty());
}

#[test]
fn turn_limit_ends_the_session() {
    let path = std::env::temp_dir().join(format!("fleetfall-limit-{}.toml", std::process::id()));
    std::fs::write(&path, "[victory]\nmax_turns = 1\n").unwrap();
    let (ok, lines) = run_game(
        &["--seed", "3", "--config", path.to_str().unwrap()],
        &["end", "status", "quit"],
    );
    let _ = std::fs::remove_file(&path);
    assert!(ok);
    assert!(lines.last().unwrap().starts_with("game over:"), "{:?}", lines);
}

#[test]
fn missing_config_fails() {
    let (ok, _) = run_game(&["--config", "/nonexistent/fleetfall.toml"], &["quit"]);
    assert!(!ok);
}
