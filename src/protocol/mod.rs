//! Text protocol for the interactive binary.
//!
//! Parsing of player input lines into commands, and plain-text rendering of
//! state, scans, battles and turn results.

pub mod format;
pub mod parser;

pub use format::{format_combat_event, format_scan, format_status, format_turn_result};
pub use parser::{parse_command, CliCommand, HELP};
