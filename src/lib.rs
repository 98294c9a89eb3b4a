//! Fleetfall engine library.
//!
//! A two-sided fleet strategy game: each side runs an economy, queues
//! construction, sends fleets against the other's home system and buys
//! intelligence. Exposes the rules, the game session, the AI personas and
//! the text protocol for the binaries and integration tests.

pub mod ai;
pub mod config;
pub mod engine;
pub mod error;
pub mod intel;
pub mod logging;
pub mod model;
pub mod protocol;
pub mod resolve;
pub mod selfplay;
