//! Error types.
//!
//! Rule violations are `CommandError`s returned when a command is submitted.
//! Broken invariants inside turn resolution are `EngineError`s; the session
//! catches them and reports a failed turn without applying it.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::{Amount, BuildTarget, FleetComposition, Side};

/// A command was refused. Refused commands have no effect on the game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("the game is over")]
    GameOver,

    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("insufficient resources: need {needed_metal} metal / {needed_energy} energy, have {available_metal} / {available_energy}",
        needed_metal = .needed.metal, needed_energy = .needed.energy,
        available_metal = .available.metal, available_energy = .available.energy)]
    InsufficientResources { needed: Amount, available: Amount },

    #[error("economy stalled (net income {metal} metal / {energy} energy); no new construction accepted",
        metal = .income.metal, energy = .income.energy)]
    EconomyStalled { income: Amount },

    #[error("building {quantity} {target} would drive net income to {metal} metal / {energy} energy",
        target = .target.name(), metal = .projected.metal, energy = .projected.energy)]
    UnsustainableDrain { target: BuildTarget, quantity: u32, projected: Amount },

    #[error("attack fleet is empty")]
    EmptyFleet,

    #[error("insufficient fleet: requested {requested}, available {available}")]
    InsufficientFleet { requested: FleetComposition, available: FleetComposition },

    #[error("no construction order at index {index} (queue length {len})")]
    InvalidOrderIndex { index: usize, len: usize },

    #[error("construction order {0} is already being cancelled")]
    DuplicateCancel(usize),
}

/// An invariant was violated while resolving a turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("{side} fleet count overflow while {context}")]
    CountOverflow { side: Side, context: &'static str },

    #[error("mission {id} of {owner} targets its own owner")]
    SelfTargetedMission { id: u32, owner: Side },

    #[error("{side} cannot pay committed cost of {metal} metal / {energy} energy",
        metal = .cost.metal, energy = .cost.energy)]
    UnpaidCommitment { side: Side, cost: Amount },

    #[error("{side} cannot launch {fleet}: not in home garrison")]
    UnavailableFleet { side: Side, fleet: FleetComposition },

    #[error("{side} mission launched on turn {turn} would return after the last representable turn")]
    TurnOverflow { side: Side, turn: u32 },

    #[error("{side} has no construction order at index {index}")]
    MissingOrder { side: Side, index: usize },
}

/// The game configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
