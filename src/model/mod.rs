//! Game model types.
//!
//! Contains the core data structures for ships, resources, missions,
//! commands, battles and the overall game state.

pub mod battle;
pub mod command;
pub mod mission;
pub mod resources;
pub mod state;
pub mod unit;

pub use battle::{BattleOutcome, CombatEvent, CombatResult, CombatRole};
pub use command::{AiDecision, Command, ScanTier};
pub use mission::{FleetMovement, MissionType};
pub use resources::{Amount, Resources};
pub use state::{
    BuildOrder, Economy, Fleet, GamePhase, GameState, Intelligence, PlayerState, Side,
    VictoryType, BOTH_SIDES,
};
pub use unit::{BuildTarget, FleetComposition, StructureType, UnitType, ALL_UNIT_TYPES};
