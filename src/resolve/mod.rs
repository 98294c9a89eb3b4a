//! Turn resolution.
//!
//! Pure game rules: economy, construction, missions, combat and victory,
//! tied together by the per-turn pipeline in [`turn`].

pub mod combat;
pub mod construction;
pub mod economy;
pub mod mission;
pub mod phase;
pub mod turn;
pub mod victory;

pub use combat::{resolve_combat, resolve_combat_with_rolls, CombatRolls, RandomFactors};
pub use turn::{resolve_turn, PendingBuild, PendingOrders, PendingScan, TurnReport};
pub use victory::Verdict;
