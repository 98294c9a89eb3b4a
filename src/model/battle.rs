//! Battle outcome types shared by the combat resolver and the combat log.

use serde::{Deserialize, Serialize};

use super::state::Side;
use super::unit::FleetComposition;

/// How decisively a battle went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    DecisiveAttacker,
    DecisiveDefender,
    CloseBattle,
}

impl BattleOutcome {
    pub const fn name(self) -> &'static str {
        match self {
            BattleOutcome::DecisiveAttacker => "decisive_attacker",
            BattleOutcome::DecisiveDefender => "decisive_defender",
            BattleOutcome::CloseBattle => "close_battle",
        }
    }
}

/// Which side of a battle a fleet fought on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatRole {
    Attacker,
    Defender,
}

/// The result of a single battle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatResult {
    pub outcome: BattleOutcome,
    pub attacker_survivors: FleetComposition,
    pub defender_survivors: FleetComposition,
    pub attacker_casualties: FleetComposition,
    pub defender_casualties: FleetComposition,
    pub attacker_strength: f64,
    pub defender_strength: f64,
    /// `attacker_strength / defender_strength`, or infinity when the defender
    /// had no strength.
    pub strength_ratio: f64,
}

/// A battle recorded in the game's combat log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatEvent {
    pub turn: u32,
    pub mission_id: u32,
    pub attacker: Side,
    pub defender: Side,
    pub attacking_fleet: FleetComposition,
    pub defending_fleet: FleetComposition,
    pub result: CombatResult,
}

impl CombatEvent {
    /// The side that came out ahead, if the battle was decisive.
    pub fn victor(&self) -> Option<Side> {
        match self.result.outcome {
            BattleOutcome::DecisiveAttacker => Some(self.attacker),
            BattleOutcome::DecisiveDefender => Some(self.defender),
            BattleOutcome::CloseBattle => None,
        }
    }
}
