//! Fleet missions: ships sent from a home garrison to attack the opponent.

use serde::{Deserialize, Serialize};

use super::state::Side;
use super::unit::FleetComposition;

/// Lifecycle stage of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionType {
    Outbound,
    Combat,
    Returning,
}

impl MissionType {
    pub const fn name(self) -> &'static str {
        match self {
            MissionType::Outbound => "outbound",
            MissionType::Combat => "combat",
            MissionType::Returning => "returning",
        }
    }
}

/// An in-flight attack mission.
///
/// `composition` starts as the launched fleet and is replaced by the
/// survivors once combat has been fought.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetMovement {
    pub id: u32,
    pub owner: Side,
    pub target: Side,
    pub composition: FleetComposition,
    pub launch_turn: u32,
    pub arrival_turn: u32,
    pub return_turn: u32,
    pub mission_type: MissionType,
}

impl FleetMovement {
    /// Creates a mission launched on `turn` against the opponent of `owner`.
    /// Turns past `u32::MAX` saturate; `launch_mission` rejects them first.
    pub fn launch(
        id: u32,
        owner: Side,
        composition: FleetComposition,
        turn: u32,
        arrival_offset: u32,
        return_offset: u32,
    ) -> Self {
        FleetMovement {
            id,
            owner,
            target: owner.opponent(),
            composition,
            launch_turn: turn,
            arrival_turn: turn.saturating_add(arrival_offset),
            return_turn: turn.saturating_add(return_offset),
            mission_type: MissionType::Outbound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_sets_timeline_and_target() {
        let m = FleetMovement::launch(7, Side::Player, FleetComposition::new(3, 0, 1), 5, 1, 3);
        assert_eq!(m.target, Side::Ai);
        assert_eq!(m.arrival_turn, 6);
        assert_eq!(m.return_turn, 8);
        assert_eq!(m.mission_type, MissionType::Outbound);
    }
}
