//! Fleet mission lifecycle.
//!
//! A mission launched on turn T is outbound until its arrival turn, fights on
//! the arrival turn, returns until its return turn, and on the return turn
//! its survivors rejoin the home garrison. Missions cannot be recalled.
//!
//! Stages are derived from the turn being resolved:
//! - `current < arrival`           -> Outbound
//! - `current == arrival`          -> Combat
//! - `arrival < current < return`  -> Returning
//! - `current >= return`           -> merged home and removed

use crate::config::GameConfig;
use crate::error::EngineError;
use crate::model::{FleetComposition, FleetMovement, MissionType, PlayerState};

/// The stage a mission is in while `current` is being resolved.
pub fn mission_stage(mission: &FleetMovement, current: u32) -> MissionType {
    if current < mission.arrival_turn {
        MissionType::Outbound
    } else if current == mission.arrival_turn {
        MissionType::Combat
    } else {
        MissionType::Returning
    }
}

/// True once the mission's survivors are due back home.
pub fn is_due_home(mission: &FleetMovement, current: u32) -> bool {
    current >= mission.return_turn
}

/// True while any mission is away from home. Informational only: nothing
/// stops a side from leaving its home thin.
pub fn is_home_system_vulnerable(missions: &[FleetMovement], current: u32) -> bool {
    missions.iter().any(|m| !is_due_home(m, current))
}

/// Moves `fleet` out of the home garrison into a new mission launched on
/// `turn`.
pub fn launch_mission(
    player: &mut PlayerState,
    id: u32,
    fleet: FleetComposition,
    turn: u32,
    config: &GameConfig,
) -> Result<(), EngineError> {
    let side = player.side;
    let offsets = &config.missions;
    if turn.checked_add(offsets.arrival_offset.max(offsets.return_offset)).is_none() {
        return Err(EngineError::TurnOverflow { side, turn });
    }
    let home = player
        .fleet
        .home
        .checked_sub(&fleet)
        .ok_or(EngineError::UnavailableFleet { side, fleet })?;
    player.fleet.home = home;
    let mission = FleetMovement::launch(
        id,
        side,
        fleet,
        turn,
        offsets.arrival_offset,
        offsets.return_offset,
    );
    tracing::debug!(%side, id, %fleet, arrival = mission.arrival_turn, "mission launched");
    player.fleet.missions.push(mission);
    Ok(())
}

/// Updates every mission's stage for `current` and returns the ids of the
/// missions that fight this turn.
pub fn advance_missions(player: &mut PlayerState, current: u32) -> Result<Vec<u32>, EngineError> {
    let mut arriving = Vec::new();
    for mission in &mut player.fleet.missions {
        if mission.owner == mission.target {
            return Err(EngineError::SelfTargetedMission { id: mission.id, owner: mission.owner });
        }
        mission.mission_type = mission_stage(mission, current);
        if mission.mission_type == MissionType::Combat {
            arriving.push(mission.id);
        }
    }
    Ok(arriving)
}

/// Replaces a mission's ships with the battle survivors, removing the
/// mission when none survived. Returns false if the mission was removed.
pub fn record_survivors(player: &mut PlayerState, id: u32, survivors: FleetComposition) -> bool {
    if survivors.is_empty() {
        player.fleet.missions.retain(|m| m.id != id);
        return false;
    }
    if let Some(mission) = player.fleet.missions.iter_mut().find(|m| m.id == id) {
        mission.composition = survivors;
    }
    true
}

/// Merges every mission due home into the garrison and removes it.
/// Returns the ships that came home.
pub fn apply_returns(player: &mut PlayerState, current: u32) -> Result<FleetComposition, EngineError> {
    let side = player.side;
    let mut returned = FleetComposition::EMPTY;
    let mut still_away = Vec::with_capacity(player.fleet.missions.len());
    for mission in player.fleet.missions.drain(..) {
        if is_due_home(&mission, current) {
            returned = returned
                .checked_add(&mission.composition)
                .ok_or(EngineError::CountOverflow { side, context: "merging returning missions" })?;
        } else {
            still_away.push(mission);
        }
    }
    player.fleet.missions = still_away;
    player.fleet.home = player
        .fleet
        .home
        .checked_add(&returned)
        .ok_or(EngineError::CountOverflow { side, context: "merging returning missions" })?;
    if !returned.is_empty() {
        tracing::debug!(%side, %returned, "missions returned home");
    }
    Ok(returned)
}
