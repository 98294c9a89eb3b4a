//! Victory evaluation.
//!
//! Checked once per turn after combat and returns, in priority order:
//! fleet elimination, economic collapse, then the turn limit.

use crate::config::GameConfig;
use crate::model::{CombatEvent, FleetComposition, FleetMovement, GameState, PlayerState, Side, VictoryType};

/// The result of a decided game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub winner: Option<Side>,
    pub victory_type: VictoryType,
}

/// True when a side has no ships at home and none on missions.
pub fn check_fleet_elimination(home: &FleetComposition, missions: &[FleetMovement]) -> bool {
    home.is_empty() && missions.iter().all(|m| m.composition.is_empty())
}

/// Military victory check.
///
/// When both sides are eliminated in the same turn, the defender of the
/// last battle fought that turn wins; with no battle, the AI does.
pub fn check_victory_conditions(
    player_home: &FleetComposition,
    player_missions: &[FleetMovement],
    ai_home: &FleetComposition,
    ai_missions: &[FleetMovement],
    last_battle: Option<&CombatEvent>,
) -> Option<Verdict> {
    let player_out = check_fleet_elimination(player_home, player_missions);
    let ai_out = check_fleet_elimination(ai_home, ai_missions);
    let winner = match (player_out, ai_out) {
        (false, false) => return None,
        (true, true) => last_battle.map_or(Side::Ai, |b| b.defender),
        (true, false) => Side::Ai,
        (false, true) => Side::Player,
    };
    Some(Verdict { winner: Some(winner), victory_type: VictoryType::Military })
}

/// Economic collapse: a side that has spent `collapse_turns` consecutive
/// turns with empty stockpiles and a stalled economy loses. Both collapsing
/// together is a stalemate. `collapse_turns == 0` disables the check.
pub fn check_economic_collapse(player: &PlayerState, ai: &PlayerState, collapse_turns: u32) -> Option<Verdict> {
    if collapse_turns == 0 {
        return None;
    }
    let player_out = player.stalled_turns >= collapse_turns;
    let ai_out = ai.stalled_turns >= collapse_turns;
    let winner = match (player_out, ai_out) {
        (false, false) => return None,
        (true, true) => return Some(Verdict { winner: None, victory_type: VictoryType::Stalemate }),
        (true, false) => Side::Ai,
        (false, true) => Side::Player,
    };
    Some(Verdict { winner: Some(winner), victory_type: VictoryType::Economic })
}

/// Turn limit: after `max_turns` the side with the more valuable fleet wins.
pub fn check_turn_limit(state: &GameState, config: &GameConfig) -> Option<Verdict> {
    let limit = config.victory.max_turns;
    if limit == 0 || state.turn < limit {
        return None;
    }
    let player_value = config.fleet_value(&state.player.fleet.total());
    let ai_value = config.fleet_value(&state.ai.fleet.total());
    let verdict = match player_value.cmp(&ai_value) {
        std::cmp::Ordering::Greater => Verdict { winner: Some(Side::Player), victory_type: VictoryType::TurnLimit },
        std::cmp::Ordering::Less => Verdict { winner: Some(Side::Ai), victory_type: VictoryType::TurnLimit },
        std::cmp::Ordering::Equal => Verdict { winner: None, victory_type: VictoryType::Stalemate },
    };
    Some(verdict)
}

/// Runs every check against the state of the turn just resolved.
pub fn evaluate(state: &GameState, config: &GameConfig) -> Option<Verdict> {
    let last_battle = state.battles_on(state.turn).last();
    check_victory_conditions(
        &state.player.fleet.home,
        &state.player.fleet.missions,
        &state.ai.fleet.home,
        &state.ai.fleet.missions,
        last_battle,
    )
    .or_else(|| check_economic_collapse(&state.player, &state.ai, config.victory.collapse_turns))
    .or_else(|| check_turn_limit(state, config))
}
