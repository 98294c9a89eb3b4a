//! Plain-text rendering of game state for the interactive loop.

use std::fmt::Write;

use crate::engine::{Game, TurnResult};
use crate::intel::ScanResult;
use crate::model::{BuildOrder, CombatEvent, FleetMovement, Resources, Side};
use crate::resolve::mission::is_home_system_vulnerable;

/// `metal 1000 (+120)  energy 600 (+62)`.
pub fn format_resources(r: &Resources) -> String {
    format!("metal {} ({:+})  energy {} ({:+})", r.metal, r.metal_income, r.energy, r.energy_income)
}

pub fn format_order(index: usize, order: &BuildOrder) -> String {
    format!(
        "[{}] {} x{}, {} turn(s) left, drain {}/{}",
        index,
        order.target.name(),
        order.quantity,
        order.turns_remaining,
        order.drain_per_turn.metal,
        order.drain_per_turn.energy
    )
}

pub fn format_mission(m: &FleetMovement) -> String {
    format!(
        "mission {} {} -> {} ({}), arrives turn {}, home turn {}",
        m.id,
        m.composition,
        m.target,
        m.mission_type.name(),
        m.arrival_turn,
        m.return_turn
    )
}

/// One line per battle.
pub fn format_combat_event(e: &CombatEvent) -> String {
    let r = &e.result;
    format!(
        "turn {}: {} attacked {} with {} against {}: {} (ratio {:.2}); attacker lost {}, defender lost {}",
        e.turn,
        e.attacker,
        e.defender,
        e.attacking_fleet,
        e.defending_fleet,
        r.outcome.name(),
        r.strength_ratio,
        r.attacker_casualties,
        r.defender_casualties
    )
}

pub fn format_scan(s: &ScanResult) -> String {
    let mut line = format!("{} scan on turn {}: enemy home {}", s.tier.name(), s.turn, s.observed_fleet);
    if let (Some(metal), Some(energy)) = (s.metal, s.energy) {
        let _ = write!(line, ", metal {} energy {}", metal, energy);
    }
    if let (Some(mines), Some(reactors)) = (s.mines, s.reactors) {
        let _ = write!(line, ", {} mine(s) {} reactor(s)", mines, reactors);
    }
    line
}

pub fn format_turn_result(result: &TurnResult) -> String {
    let mut out = String::new();
    if !result.success {
        let _ = writeln!(out, "turn failed: {}", result.errors.join("; "));
    }
    for event in &result.combat_events {
        let _ = writeln!(out, "{}", format_combat_event(event));
    }
    if result.game_ended {
        let winner = result.winner.map_or("nobody", Side::name);
        let how = result.victory_type.map_or("unknown", |v| v.name());
        let _ = writeln!(out, "game over: {} wins ({})", winner, how);
    }
    out
}

/// Everything `side` can see: own state in full, the opponent only
/// through the latest scan.
pub fn format_status(game: &Game, side: Side) -> String {
    let state = game.state();
    let me = state.side(side);
    let mut out = String::new();
    let _ = writeln!(out, "turn {} ({})", state.turn, state.game_phase.name());
    let _ = writeln!(out, "resources: {}", format_resources(&me.resources));
    let projected = game.projected_resources(side);
    let _ = writeln!(out, "after pending: metal {} energy {}", projected.metal, projected.energy);
    let _ = writeln!(out, "structures: {} mine(s), {} reactor(s)", me.economy.mines, me.economy.reactors);
    let _ = writeln!(out, "home fleet: {} ({} uncommitted)", me.fleet.home, game.available_fleet(side));
    for m in &me.fleet.missions {
        let _ = writeln!(out, "  {}", format_mission(m));
    }
    if is_home_system_vulnerable(&me.fleet.missions, state.turn) {
        let _ = writeln!(out, "warning: ships away, home system exposed");
    }
    if me.economy.queue.is_empty() {
        let _ = writeln!(out, "queue: empty");
    } else {
        let _ = writeln!(out, "queue:");
        for (i, order) in me.economy.queue.iter().enumerate() {
            let _ = writeln!(out, "  {}", format_order(i, order));
        }
    }
    match me.intelligence.latest() {
        Some(scan) => {
            let _ = writeln!(out, "intel: {}", format_scan(scan));
        }
        None => {
            let _ = writeln!(out, "intel: none");
        }
    }
    out
}
