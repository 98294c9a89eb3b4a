//! Resource income and build affordability.
//!
//! Net income is recomputed from scratch every turn:
//! base + structure bonuses - construction drain - home fleet upkeep.
//! Ships away on missions pay no upkeep.

use crate::config::GameConfig;
use crate::error::CommandError;
use crate::model::{
    Amount, BuildOrder, BuildTarget, Economy, FleetComposition, PlayerState, ALL_UNIT_TYPES,
};

/// Base income plus mine and reactor bonuses.
pub fn structure_income(economy: &Economy, config: &GameConfig) -> Amount {
    let e = &config.economy;
    Amount::new(
        e.base_metal_income + e.mine_metal_bonus.saturating_mul(economy.mines as i64),
        e.base_energy_income + e.reactor_energy_bonus.saturating_mul(economy.reactors as i64),
    )
}

/// Sum of per-turn drains over a construction queue.
pub fn construction_drain(queue: &[BuildOrder]) -> Amount {
    queue.iter().map(|o| o.drain_per_turn).sum()
}

/// Upkeep of the ships in a home garrison.
pub fn fleet_upkeep(home: &FleetComposition, config: &GameConfig) -> Amount {
    ALL_UNIT_TYPES
        .iter()
        .map(|&t| config.unit(t).upkeep.scale(home.count(t) as i64))
        .sum()
}

/// Net income given an explicit construction drain.
pub fn net_income(player: &PlayerState, drain: Amount, config: &GameConfig) -> Amount {
    structure_income(&player.economy, config) - drain - fleet_upkeep(&player.fleet.home, config)
}

/// Net income the side would earn with its current queue and garrison.
/// Does not mutate anything.
pub fn project_income(player: &PlayerState, config: &GameConfig) -> Amount {
    net_income(player, construction_drain(&player.economy.queue), config)
}

/// Applies one turn of income.
///
/// Stores the net income in the income fields, adds it to the stockpile and
/// clamps each stockpile at zero. Returns the net income.
pub fn calculate_income(player: &mut PlayerState, drain: Amount, config: &GameConfig) -> Amount {
    let net = net_income(player, drain, config);
    let r = &mut player.resources;
    r.metal_income = net.metal;
    r.energy_income = net.energy;
    r.metal = r.metal.saturating_add(net.metal).max(0);
    r.energy = r.energy.saturating_add(net.energy).max(0);
    net
}

/// True when either net income is zero or negative.
pub fn is_economy_stalled(net: Amount) -> bool {
    net.metal <= 0 || net.energy <= 0
}

/// Updates the economic-collapse counter after income has been applied.
pub fn track_collapse(player: &mut PlayerState) {
    let r = &player.resources;
    if r.metal == 0 && r.energy == 0 && is_economy_stalled(r.income()) {
        player.stalled_turns += 1;
    } else {
        player.stalled_turns = 0;
    }
}

/// True when `available` pays `cost` and adding `drain` keeps every drained
/// resource's net income above zero.
pub fn can_afford_and_sustain(available: Amount, net: Amount, cost: Amount, drain: Amount) -> bool {
    available.covers(&cost) && sustains(net, drain)
}

fn sustains(net: Amount, drain: Amount) -> bool {
    let after = net - drain;
    (drain.metal <= 0 || after.metal > 0) && (drain.energy <= 0 || after.energy > 0)
}

/// Validates a new build order against a side's available resources and
/// projected net income, and creates the order on success.
///
/// Checks, in order: non-zero quantity, stalled economy, upfront cost, and
/// whether the added drain is sustainable.
pub fn validate_build_order(
    target: BuildTarget,
    quantity: u32,
    available: Amount,
    net: Amount,
    config: &GameConfig,
) -> Result<BuildOrder, CommandError> {
    if quantity == 0 {
        return Err(CommandError::ZeroQuantity);
    }
    if is_economy_stalled(net) {
        return Err(CommandError::EconomyStalled { income: net });
    }
    let cost = config.build_cost(target).scale(quantity as i64);
    if !available.covers(&cost) {
        return Err(CommandError::InsufficientResources { needed: cost, available });
    }
    let drain = config.build_drain(target).scale(quantity as i64);
    if !sustains(net, drain) {
        return Err(CommandError::UnsustainableDrain { target, quantity, projected: net - drain });
    }
    Ok(BuildOrder {
        target,
        quantity,
        turns_remaining: config.build_turns(target),
        drain_per_turn: drain,
    })
}
