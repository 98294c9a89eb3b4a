//! Shared AI heuristics.
//!
//! Threat estimation from scans, counter-composition choice, battle
//! projections, and a spending budget that mirrors the session's own
//! affordability checks so personas never emit a build the engine would
//! refuse for cost or drain.

use crate::config::GameConfig;
use crate::intel::ScanResult;
use crate::model::{
    Amount, BuildTarget, Command, FleetComposition, PlayerState, UnitType, ALL_UNIT_TYPES,
};
use crate::resolve::combat::{calculate_fleet_strength, counter_of, RandomFactors};
use crate::resolve::economy::{is_economy_stalled, project_income, validate_build_order};

/// Upper bound on a single build batch.
pub const MAX_BATCH: u32 = 1_000;

/// Scans older than this many turns are refreshed.
pub const SCAN_STALENESS: u32 = 3;

/// Estimated enemy home garrison. Without a scan, assume the enemy still
/// holds the starting fleet.
pub fn threat_estimate(scan: Option<&ScanResult>, config: &GameConfig) -> FleetComposition {
    scan.map_or(config.start.fleet, |s| s.observed_fleet)
}

/// True when the latest scan is missing or stale on `turn`.
pub fn needs_scan(scan: Option<&ScanResult>, turn: u32) -> bool {
    scan.map_or(true, |s| turn.saturating_sub(s.turn) >= SCAN_STALENESS)
}

/// The unit type that beats the enemy's most numerous type. Frigates when
/// nothing is known.
pub fn counter_composition(enemy: &FleetComposition) -> UnitType {
    enemy.dominant_type().map_or(UnitType::Frigate, counter_of)
}

/// Projected attacker/defender strength ratio with neutral factors.
/// An empty defender is an infinite ratio, matching the resolver's
/// decisive attacker rule.
pub fn projected_ratio(attacker: &FleetComposition, defender: &FleetComposition) -> f64 {
    if defender.is_empty() {
        return if attacker.is_empty() { 0.0 } else { f64::INFINITY };
    }
    let n = RandomFactors::NEUTRAL;
    let a = calculate_fleet_strength(attacker, defender, &n.attacker);
    let d = calculate_fleet_strength(defender, attacker, &n.defender);
    if d <= 0.0 {
        if a > 0.0 { f64::INFINITY } else { 0.0 }
    } else {
        a / d
    }
}

/// `fraction` of every unit count, rounded down.
pub fn detachment(home: &FleetComposition, fraction: f64) -> FleetComposition {
    let fraction = fraction.clamp(0.0, 1.0);
    FleetComposition::from_fn(|t| (home.count(t) as f64 * fraction).floor() as u32)
}

/// Spendable resources and the income they must leave positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    pub available: Amount,
    pub net: Amount,
}

impl Budget {
    pub fn for_side(player: &PlayerState, config: &GameConfig) -> Self {
        Budget { available: player.resources.stock(), net: project_income(player, config) }
    }

    /// Largest batch of `target` that is affordable and sustainable.
    pub fn max_affordable(&self, target: BuildTarget, config: &GameConfig) -> u32 {
        if is_economy_stalled(self.net) {
            return 0;
        }
        let cost = config.build_cost(target);
        let drain = config.build_drain(target);
        let mut q = MAX_BATCH as i64;
        for (have, each) in [(self.available.metal, cost.metal), (self.available.energy, cost.energy)] {
            if each > 0 {
                q = q.min(have / each);
            }
        }
        for (income, each) in [(self.net.metal, drain.metal), (self.net.energy, drain.energy)] {
            if each > 0 {
                q = q.min((income - 1) / each);
            }
        }
        q.max(0) as u32
    }

    /// Reserves `quantity` of `target` when the engine would accept it.
    pub fn try_build(&mut self, target: BuildTarget, quantity: u32, config: &GameConfig) -> Option<Command> {
        let order = validate_build_order(target, quantity, self.available, self.net, config).ok()?;
        self.available -= config.build_cost(target).scale(quantity as i64);
        self.net -= order.drain_per_turn;
        Some(Command::Build { target, quantity })
    }

    /// Builds `share` of the largest affordable batch, at least one.
    pub fn build_share(&mut self, target: BuildTarget, share: f64, config: &GameConfig) -> Option<Command> {
        let max = self.max_affordable(target, config);
        if max == 0 {
            return None;
        }
        let quantity = ((max as f64 * share).floor() as u32).clamp(1, max);
        self.try_build(target, quantity, config)
    }

    /// Reserves a scan cost if it is covered.
    pub fn try_spend(&mut self, cost: Amount) -> bool {
        if !self.available.covers(&cost) {
            return false;
        }
        self.available -= cost;
        true
    }
}

/// Sum of home and queued units of each type, for composition decisions.
pub fn planned_fleet(player: &PlayerState) -> FleetComposition {
    let mut fleet = player.fleet.home;
    for order in &player.economy.queue {
        if let BuildTarget::Unit(t) = order.target {
            let slot = fleet.count_mut(t);
            *slot = slot.saturating_add(order.quantity);
        }
    }
    fleet
}

/// Share of the fleet value held in `unit_type`.
pub fn value_share(fleet: &FleetComposition, unit_type: UnitType, config: &GameConfig) -> f64 {
    let total = config.fleet_value(fleet);
    if total == 0 {
        return 0.0;
    }
    let only = FleetComposition::from_fn(|t| if t == unit_type { fleet.count(t) } else { 0 });
    config.fleet_value(&only) as f64 / total as f64
}

/// Unit type with the smallest value share, preferring cheaper types on ties.
pub fn weakest_type(fleet: &FleetComposition, config: &GameConfig) -> UnitType {
    let mut best = UnitType::Frigate;
    let mut best_share = f64::INFINITY;
    for t in ALL_UNIT_TYPES {
        let share = value_share(fleet, t, config);
        if share < best_share {
            best = t;
            best_share = share;
        }
    }
    best
}
