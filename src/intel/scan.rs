//! Scan execution and results.
//!
//! Missions in flight are invisible to every tier. Basic and Advanced scans
//! report each ship count scaled by a random factor within the tier's
//! configured noise; Deep scans are exact and also reveal stockpiles and
//! structure counts.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::model::{FleetComposition, PlayerState, ScanTier};

/// What a scan reported about the opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Turn the scan was taken on.
    pub turn: u32,
    pub tier: ScanTier,
    /// Home garrison as observed, noise included.
    pub observed_fleet: FleetComposition,
    pub metal: Option<i64>,
    pub energy: Option<i64>,
    pub mines: Option<u32>,
    pub reactors: Option<u32>,
}

impl ScanResult {
    /// A result that observed nothing.
    pub fn blank(turn: u32, tier: ScanTier) -> Self {
        ScanResult {
            turn,
            tier,
            observed_fleet: FleetComposition::EMPTY,
            metal: None,
            energy: None,
            mines: None,
            reactors: None,
        }
    }

    /// True when the counts are exact.
    pub fn is_exact(&self) -> bool {
        self.tier == ScanTier::Deep
    }
}

/// Scans `target` on `turn`.
pub fn perform_scan(
    tier: ScanTier,
    target: &PlayerState,
    turn: u32,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> ScanResult {
    let noise = config.scan_spec(tier).noise;
    let home = &target.fleet.home;
    let observed_fleet = FleetComposition::from_fn(|t| observe(home.count(t), noise, rng));

    let mut result = ScanResult { observed_fleet, ..ScanResult::blank(turn, tier) };
    if tier == ScanTier::Deep {
        result.metal = Some(target.resources.metal);
        result.energy = Some(target.resources.energy);
        result.mines = Some(target.economy.mines);
        result.reactors = Some(target.economy.reactors);
    }
    tracing::debug!(scanned = %target.side, tier = tier.name(), observed = %result.observed_fleet, "scan taken");
    result
}

fn observe(count: u32, noise: f64, rng: &mut impl Rng) -> u32 {
    if noise <= 0.0 || count == 0 {
        return count;
    }
    let factor = rng.gen_range((1.0 - noise)..=(1.0 + noise));
    (count as f64 * factor).round().max(0.0) as u32
}
