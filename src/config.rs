//! Game configuration.
//!
//! Every balance constant lives here. Values load from TOML; any section or
//! field left out falls back to the defaults below, so an empty file is a
//! valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{Amount, BuildTarget, FleetComposition, ScanTier, StructureType, UnitType};

/// Complete game configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub economy: EconomyConfig,
    pub units: UnitTable,
    pub structures: StructureTable,
    pub start: StartConfig,
    pub missions: MissionConfig,
    pub victory: VictoryConfig,
    pub phases: PhaseConfig,
    pub scan: ScanConfig,
}

/// Base income and structure bonuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub base_metal_income: i64,
    pub base_energy_income: i64,
    pub mine_metal_bonus: i64,
    pub reactor_energy_bonus: i64,
    /// Units under construction drain this multiple of their upkeep.
    pub construction_drain_multiplier: i64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        EconomyConfig {
            base_metal_income: 100,
            base_energy_income: 50,
            mine_metal_bonus: 50,
            reactor_energy_bonus: 40,
            construction_drain_multiplier: 2,
        }
    }
}

/// Cost, build time and upkeep of one ship class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub cost: Amount,
    pub build_turns: u32,
    pub upkeep: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitTable {
    pub frigate: UnitSpec,
    pub cruiser: UnitSpec,
    pub battleship: UnitSpec,
}

impl Default for UnitTable {
    fn default() -> Self {
        UnitTable {
            frigate: UnitSpec { cost: Amount::new(50, 20), build_turns: 1, upkeep: Amount::new(1, 1) },
            cruiser: UnitSpec { cost: Amount::new(120, 60), build_turns: 2, upkeep: Amount::new(2, 2) },
            battleship: UnitSpec { cost: Amount::new(300, 150), build_turns: 3, upkeep: Amount::new(5, 4) },
        }
    }
}

/// Cost, build time and per-turn construction drain of one structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureSpec {
    pub cost: Amount,
    pub build_turns: u32,
    pub drain: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureTable {
    pub mine: StructureSpec,
    pub reactor: StructureSpec,
}

impl Default for StructureTable {
    fn default() -> Self {
        StructureTable {
            mine: StructureSpec { cost: Amount::new(150, 50), build_turns: 3, drain: Amount::new(5, 2) },
            reactor: StructureSpec { cost: Amount::new(100, 100), build_turns: 3, drain: Amount::new(3, 5) },
        }
    }
}

/// Starting position, identical for both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartConfig {
    pub metal: i64,
    pub energy: i64,
    pub fleet: FleetComposition,
    pub mines: u32,
    pub reactors: u32,
}

impl Default for StartConfig {
    fn default() -> Self {
        StartConfig {
            metal: 1000,
            energy: 600,
            fleet: FleetComposition::new(10, 5, 2),
            mines: 1,
            reactors: 1,
        }
    }
}

/// Longest accepted `return_offset`.
pub const MAX_MISSION_OFFSET: u32 = 1_000;

/// Mission timeline, in turns after launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub arrival_offset: u32,
    pub return_offset: u32,
}

impl Default for MissionConfig {
    fn default() -> Self {
        MissionConfig { arrival_offset: 1, return_offset: 3 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VictoryConfig {
    /// Consecutive broke-and-stalled turns before economic collapse.
    pub collapse_turns: u32,
    /// Last turn played; 0 disables the limit.
    pub max_turns: u32,
}

impl Default for VictoryConfig {
    fn default() -> Self {
        VictoryConfig { collapse_turns: 3, max_turns: 100 }
    }
}

/// First turn of each game phase after Early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    pub mid_turn: u32,
    pub late_turn: u32,
    pub endgame_turn: u32,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        PhaseConfig { mid_turn: 11, late_turn: 26, endgame_turn: 41 }
    }
}

/// Cost and accuracy of one scan tier. `noise` is the maximum relative error
/// applied to each observed unit count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSpec {
    pub cost: Amount,
    pub noise: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub basic: ScanSpec,
    pub advanced: ScanSpec,
    pub deep: ScanSpec,
    /// Scan results kept per side.
    pub history: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            basic: ScanSpec { cost: Amount::new(0, 30), noise: 0.3 },
            advanced: ScanSpec { cost: Amount::new(20, 80), noise: 0.15 },
            deep: ScanSpec { cost: Amount::new(60, 200), noise: 0.0 },
            history: 10,
        }
    }
}

impl GameConfig {
    pub fn unit(&self, unit_type: UnitType) -> &UnitSpec {
        match unit_type {
            UnitType::Frigate => &self.units.frigate,
            UnitType::Cruiser => &self.units.cruiser,
            UnitType::Battleship => &self.units.battleship,
        }
    }

    pub fn structure(&self, structure: StructureType) -> &StructureSpec {
        match structure {
            StructureType::Mine => &self.structures.mine,
            StructureType::Reactor => &self.structures.reactor,
        }
    }

    pub fn scan_spec(&self, tier: ScanTier) -> &ScanSpec {
        match tier {
            ScanTier::Basic => &self.scan.basic,
            ScanTier::Advanced => &self.scan.advanced,
            ScanTier::Deep => &self.scan.deep,
        }
    }

    /// Upfront cost of a single item.
    pub fn build_cost(&self, target: BuildTarget) -> Amount {
        match target {
            BuildTarget::Unit(u) => self.unit(u).cost,
            BuildTarget::Structure(s) => self.structure(s).cost,
        }
    }

    pub fn build_turns(&self, target: BuildTarget) -> u32 {
        match target {
            BuildTarget::Unit(u) => self.unit(u).build_turns,
            BuildTarget::Structure(s) => self.structure(s).build_turns,
        }
    }

    /// Per-turn drain of a single item while under construction.
    pub fn build_drain(&self, target: BuildTarget) -> Amount {
        match target {
            BuildTarget::Unit(u) => self.unit(u).upkeep.scale(self.economy.construction_drain_multiplier),
            BuildTarget::Structure(s) => self.structure(s).drain,
        }
    }

    /// Total build cost of a fleet, used as its value.
    pub fn fleet_value(&self, fleet: &FleetComposition) -> i64 {
        crate::model::ALL_UNIT_TYPES
            .iter()
            .map(|&t| {
                let cost = self.unit(t).cost;
                (cost.metal + cost.energy).saturating_mul(fleet.count(t) as i64)
            })
            .sum()
    }

    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for t in crate::model::ALL_UNIT_TYPES {
            if self.unit(t).build_turns == 0 {
                return Err(invalid("units.build_turns", format!("{} must take at least one turn", t.name())));
            }
        }
        for s in [StructureType::Mine, StructureType::Reactor] {
            if self.structure(s).build_turns == 0 {
                return Err(invalid("structures.build_turns", format!("{} must take at least one turn", s.name())));
            }
        }
        let m = &self.missions;
        if m.arrival_offset == 0 || m.arrival_offset >= m.return_offset {
            return Err(invalid(
                "missions",
                format!("need 0 < arrival_offset < return_offset, got {} and {}", m.arrival_offset, m.return_offset),
            ));
        }
        if m.return_offset > MAX_MISSION_OFFSET {
            return Err(invalid(
                "missions",
                format!("return_offset {} exceeds {}", m.return_offset, MAX_MISSION_OFFSET),
            ));
        }
        let p = &self.phases;
        if !(1 < p.mid_turn && p.mid_turn < p.late_turn && p.late_turn < p.endgame_turn) {
            return Err(invalid(
                "phases",
                format!("thresholds must increase, got {}/{}/{}", p.mid_turn, p.late_turn, p.endgame_turn),
            ));
        }
        if self.start.metal < 0 || self.start.energy < 0 {
            return Err(invalid("start", "starting resources must be non-negative".to_string()));
        }
        for tier in [ScanTier::Basic, ScanTier::Advanced, ScanTier::Deep] {
            let noise = self.scan_spec(tier).noise;
            if !(0.0..1.0).contains(&noise) {
                return Err(invalid("scan.noise", format!("{} noise {} outside [0, 1)", tier.name(), noise)));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<GameConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = GameConfig::from_toml_str(&contents)?;
    tracing::debug!(path = %path.display(), "loaded game config");
    Ok(config)
}
