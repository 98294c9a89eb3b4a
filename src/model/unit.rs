//! Unit and structure types, and fleet compositions.
//!
//! A fleet is always described by a per-type count; individual ships have no
//! identity. Structures are the economic buildings that raise base income.

use serde::{Deserialize, Serialize};

/// The three ship classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Frigate,
    Cruiser,
    Battleship,
}

/// All unit types in table order.
pub const ALL_UNIT_TYPES: [UnitType; 3] = [UnitType::Frigate, UnitType::Cruiser, UnitType::Battleship];

impl UnitType {
    /// Index into per-type arrays (effectiveness table, random factors).
    pub const fn index(self) -> usize {
        match self {
            UnitType::Frigate => 0,
            UnitType::Cruiser => 1,
            UnitType::Battleship => 2,
        }
    }

    /// Lowercase name used by the text protocol.
    pub const fn name(self) -> &'static str {
        match self {
            UnitType::Frigate => "frigate",
            UnitType::Cruiser => "cruiser",
            UnitType::Battleship => "battleship",
        }
    }

    /// Parses a unit type from its name, accepting a trailing plural `s`.
    pub fn from_name(s: &str) -> Option<UnitType> {
        let lower = s.to_ascii_lowercase();
        match lower.trim_end_matches('s') {
            "frigate" | "f" => Some(UnitType::Frigate),
            "cruiser" | "c" => Some(UnitType::Cruiser),
            "battleship" | "b" => Some(UnitType::Battleship),
            _ => None,
        }
    }
}

/// Economic structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureType {
    Mine,
    Reactor,
}

impl StructureType {
    pub const fn name(self) -> &'static str {
        match self {
            StructureType::Mine => "mine",
            StructureType::Reactor => "reactor",
        }
    }

    pub fn from_name(s: &str) -> Option<StructureType> {
        let lower = s.to_ascii_lowercase();
        match lower.trim_end_matches('s') {
            "mine" => Some(StructureType::Mine),
            "reactor" => Some(StructureType::Reactor),
            _ => None,
        }
    }
}

/// Anything that can sit in a construction queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "type")]
pub enum BuildTarget {
    Unit(UnitType),
    Structure(StructureType),
}

impl BuildTarget {
    pub fn name(self) -> &'static str {
        match self {
            BuildTarget::Unit(u) => u.name(),
            BuildTarget::Structure(s) => s.name(),
        }
    }

    /// Parses either a unit or a structure name.
    pub fn from_name(s: &str) -> Option<BuildTarget> {
        UnitType::from_name(s)
            .map(BuildTarget::Unit)
            .or_else(|| StructureType::from_name(s).map(BuildTarget::Structure))
    }
}

/// Per-type ship counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FleetComposition {
    pub frigates: u32,
    pub cruisers: u32,
    pub battleships: u32,
}

impl FleetComposition {
    pub const EMPTY: FleetComposition = FleetComposition { frigates: 0, cruisers: 0, battleships: 0 };

    pub const fn new(frigates: u32, cruisers: u32, battleships: u32) -> Self {
        FleetComposition { frigates, cruisers, battleships }
    }

    /// Returns the count for one unit type.
    pub const fn count(&self, unit_type: UnitType) -> u32 {
        match unit_type {
            UnitType::Frigate => self.frigates,
            UnitType::Cruiser => self.cruisers,
            UnitType::Battleship => self.battleships,
        }
    }

    /// Mutable access to the count for one unit type.
    pub fn count_mut(&mut self, unit_type: UnitType) -> &mut u32 {
        match unit_type {
            UnitType::Frigate => &mut self.frigates,
            UnitType::Cruiser => &mut self.cruisers,
            UnitType::Battleship => &mut self.battleships,
        }
    }

    /// Builds a composition by evaluating `f` for each unit type.
    pub fn from_fn(mut f: impl FnMut(UnitType) -> u32) -> Self {
        FleetComposition {
            frigates: f(UnitType::Frigate),
            cruisers: f(UnitType::Cruiser),
            battleships: f(UnitType::Battleship),
        }
    }

    /// Total number of ships.
    pub fn total(&self) -> u64 {
        self.frigates as u64 + self.cruisers as u64 + self.battleships as u64
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// True when every per-type count of `other` is available in `self`.
    pub fn contains(&self, other: &FleetComposition) -> bool {
        ALL_UNIT_TYPES.iter().all(|&t| self.count(t) >= other.count(t))
    }

    /// Subtracts `other`, or returns `None` if any type would go negative.
    pub fn checked_sub(&self, other: &FleetComposition) -> Option<FleetComposition> {
        Some(FleetComposition {
            frigates: self.frigates.checked_sub(other.frigates)?,
            cruisers: self.cruisers.checked_sub(other.cruisers)?,
            battleships: self.battleships.checked_sub(other.battleships)?,
        })
    }

    /// Subtraction clamped at zero per type. Only for derived views.
    pub fn saturating_sub(&self, other: &FleetComposition) -> FleetComposition {
        FleetComposition::from_fn(|t| self.count(t).saturating_sub(other.count(t)))
    }

    /// Adds `other`, or returns `None` on overflow.
    pub fn checked_add(&self, other: &FleetComposition) -> Option<FleetComposition> {
        Some(FleetComposition {
            frigates: self.frigates.checked_add(other.frigates)?,
            cruisers: self.cruisers.checked_add(other.cruisers)?,
            battleships: self.battleships.checked_add(other.battleships)?,
        })
    }

    /// The unit type with the highest count, or `None` for an empty fleet.
    /// Ties resolve in table order.
    pub fn dominant_type(&self) -> Option<UnitType> {
        let mut best: Option<(UnitType, u32)> = None;
        for &t in &ALL_UNIT_TYPES {
            let c = self.count(t);
            if c > 0 && best.map_or(true, |(_, b)| c > b) {
                best = Some((t, c));
            }
        }
        best.map(|(t, _)| t)
    }
}

impl std::fmt::Display for FleetComposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}F/{}C/{}B", self.frigates, self.cruisers, self.battleships)
    }
}
