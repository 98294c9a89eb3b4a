//! Commands a side can issue during a turn.
//!
//! Human input and AI decisions produce the same values and go through the
//! same validation path.

use serde::{Deserialize, Serialize};

use super::unit::{BuildTarget, FleetComposition};

/// Scan tiers, from cheap and noisy to expensive and exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanTier {
    Basic,
    Advanced,
    Deep,
}

impl ScanTier {
    pub const fn name(self) -> &'static str {
        match self {
            ScanTier::Basic => "basic",
            ScanTier::Advanced => "advanced",
            ScanTier::Deep => "deep",
        }
    }

    pub fn from_name(s: &str) -> Option<ScanTier> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Some(ScanTier::Basic),
            "advanced" => Some(ScanTier::Advanced),
            "deep" => Some(ScanTier::Deep),
            _ => None,
        }
    }
}

/// A command issued by one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "command")]
pub enum Command {
    /// Queue `quantity` units or structures.
    Build { target: BuildTarget, quantity: u32 },

    /// Send part of the home garrison against the opponent.
    Attack { fleet: FleetComposition },

    /// Buy an intelligence snapshot of the opponent.
    Scan { tier: ScanTier },

    /// Remove the construction order at `index` from the queue, without refund.
    Cancel { index: usize },

    /// Close the turn and run resolution.
    EndTurn,
}

/// The commands an AI persona chose for one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiDecision {
    pub commands: Vec<Command>,
}
