//! Game state representation.
//!
//! Holds the complete snapshot of a game between turns: both players'
//! resources, fleets, economies and intelligence, plus the combat log and
//! the game-over flags.

use serde::{Deserialize, Serialize};

use super::battle::CombatEvent;
use super::mission::FleetMovement;
use super::resources::{Amount, Resources};
use super::unit::{BuildTarget, FleetComposition};
use crate::config::GameConfig;
use crate::intel::ScanResult;

/// One of the two competing economies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Ai,
}

/// Both sides, in resolution order.
pub const BOTH_SIDES: [Side; 2] = [Side::Player, Side::Ai];

impl Side {
    pub const fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Ai => "ai",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse stage of the game, derived from the turn number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Early,
    Mid,
    Late,
    Endgame,
}

impl GamePhase {
    pub const fn name(self) -> &'static str {
        match self {
            GamePhase::Early => "early",
            GamePhase::Mid => "mid",
            GamePhase::Late => "late",
            GamePhase::Endgame => "endgame",
        }
    }
}

/// How the game was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryType {
    /// The loser has no ships left anywhere.
    Military,
    /// The loser ran out of resources with a stalled economy.
    Economic,
    /// The turn limit was reached and fleet value decided.
    TurnLimit,
    /// The game ended without a winner.
    Stalemate,
}

impl VictoryType {
    pub const fn name(self) -> &'static str {
        match self {
            VictoryType::Military => "military",
            VictoryType::Economic => "economic",
            VictoryType::TurnLimit => "turn_limit",
            VictoryType::Stalemate => "stalemate",
        }
    }
}

/// An item under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOrder {
    pub target: BuildTarget,
    pub quantity: u32,
    pub turns_remaining: u32,
    /// Drain of the whole order (all `quantity` items) per turn.
    pub drain_per_turn: Amount,
}

/// Ships at home and ships away on missions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fleet {
    pub home: FleetComposition,
    pub missions: Vec<FleetMovement>,
}

impl Fleet {
    /// All ships owned, home and away. Saturates rather than failing since
    /// this is a derived view.
    pub fn total(&self) -> FleetComposition {
        self.missions.iter().fold(self.home, |acc, m| {
            FleetComposition::from_fn(|t| acc.count(t).saturating_add(m.composition.count(t)))
        })
    }
}

/// Structures and the construction queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Economy {
    pub mines: u32,
    pub reactors: u32,
    pub queue: Vec<BuildOrder>,
}

/// Intelligence gathered by one side. The turn engine never reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intelligence {
    pub scans: Vec<ScanResult>,
}

impl Intelligence {
    /// The most recent scan, if any.
    pub fn latest(&self) -> Option<&ScanResult> {
        self.scans.last()
    }

    /// Appends a scan, dropping the oldest beyond `limit`.
    pub fn record(&mut self, scan: ScanResult, limit: usize) {
        self.scans.push(scan);
        if self.scans.len() > limit {
            let excess = self.scans.len() - limit;
            self.scans.drain(..excess);
        }
    }
}

/// Everything one side owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub side: Side,
    pub resources: Resources,
    pub fleet: Fleet,
    pub economy: Economy,
    pub intelligence: Intelligence,
    /// Consecutive turns ended with empty stockpiles and a stalled economy.
    pub stalled_turns: u32,
}

impl PlayerState {
    /// Creates a side in the configured starting position.
    pub fn starting(side: Side, config: &GameConfig) -> Self {
        let start = &config.start;
        PlayerState {
            side,
            resources: Resources::new(start.metal, start.energy),
            fleet: Fleet { home: start.fleet, missions: Vec::new() },
            economy: Economy { mines: start.mines, reactors: start.reactors, queue: Vec::new() },
            intelligence: Intelligence::default(),
            stalled_turns: 0,
        }
    }
}

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// The turn currently open for commands, starting at 1.
    pub turn: u32,
    pub player: PlayerState,
    pub ai: PlayerState,
    pub combat_log: Vec<CombatEvent>,
    pub game_phase: GamePhase,
    pub is_game_over: bool,
    pub winner: Option<Side>,
    pub victory_type: Option<VictoryType>,
    pub next_mission_id: u32,
}

impl GameState {
    /// Creates a new game on turn 1 with both sides in the starting position.
    pub fn new(config: &GameConfig) -> Self {
        let mut state = GameState {
            turn: 1,
            player: PlayerState::starting(Side::Player, config),
            ai: PlayerState::starting(Side::Ai, config),
            combat_log: Vec::new(),
            game_phase: GamePhase::Early,
            is_game_over: false,
            winner: None,
            victory_type: None,
            next_mission_id: 1,
        };
        for side in BOTH_SIDES {
            let income = crate::resolve::economy::project_income(state.side(side), config);
            let resources = &mut state.side_mut(side).resources;
            resources.metal_income = income.metal;
            resources.energy_income = income.energy;
        }
        state
    }

    pub fn side(&self, side: Side) -> &PlayerState {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut PlayerState {
        match side {
            Side::Player => &mut self.player,
            Side::Ai => &mut self.ai,
        }
    }

    /// Combat events recorded on a given turn.
    pub fn battles_on(&self, turn: u32) -> impl Iterator<Item = &CombatEvent> {
        self.combat_log.iter().filter(move |e| e.turn == turn)
    }
}
