//! AI opponents.
//!
//! Each persona is a pure function from the visible game state and the
//! AI's memory to a list of commands. The commands go through the same
//! `Game::submit` path as human input; rejected ones are logged and
//! dropped.

pub mod heuristic;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::engine::{Ack, Game};
use crate::intel::ScanResult;
use crate::model::{
    AiDecision, BuildTarget, Command, FleetComposition, GamePhase, GameState, PlayerState, ScanTier, Side,
    StructureType, UnitType,
};
use heuristic::{
    counter_composition, detachment, needs_scan, planned_fleet, projected_ratio, threat_estimate, weakest_type,
    Budget,
};

/// AI play styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Cheap ships and frequent attacks.
    Aggressor,
    /// Structures first, battleships later, attacks only with overwhelming odds.
    Economist,
    /// Counters the enemy's dominant type and raids with small detachments.
    Trickster,
    /// Economist early, Aggressor late.
    Hybrid,
}

pub const ALL_PERSONAS: [Persona; 4] = [Persona::Aggressor, Persona::Economist, Persona::Trickster, Persona::Hybrid];

impl Persona {
    pub const fn name(self) -> &'static str {
        match self {
            Persona::Aggressor => "aggressor",
            Persona::Economist => "economist",
            Persona::Trickster => "trickster",
            Persona::Hybrid => "hybrid",
        }
    }

    pub fn from_name(s: &str) -> Option<Persona> {
        ALL_PERSONAS.into_iter().find(|p| p.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Persona::from_name(s).ok_or_else(|| {
            let names: Vec<_> = ALL_PERSONAS.iter().map(|p| p.name()).collect();
            format!("unknown persona '{}', expected one of: {}", s, names.join(", "))
        })
    }
}

/// What an AI remembers between turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiState {
    pub persona: Persona,
    pub last_scan: Option<ScanResult>,
    pub turns_since_attack: u32,
}

impl AiState {
    pub fn new(persona: Persona) -> Self {
        AiState { persona, last_scan: None, turns_since_attack: 0 }
    }
}

/// Turns between Aggressor attacks regardless of odds.
const AGGRESSOR_TEMPO: u32 = 4;
/// Turns between Trickster raids.
const RAID_TEMPO: u32 = 2;
/// Structures an Economist wants of each kind before building ships.
const ECONOMIST_STRUCTURES: u32 = 3;

/// Chooses `side`'s commands for the open turn. Does not include `EndTurn`.
pub fn decide(state: &GameState, side: Side, ai: &AiState, config: &GameConfig) -> AiDecision {
    let me = state.side(side);
    let mut plan = Plan { me, config, budget: Budget::for_side(me, config), commands: Vec::new() };
    let threat = threat_estimate(ai.last_scan.as_ref(), config);

    let persona = match (ai.persona, state.game_phase) {
        (Persona::Hybrid, GamePhase::Early | GamePhase::Mid) => Persona::Economist,
        (Persona::Hybrid, _) => Persona::Aggressor,
        (p, _) => p,
    };

    if needs_scan(ai.last_scan.as_ref(), state.turn) {
        let tier = if persona == Persona::Economist { ScanTier::Advanced } else { ScanTier::Basic };
        plan.scan(tier);
    }

    match persona {
        Persona::Aggressor | Persona::Hybrid => aggressor(&mut plan, &threat, ai),
        Persona::Economist => economist(&mut plan, &threat),
        Persona::Trickster => trickster(&mut plan, &threat, ai),
    }

    tracing::debug!(%side, persona = persona.name(), commands = plan.commands.len(), "ai decided");
    AiDecision { commands: plan.commands }
}

struct Plan<'a> {
    me: &'a PlayerState,
    config: &'a GameConfig,
    budget: Budget,
    commands: Vec<Command>,
}

impl Plan<'_> {
    fn scan(&mut self, tier: ScanTier) {
        if self.budget.try_spend(self.config.scan_spec(tier).cost) {
            self.commands.push(Command::Scan { tier });
        }
    }

    fn build(&mut self, target: BuildTarget, share: f64) {
        if let Some(cmd) = self.budget.build_share(target, share, self.config) {
            self.commands.push(cmd);
        }
    }

    fn attack(&mut self, fleet: FleetComposition) {
        if !fleet.is_empty() {
            self.commands.push(Command::Attack { fleet });
        }
    }
}

fn aggressor(plan: &mut Plan<'_>, threat: &FleetComposition, ai: &AiState) {
    plan.build(BuildTarget::Unit(UnitType::Cruiser), 0.5);
    plan.build(BuildTarget::Unit(UnitType::Frigate), 1.0);

    let home = plan.me.fleet.home;
    let strike = detachment(&home, 0.8);
    if projected_ratio(&strike, threat) > 1.0 || ai.turns_since_attack >= AGGRESSOR_TEMPO {
        plan.attack(strike);
    }
}

fn economist(plan: &mut Plan<'_>, threat: &FleetComposition) {
    let economy = &plan.me.economy;
    let queued = |kind: StructureType| {
        economy
            .queue
            .iter()
            .filter(|o| o.target == BuildTarget::Structure(kind))
            .map(|o| o.quantity)
            .sum::<u32>()
    };
    let mines = economy.mines + queued(StructureType::Mine);
    let reactors = economy.reactors + queued(StructureType::Reactor);
    if mines < ECONOMIST_STRUCTURES {
        if let Some(cmd) = plan.budget.try_build(BuildTarget::Structure(StructureType::Mine), 1, plan.config) {
            plan.commands.push(cmd);
        }
    }
    if reactors < ECONOMIST_STRUCTURES {
        if let Some(cmd) = plan.budget.try_build(BuildTarget::Structure(StructureType::Reactor), 1, plan.config) {
            plan.commands.push(cmd);
        }
    }
    if mines >= ECONOMIST_STRUCTURES && reactors >= ECONOMIST_STRUCTURES {
        plan.build(BuildTarget::Unit(UnitType::Battleship), 1.0);
        let gap = weakest_type(&planned_fleet(plan.me), plan.config);
        plan.build(BuildTarget::Unit(gap), 0.5);
    }

    let home = plan.me.fleet.home;
    let strike = detachment(&home, 0.7);
    let config = plan.config;
    if config.fleet_value(&strike) >= 2 * config.fleet_value(threat).max(1) {
        plan.attack(strike);
    }
}

fn trickster(plan: &mut Plan<'_>, threat: &FleetComposition, ai: &AiState) {
    plan.build(BuildTarget::Unit(counter_composition(threat)), 0.7);
    plan.build(BuildTarget::Unit(UnitType::Frigate), 0.5);

    let frigates = plan.me.fleet.home.frigates;
    if ai.turns_since_attack >= RAID_TEMPO {
        let raid = (frigates / 3).min(5);
        plan.attack(FleetComposition::new(raid, 0, 0));
    }
}

/// Decides and submits `side`'s commands for the open turn, then updates
/// the AI's memory. Returns the number of accepted commands.
pub fn take_turn(game: &mut Game, side: Side, ai: &mut AiState) -> usize {
    let decision = decide(game.state(), side, ai, game.config());
    let mut accepted = 0;
    let mut attacked = false;
    for command in decision.commands {
        match game.submit(side, command) {
            Ok(Ack::Scanned(scan)) => {
                ai.last_scan = Some(scan);
                accepted += 1;
            }
            Ok(_) => {
                attacked |= matches!(command, Command::Attack { .. });
                accepted += 1;
            }
            Err(e) => tracing::warn!(%side, ?command, error = %e, "ai command rejected"),
        }
    }
    ai.turns_since_attack = if attacked { 0 } else { ai.turns_since_attack + 1 };
    accepted
}
