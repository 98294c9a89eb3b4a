//! Game session.
//!
//! Owns the committed game state, the configuration, the random source and
//! both sides' pending commands. Commands are validated as they arrive
//! against a projected view (committed state minus what earlier commands
//! this turn reserved) and take effect together when the turn is resolved.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::CommandError;
use crate::intel::{perform_scan, ScanResult};
use crate::model::{
    Amount, BuildTarget, CombatEvent, Command, FleetComposition, GamePhase, GameState, Side, VictoryType,
};
use crate::resolve::economy::{project_income, validate_build_order};
use crate::resolve::{resolve_turn, PendingBuild, PendingOrders, PendingScan};

/// Outcome of one `end_turn`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    /// False when resolution hit an internal error and nothing was applied.
    pub success: bool,
    pub errors: Vec<String>,
    pub combat_events: Vec<CombatEvent>,
    pub game_ended: bool,
    pub winner: Option<Side>,
    pub victory_type: Option<VictoryType>,
}

/// Acknowledgement of an accepted command.
#[derive(Debug, Clone, PartialEq)]
pub enum Ack {
    /// Accepted; takes effect when the turn resolves.
    Queued,
    /// The scan was taken; its cost is reserved for this turn.
    Scanned(ScanResult),
    /// The turn was resolved.
    Resolved(TurnResult),
}

/// A two-sided game in progress.
pub struct Game {
    state: GameState,
    config: GameConfig,
    rng: SmallRng,
    pending: [PendingOrders; 2],
}

impl Game {
    /// Starts a new game with an entropy-seeded random source.
    pub fn new(config: GameConfig) -> Self {
        Self::build(GameState::new(&config), config, SmallRng::from_entropy())
    }

    /// Starts a new game with a fixed seed. Identical seeds and commands
    /// replay identically.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::build(GameState::new(&config), config, SmallRng::seed_from_u64(seed))
    }

    /// Resumes from an existing state.
    pub fn from_state(state: GameState, config: GameConfig, seed: u64) -> Self {
        Self::build(state, config, SmallRng::seed_from_u64(seed))
    }

    fn build(state: GameState, config: GameConfig, rng: SmallRng) -> Self {
        Game { state, config, rng, pending: Default::default() }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn turn(&self) -> u32 {
        self.state.turn
    }

    pub fn game_phase(&self) -> GamePhase {
        self.state.game_phase
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over
    }

    pub fn winner(&self) -> Option<Side> {
        self.state.winner
    }

    pub fn victory_type(&self) -> Option<VictoryType> {
        self.state.victory_type
    }

    pub fn combat_log(&self) -> &[CombatEvent] {
        &self.state.combat_log
    }

    /// Commands `side` has had accepted this turn.
    pub fn pending(&self, side: Side) -> &PendingOrders {
        &self.pending[slot(side)]
    }

    /// Stockpile left after this turn's reservations.
    pub fn projected_resources(&self, side: Side) -> Amount {
        self.state.side(side).resources.stock() - self.pending(side).reserved()
    }

    /// Net income with this turn's accepted builds already draining.
    pub fn projected_income(&self, side: Side) -> Amount {
        project_income(self.state.side(side), &self.config) - self.pending(side).reserved_drain()
    }

    /// Home ships not yet committed to an attack this turn.
    pub fn available_fleet(&self, side: Side) -> FleetComposition {
        self.state.side(side).fleet.home.saturating_sub(&self.pending(side).committed_fleet())
    }

    /// Validates a command and, if it is accepted, reserves what it needs.
    /// `EndTurn` from either side resolves the turn.
    pub fn submit(&mut self, side: Side, command: Command) -> Result<Ack, CommandError> {
        if self.state.is_game_over {
            return Err(CommandError::GameOver);
        }
        match command {
            Command::Build { target, quantity } => self.submit_build(side, target, quantity),
            Command::Attack { fleet } => {
                if fleet.is_empty() {
                    return Err(CommandError::EmptyFleet);
                }
                let available = self.available_fleet(side);
                if !available.contains(&fleet) {
                    return Err(CommandError::InsufficientFleet { requested: fleet, available });
                }
                self.pending[slot(side)].attacks.push(fleet);
                tracing::debug!(%side, %fleet, "attack accepted");
                Ok(Ack::Queued)
            }
            Command::Scan { tier } => {
                let cost = self.config.scan_spec(tier).cost;
                let available = self.projected_resources(side);
                if !available.covers(&cost) {
                    return Err(CommandError::InsufficientResources { needed: cost, available });
                }
                let target = self.state.side(side.opponent());
                let result = perform_scan(tier, target, self.state.turn, &self.config, &mut self.rng);
                self.pending[slot(side)].scans.push(PendingScan { result: result.clone(), cost });
                Ok(Ack::Scanned(result))
            }
            Command::Cancel { index } => {
                let len = self.state.side(side).economy.queue.len();
                if index >= len {
                    return Err(CommandError::InvalidOrderIndex { index, len });
                }
                let cancels = &mut self.pending[slot(side)].cancels;
                if cancels.contains(&index) {
                    return Err(CommandError::DuplicateCancel(index));
                }
                cancels.push(index);
                Ok(Ack::Queued)
            }
            Command::EndTurn => Ok(Ack::Resolved(self.end_turn())),
        }
    }

    fn submit_build(&mut self, side: Side, target: BuildTarget, quantity: u32) -> Result<Ack, CommandError> {
        let order = validate_build_order(
            target,
            quantity,
            self.projected_resources(side),
            self.projected_income(side),
            &self.config,
        )?;
        let cost = self.config.build_cost(target).scale(quantity as i64);
        self.pending[slot(side)].builds.push(PendingBuild { order, cost });
        tracing::debug!(%side, target = target.name(), quantity, "build accepted");
        Ok(Ack::Queued)
    }

    /// Resolves the turn for both sides.
    ///
    /// Resolution runs on a copy of the state that replaces the committed
    /// state only on success. Pending commands are consumed either way.
    pub fn end_turn(&mut self) -> TurnResult {
        if self.state.is_game_over {
            return TurnResult {
                success: false,
                errors: vec![CommandError::GameOver.to_string()],
                game_ended: true,
                winner: self.state.winner,
                victory_type: self.state.victory_type,
                ..TurnResult::default()
            };
        }

        let [player, ai] = std::mem::take(&mut self.pending);
        let mut next = self.state.clone();
        match resolve_turn(&mut next, &player, &ai, &self.config, &mut self.rng) {
            Ok(report) => {
                self.state = next;
                TurnResult {
                    success: true,
                    errors: Vec::new(),
                    combat_events: report.combat_events,
                    game_ended: self.state.is_game_over,
                    winner: self.state.winner,
                    victory_type: self.state.victory_type,
                }
            }
            Err(e) => {
                tracing::warn!(turn = self.state.turn, error = %e, "turn resolution failed; state unchanged");
                TurnResult {
                    success: false,
                    errors: vec![e.to_string()],
                    ..TurnResult::default()
                }
            }
        }
    }
}

fn slot(side: Side) -> usize {
    match side {
        Side::Player => 0,
        Side::Ai => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BuildOrder, ScanTier, StructureType, UnitType};

    fn game() -> Game {
        Game::with_seed(GameConfig::default(), 7)
    }

    fn build(unit: UnitType, quantity: u32) -> Command {
        Command::Build { target: BuildTarget::Unit(unit), quantity }
    }

    #[test]
    fn new_game_starts_on_turn_one() {
        let g = game();
        assert_eq!(g.turn(), 1);
        assert_eq!(g.game_phase(), GamePhase::Early);
        assert!(!g.is_game_over());
        assert!(g.winner().is_none());
        assert!(g.combat_log().is_empty());
    }

    #[test]
    fn accepted_commands_do_not_touch_committed_state() {
        let mut g = game();
        let before = g.state().clone();
        g.submit(Side::Player, build(UnitType::Cruiser, 2)).unwrap();
        g.submit(Side::Player, Command::Attack { fleet: FleetComposition::new(3, 0, 0) }).unwrap();
        assert_eq!(g.state(), &before);
        assert_eq!(g.projected_resources(Side::Player), Amount::new(760, 480));
        assert_eq!(g.available_fleet(Side::Player), FleetComposition::new(7, 5, 2));
    }

    #[test]
    fn reservations_limit_later_commands() {
        let mut g = game();
        g.submit(Side::Player, build(UnitType::Battleship, 3)).unwrap();
        let err = g.submit(Side::Player, build(UnitType::Cruiser, 1)).unwrap_err();
        assert!(matches!(err, CommandError::InsufficientResources { .. }));

        g.submit(Side::Ai, Command::Attack { fleet: FleetComposition::new(10, 0, 0) }).unwrap();
        let err = g.submit(Side::Ai, Command::Attack { fleet: FleetComposition::new(1, 0, 0) }).unwrap_err();
        assert_eq!(
            err,
            CommandError::InsufficientFleet {
                requested: FleetComposition::new(1, 0, 0),
                available: FleetComposition::new(0, 5, 2),
            }
        );
    }

    #[test]
    fn rejected_commands_leave_no_trace() {
        let mut g = game();
        assert_eq!(g.submit(Side::Player, build(UnitType::Frigate, 0)), Err(CommandError::ZeroQuantity));
        assert_eq!(
            g.submit(Side::Player, Command::Attack { fleet: FleetComposition::EMPTY }),
            Err(CommandError::EmptyFleet)
        );
        assert_eq!(
            g.submit(Side::Player, Command::Cancel { index: 0 }),
            Err(CommandError::InvalidOrderIndex { index: 0, len: 0 })
        );
        assert!(g.pending(Side::Player).is_empty());
    }

    #[test]
    fn duplicate_cancel_is_rejected() {
        let mut g = game();
        g.submit(Side::Player, build(UnitType::Cruiser, 1)).unwrap();
        g.end_turn();
        g.submit(Side::Player, Command::Cancel { index: 0 }).unwrap();
        assert_eq!(g.submit(Side::Player, Command::Cancel { index: 0 }), Err(CommandError::DuplicateCancel(0)));
        g.end_turn();
        assert!(g.state().player.economy.queue.is_empty());
    }

    #[test]
    fn scan_returns_result_and_records_at_commit() {
        let mut g = game();
        let ack = g.submit(Side::Player, Command::Scan { tier: ScanTier::Deep }).unwrap();
        let Ack::Scanned(scan) = ack else { panic!("expected scan result") };
        assert_eq!(scan.observed_fleet, g.state().ai.fleet.home);
        assert!(g.state().player.intelligence.scans.is_empty());
        g.end_turn();
        assert_eq!(g.state().player.intelligence.latest(), Some(&scan));
        // 600 - 200 scan + 62 income
        assert_eq!(g.state().player.resources.energy, 462);
    }

    #[test]
    fn end_turn_via_submit_resolves() {
        let mut g = game();
        let ack = g.submit(Side::Player, Command::EndTurn).unwrap();
        let Ack::Resolved(result) = ack else { panic!("expected resolution") };
        assert!(result.success);
        assert_eq!(g.turn(), 2);
    }

    #[test]
    fn stalled_economy_still_completes_queued_order() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        state.player.economy.queue.push(BuildOrder {
            target: BuildTarget::Unit(UnitType::Frigate),
            quantity: 1,
            turns_remaining: 1,
            drain_per_turn: Amount::new(620, 0),
        });
        let mut g = Game::from_state(state, config, 1);
        // 150 structure income - 620 drain - 30 upkeep
        assert_eq!(g.projected_income(Side::Player).metal, -500);
        assert!(matches!(
            g.submit(Side::Player, build(UnitType::Frigate, 1)),
            Err(CommandError::EconomyStalled { .. })
        ));
        assert!(matches!(
            g.submit(
                Side::Player,
                Command::Build { target: BuildTarget::Structure(StructureType::Mine), quantity: 1 }
            ),
            Err(CommandError::EconomyStalled { .. })
        ));

        let result = g.end_turn();
        assert!(result.success);
        assert_eq!(g.state().player.fleet.home.frigates, 11);
        assert!(g.state().player.economy.queue.is_empty());
        // Upkeep now includes the delivered frigate.
        assert_eq!(g.state().player.resources.metal, 1000 - 501);
    }

    #[test]
    fn failed_resolution_leaves_state_unchanged() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        let mut rogue = crate::model::FleetMovement::launch(1, Side::Ai, FleetComposition::new(1, 0, 0), 1, 1, 3);
        rogue.target = Side::Ai;
        state.ai.fleet.missions.push(rogue);
        let mut g = Game::from_state(state, config, 3);
        g.submit(Side::Player, build(UnitType::Frigate, 1)).unwrap();
        let before = g.state().clone();

        let result = g.end_turn();
        assert!(!result.success);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("targets its own owner"));
        assert_eq!(g.state(), &before);
        assert!(g.pending(Side::Player).is_empty());
    }

    #[test]
    fn mission_turn_overflow_fails_the_turn() {
        let mut config = GameConfig::default();
        config.missions.return_offset = u32::MAX;
        let mut g = Game::from_state(GameState::new(&config), config, 3);
        g.submit(Side::Player, Command::Attack { fleet: FleetComposition::new(2, 0, 0) }).unwrap();
        let before = g.state().clone();

        let result = g.end_turn();
        assert!(!result.success);
        assert!(result.errors[0].contains("last representable turn"));
        assert_eq!(g.state(), &before);
        assert!(g.pending(Side::Player).is_empty());
    }

    #[test]
    fn finished_game_rejects_commands() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        state.ai.fleet.home = FleetComposition::EMPTY;
        let mut g = Game::from_state(state, config, 5);
        let result = g.end_turn();
        assert!(result.game_ended);
        assert_eq!(result.winner, Some(Side::Player));
        assert_eq!(result.victory_type, Some(VictoryType::Military));
        assert_eq!(g.submit(Side::Player, build(UnitType::Frigate, 1)), Err(CommandError::GameOver));
        let again = g.end_turn();
        assert!(!again.success);
    }

    #[test]
    fn same_seed_replays_identically() {
        let play = || {
            let mut g = game();
            g.submit(Side::Player, Command::Attack { fleet: FleetComposition::new(5, 5, 0) }).unwrap();
            g.submit(Side::Ai, Command::Scan { tier: ScanTier::Basic }).unwrap();
            for _ in 0..4 {
                g.end_turn();
            }
            g.state().clone()
        };
        assert_eq!(play(), play());
    }
}
