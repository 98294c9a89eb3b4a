//! Turn resolution pipeline.
//!
//! Runs the steps of one turn for both sides, one step at a time for both
//! sides before moving to the next step, so neither side moves first:
//!
//! 1. commit accepted commands (cancels, builds, scans, launches)
//! 2. advance construction
//! 3. apply income
//! 4. advance missions and fight arriving ones
//! 5. bring returning missions home
//! 6. check victory
//! 7. open the next turn
//!
//! The caller owns the state for the duration of the call. On error the
//! state may be partially updated, so callers resolve against a copy.

use rand::Rng;

use super::combat::resolve_combat;
use super::construction::{add_build_order, cancel_build_order, process_construction};
use super::economy::{calculate_income, track_collapse};
use super::mission::{advance_missions, apply_returns, launch_mission, record_survivors};
use super::phase::advance_turn;
use super::victory::{self, Verdict};
use crate::config::GameConfig;
use crate::error::EngineError;
use crate::intel::ScanResult;
use crate::model::{
    Amount, BuildOrder, CombatEvent, FleetComposition, GameState, PlayerState, Side, BOTH_SIDES,
};

/// A build accepted during the turn, with the cost it reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingBuild {
    pub order: BuildOrder,
    pub cost: Amount,
}

/// A scan taken during the turn, with the cost it reserved.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingScan {
    pub result: ScanResult,
    pub cost: Amount,
}

/// Commands one side has had accepted this turn, not yet applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingOrders {
    pub builds: Vec<PendingBuild>,
    pub attacks: Vec<FleetComposition>,
    pub scans: Vec<PendingScan>,
    pub cancels: Vec<usize>,
}

impl PendingOrders {
    /// Resources reserved by accepted builds and scans.
    pub fn reserved(&self) -> Amount {
        let builds: Amount = self.builds.iter().map(|b| b.cost).sum();
        let scans: Amount = self.scans.iter().map(|s| s.cost).sum();
        builds + scans
    }

    /// Per-turn drain the accepted builds will add.
    pub fn reserved_drain(&self) -> Amount {
        self.builds.iter().map(|b| b.order.drain_per_turn).sum()
    }

    /// Ships committed to accepted attacks.
    pub fn committed_fleet(&self) -> FleetComposition {
        self.attacks.iter().fold(FleetComposition::EMPTY, |acc, f| {
            FleetComposition::from_fn(|t| acc.count(t).saturating_add(f.count(t)))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty() && self.attacks.is_empty() && self.scans.is_empty() && self.cancels.is_empty()
    }
}

/// What happened during one resolved turn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnReport {
    /// The turn that was resolved.
    pub turn: u32,
    pub combat_events: Vec<CombatEvent>,
    pub verdict: Option<Verdict>,
}

/// Resolves the open turn. `player` and `ai` are the commands each side had
/// accepted during the turn.
pub fn resolve_turn(
    state: &mut GameState,
    player: &PendingOrders,
    ai: &PendingOrders,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Result<TurnReport, EngineError> {
    let turn = state.turn;
    let mut report = TurnReport { turn, ..TurnReport::default() };
    tracing::debug!(turn, "resolving turn");

    // 1. Commit accepted commands.
    let mut next_id = state.next_mission_id;
    for side in BOTH_SIDES {
        let pending = match side {
            Side::Player => player,
            Side::Ai => ai,
        };
        commit_orders(state.side_mut(side), pending, turn, &mut next_id, config)?;
    }
    state.next_mission_id = next_id;

    // 2. Construction.
    let mut drains = [Amount::ZERO; 2];
    for (i, side) in BOTH_SIDES.into_iter().enumerate() {
        drains[i] = process_construction(state.side_mut(side))?.drain;
    }

    // 3. Income.
    for (i, side) in BOTH_SIDES.into_iter().enumerate() {
        let p = state.side_mut(side);
        let net = calculate_income(p, drains[i], config);
        track_collapse(p);
        tracing::debug!(%side, metal = net.metal, energy = net.energy, "income applied");
    }

    // 4. Missions and combat.
    let mut arrivals = Vec::with_capacity(2);
    for side in BOTH_SIDES {
        arrivals.push((side, advance_missions(state.side_mut(side), turn)?));
    }
    for (side, ids) in arrivals {
        for id in ids {
            if let Some(event) = fight(state, side, id, turn, rng) {
                report.combat_events.push(event);
                state.combat_log.push(event);
            }
        }
    }

    // 5. Returns.
    for side in BOTH_SIDES {
        apply_returns(state.side_mut(side), turn)?;
    }

    // 6. Victory.
    if let Some(verdict) = victory::evaluate(state, config) {
        state.is_game_over = true;
        state.winner = verdict.winner;
        state.victory_type = Some(verdict.victory_type);
        report.verdict = Some(verdict);
        tracing::info!(
            turn,
            winner = verdict.winner.map_or("none", Side::name),
            victory = verdict.victory_type.name(),
            "game over"
        );
        return Ok(report);
    }

    // 7. Next turn.
    advance_turn(state, &config.phases);
    Ok(report)
}

/// Applies one side's accepted commands.
///
/// Cancels run first, highest index first, so every index refers to the
/// queue as it stood when the cancel was accepted.
fn commit_orders(
    player: &mut PlayerState,
    pending: &PendingOrders,
    turn: u32,
    next_id: &mut u32,
    config: &GameConfig,
) -> Result<(), EngineError> {
    let side = player.side;

    let mut cancels = pending.cancels.clone();
    cancels.sort_unstable_by(|a, b| b.cmp(a));
    cancels.dedup();
    for index in cancels {
        let order = cancel_build_order(player, index)?;
        tracing::debug!(%side, index, target = order.target.name(), "construction cancelled");
    }

    for build in &pending.builds {
        if !player.resources.try_spend(&build.cost) {
            return Err(EngineError::UnpaidCommitment { side, cost: build.cost });
        }
        add_build_order(player, build.order);
    }

    for scan in &pending.scans {
        if !player.resources.try_spend(&scan.cost) {
            return Err(EngineError::UnpaidCommitment { side, cost: scan.cost });
        }
        player.intelligence.record(scan.result.clone(), config.scan.history);
    }

    for fleet in &pending.attacks {
        launch_mission(player, *next_id, *fleet, turn, config)?;
        *next_id += 1;
    }
    Ok(())
}

/// Fights one arriving mission against the target's home garrison.
fn fight(state: &mut GameState, side: Side, id: u32, turn: u32, rng: &mut impl Rng) -> Option<CombatEvent> {
    let mission = state.side(side).fleet.missions.iter().find(|m| m.id == id)?;
    let target = mission.target;
    let attacking_fleet = mission.composition;
    let defending_fleet = state.side(target).fleet.home;

    let result = resolve_combat(&attacking_fleet, &defending_fleet, None, rng);
    state.side_mut(target).fleet.home = result.defender_survivors;
    let survived = record_survivors(state.side_mut(side), id, result.attacker_survivors);

    tracing::info!(
        turn,
        attacker = %side,
        attacking = %attacking_fleet,
        defending = %defending_fleet,
        outcome = result.outcome.name(),
        ratio = result.strength_ratio,
        mission_survived = survived,
        "battle"
    );

    Some(CombatEvent {
        turn,
        mission_id: id,
        attacker: side,
        defender: target,
        attacking_fleet,
        defending_fleet,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BuildTarget, UnitType, VictoryType};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn setup() -> (GameState, GameConfig, SmallRng) {
        let config = GameConfig::default();
        (GameState::new(&config), config, SmallRng::seed_from_u64(11))
    }

    fn attack(fleet: FleetComposition) -> PendingOrders {
        PendingOrders { attacks: vec![fleet], ..PendingOrders::default() }
    }

    #[test]
    fn empty_turn_applies_income_and_advances() {
        let (mut state, config, mut rng) = setup();
        let none = PendingOrders::default();
        let report = resolve_turn(&mut state, &none, &none, &config, &mut rng).unwrap();
        assert_eq!(report.turn, 1);
        assert!(report.combat_events.is_empty());
        assert_eq!(state.turn, 2);
        assert_eq!(state.player.resources.metal, 1120);
        assert_eq!(state.ai.resources.metal, 1120);
    }

    #[test]
    fn build_is_paid_queued_and_delivered() {
        let (mut state, config, mut rng) = setup();
        let order = crate::resolve::economy::validate_build_order(
            BuildTarget::Unit(UnitType::Frigate),
            2,
            state.player.resources.stock(),
            state.player.resources.income(),
            &config,
        )
        .unwrap();
        let pending = PendingOrders {
            builds: vec![PendingBuild { order, cost: Amount::new(100, 40) }],
            ..PendingOrders::default()
        };
        resolve_turn(&mut state, &pending, &PendingOrders::default(), &config, &mut rng).unwrap();
        // One-turn frigates land the same turn they were committed.
        assert_eq!(state.player.fleet.home.frigates, 12);
        assert!(state.player.economy.queue.is_empty());
        // Upkeep is charged on the garrison after delivery.
        let upkeep = crate::resolve::economy::fleet_upkeep(&state.player.fleet.home, &config);
        assert_eq!(state.player.resources.metal, 1000 - 100 + 150 - 4 - upkeep.metal);
    }

    #[test]
    fn mission_fights_then_returns() {
        let (mut state, config, mut rng) = setup();
        let none = PendingOrders::default();
        let sent = FleetComposition::new(10, 5, 2);

        resolve_turn(&mut state, &attack(sent), &none, &config, &mut rng).unwrap();
        assert_eq!(state.player.fleet.home, FleetComposition::EMPTY);
        assert_eq!(state.player.fleet.missions.len(), 1);

        let report = resolve_turn(&mut state, &none, &none, &config, &mut rng).unwrap();
        assert_eq!(report.combat_events.len(), 1);
        let event = report.combat_events[0];
        assert_eq!(event.turn, 2);
        assert_eq!(event.attacker, Side::Player);
        assert_eq!(state.ai.fleet.home, event.result.defender_survivors);
        assert_eq!(state.combat_log.len(), 1);

        resolve_turn(&mut state, &none, &none, &config, &mut rng).unwrap();
        assert_eq!(state.player.fleet.home, FleetComposition::EMPTY);
        resolve_turn(&mut state, &none, &none, &config, &mut rng).unwrap();
        assert_eq!(state.turn, 5);
        assert_eq!(state.player.fleet.home, event.result.attacker_survivors);
        assert!(state.player.fleet.missions.is_empty());
    }

    #[test]
    fn eliminated_side_ends_the_game() {
        let (mut state, config, mut rng) = setup();
        state.ai.fleet.home = FleetComposition::EMPTY;
        let none = PendingOrders::default();
        let report = resolve_turn(&mut state, &none, &none, &config, &mut rng).unwrap();
        let verdict = report.verdict.unwrap();
        assert_eq!(verdict.winner, Some(Side::Player));
        assert_eq!(verdict.victory_type, VictoryType::Military);
        assert!(state.is_game_over);
        assert_eq!(state.winner, Some(Side::Player));
        // The decided turn stays current.
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn mutual_elimination_goes_to_the_defender_of_the_last_battle() {
        let (mut state, config, mut rng) = setup();
        state.player.fleet.home = FleetComposition::EMPTY;
        state.ai.fleet.home = FleetComposition::EMPTY;
        // A hollow raid arriving this turn: it fights, loses everything, and
        // leaves both sides with no ships anywhere.
        state
            .ai
            .fleet
            .missions
            .push(crate::model::FleetMovement::launch(1, Side::Ai, FleetComposition::EMPTY, 0, 1, 3));
        state.next_mission_id = 2;
        let none = PendingOrders::default();

        let report = resolve_turn(&mut state, &none, &none, &config, &mut rng).unwrap();
        assert_eq!(report.combat_events.len(), 1);
        let event = report.combat_events[0];
        assert_eq!((event.turn, event.attacker, event.defender), (1, Side::Ai, Side::Player));
        assert!(state.ai.fleet.missions.is_empty());

        // Without the battle the tie would go to the AI.
        let verdict = report.verdict.unwrap();
        assert_eq!(verdict.winner, Some(Side::Player));
        assert_eq!(verdict.victory_type, VictoryType::Military);
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn unpaid_commitment_is_an_error() {
        let (mut state, config, mut rng) = setup();
        let order = BuildOrder {
            target: BuildTarget::Unit(UnitType::Battleship),
            quantity: 100,
            turns_remaining: 3,
            drain_per_turn: Amount::ZERO,
        };
        let pending = PendingOrders {
            builds: vec![PendingBuild { order, cost: Amount::new(30_000, 15_000) }],
            ..PendingOrders::default()
        };
        let err = resolve_turn(&mut state, &pending, &PendingOrders::default(), &config, &mut rng).unwrap_err();
        assert!(matches!(err, EngineError::UnpaidCommitment { side: Side::Player, .. }));
    }

    #[test]
    fn cancels_apply_highest_index_first() {
        let (mut state, config, mut rng) = setup();
        for target in [UnitType::Battleship, UnitType::Cruiser, UnitType::Battleship] {
            state.player.economy.queue.push(BuildOrder {
                target: BuildTarget::Unit(target),
                quantity: 1,
                turns_remaining: 5,
                drain_per_turn: Amount::ZERO,
            });
        }
        let pending = PendingOrders { cancels: vec![0, 2], ..PendingOrders::default() };
        resolve_turn(&mut state, &pending, &PendingOrders::default(), &config, &mut rng).unwrap();
        assert_eq!(state.player.economy.queue.len(), 1);
        assert_eq!(state.player.economy.queue[0].target, BuildTarget::Unit(UnitType::Cruiser));
    }

    #[test]
    fn pending_orders_totals() {
        let mut pending = PendingOrders::default();
        assert!(pending.is_empty());
        pending.attacks.push(FleetComposition::new(1, 2, 0));
        pending.attacks.push(FleetComposition::new(3, 0, 1));
        assert_eq!(pending.committed_fleet(), FleetComposition::new(4, 2, 1));
        pending.scans.push(PendingScan {
            result: ScanResult::blank(1, crate::model::ScanTier::Basic),
            cost: Amount::new(0, 30),
        });
        assert_eq!(pending.reserved(), Amount::new(0, 30));
        assert!(!pending.is_empty());
    }
}
