//! Construction queue processing.
//!
//! Every order in the queue pays its drain and counts down once per turn.
//! Orders reaching zero are removed and their items delivered: ships to the
//! home garrison, structures to the structure counters.

use crate::error::EngineError;
use crate::model::{Amount, BuildOrder, BuildTarget, PlayerState, StructureType};

/// What happened to a queue during one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstructionReport {
    /// Drain of every order that was active this turn, including the ones
    /// that completed.
    pub drain: Amount,
    /// Orders delivered this turn.
    pub completed: Vec<BuildOrder>,
}

/// Appends a validated order to the queue.
pub fn add_build_order(player: &mut PlayerState, order: BuildOrder) {
    player.economy.queue.push(order);
}

/// Removes the order at `index` without refund.
pub fn cancel_build_order(player: &mut PlayerState, index: usize) -> Result<BuildOrder, EngineError> {
    if index >= player.economy.queue.len() {
        return Err(EngineError::MissingOrder { side: player.side, index });
    }
    Ok(player.economy.queue.remove(index))
}

/// Advances every order by one turn and delivers finished ones.
pub fn process_construction(player: &mut PlayerState) -> Result<ConstructionReport, EngineError> {
    let mut report = ConstructionReport::default();
    let mut remaining = Vec::with_capacity(player.economy.queue.len());

    for mut order in player.economy.queue.drain(..) {
        report.drain += order.drain_per_turn;
        order.turns_remaining = order.turns_remaining.saturating_sub(1);
        if order.turns_remaining == 0 {
            report.completed.push(order);
        } else {
            remaining.push(order);
        }
    }
    player.economy.queue = remaining;

    for order in &report.completed {
        deliver(player, order)?;
    }
    Ok(report)
}

fn deliver(player: &mut PlayerState, order: &BuildOrder) -> Result<(), EngineError> {
    let side = player.side;
    let slot = match order.target {
        BuildTarget::Unit(unit_type) => player.fleet.home.count_mut(unit_type),
        BuildTarget::Structure(StructureType::Mine) => &mut player.economy.mines,
        BuildTarget::Structure(StructureType::Reactor) => &mut player.economy.reactors,
    };
    *slot = slot
        .checked_add(order.quantity)
        .ok_or(EngineError::CountOverflow { side, context: "delivering construction" })?;
    tracing::debug!(%side, target = order.target.name(), quantity = order.quantity, "construction complete");
    Ok(())
}
