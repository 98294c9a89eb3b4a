//! Turn and phase sequencing.
//!
//! The game phase is a pure function of the turn number; advancing a state
//! moves it to the next turn and recomputes the phase.

use crate::config::PhaseConfig;
use crate::model::{GamePhase, GameState};

/// Phase for a given turn.
///
/// Default thresholds: turns 1-10 Early, 11-25 Mid, 26-40 Late, 41+ Endgame.
pub fn game_phase(turn: u32, phases: &PhaseConfig) -> GamePhase {
    if turn >= phases.endgame_turn {
        GamePhase::Endgame
    } else if turn >= phases.late_turn {
        GamePhase::Late
    } else if turn >= phases.mid_turn {
        GamePhase::Mid
    } else {
        GamePhase::Early
    }
}

/// Opens the next turn.
pub fn advance_turn(state: &mut GameState, phases: &PhaseConfig) {
    state.turn += 1;
    state.game_phase = game_phase(state.turn, phases);
}
