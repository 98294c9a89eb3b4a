//! Battle resolution.
//!
//! Fleet strength is the sum, over a side's unit types, of
//! `count * sum(opposing count * effectiveness) * random factor`. The strength
//! ratio picks an outcome band, and each side then loses a random share of
//! every unit type drawn from the band for its outcome and role.
//!
//! `resolve_combat` draws its casualty rates through `calculate_casualties`.
//! `resolve_combat_with_rolls` runs the same battle from fixed `CombatRolls`
//! and is a pure function of its inputs.

use rand::Rng;

use crate::model::{
    BattleOutcome, CombatResult, CombatRole, FleetComposition, UnitType, ALL_UNIT_TYPES,
};

/// Effectiveness of a row type firing on a column type, in
/// `UnitType::index` order. Frigates beat cruisers, cruisers beat
/// battleships, battleships beat frigates.
pub const EFFECTIVENESS: [[f64; 3]; 3] = [
    // vs frigate, cruiser, battleship
    [1.0, 1.5, 0.7], // frigate
    [0.7, 1.0, 1.5], // cruiser
    [1.5, 0.7, 1.0], // battleship
];

/// Bounds of the per-type strength factor.
pub const FACTOR_RANGE: (f64, f64) = (0.8, 1.2);

/// A strength ratio at or above this is decisive for the attacker; at or
/// below its inverse, decisive for the defender.
pub const DECISIVE_RATIO: f64 = 2.0;

/// Casualty bands as (low, high) rates.
pub const CLOSE_BATTLE_BAND: (f64, f64) = (0.4, 0.6);
pub const DECISIVE_WINNER_BAND: (f64, f64) = (0.1, 0.3);
pub const DECISIVE_LOSER_BAND: (f64, f64) = (0.7, 0.9);

/// Effectiveness of `unit` against `target`.
pub fn effectiveness(unit: UnitType, target: UnitType) -> f64 {
    EFFECTIVENESS[unit.index()][target.index()]
}

/// The unit type that is strong against `unit_type`.
pub fn counter_of(unit_type: UnitType) -> UnitType {
    ALL_UNIT_TYPES
        .into_iter()
        .find(|&t| effectiveness(t, unit_type) > 1.0)
        .unwrap_or(unit_type)
}

/// Per-type strength factors for both sides of one battle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomFactors {
    pub attacker: [f64; 3],
    pub defender: [f64; 3],
}

impl RandomFactors {
    /// All factors at 1.0.
    pub const NEUTRAL: RandomFactors = RandomFactors { attacker: [1.0; 3], defender: [1.0; 3] };

    /// Fresh uniform draws in `FACTOR_RANGE`, one per unit type per side.
    pub fn draw(rng: &mut impl Rng) -> Self {
        let mut f = || rng.gen_range(FACTOR_RANGE.0..=FACTOR_RANGE.1);
        RandomFactors {
            attacker: [f(), f(), f()],
            defender: [f(), f(), f()],
        }
    }
}

/// Every random input of a battle. Casualty rolls are positions in `[0, 1]`
/// within whichever casualty band the outcome selects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatRolls {
    pub factors: RandomFactors,
    pub attacker_casualty_roll: f64,
    pub defender_casualty_roll: f64,
}

impl CombatRolls {
    /// Neutral factors with both casualty rolls pinned to `roll`.
    pub fn pinned(roll: f64) -> Self {
        CombatRolls {
            factors: RandomFactors::NEUTRAL,
            attacker_casualty_roll: roll,
            defender_casualty_roll: roll,
        }
    }
}

/// Strength of `side` fighting `opposing`.
pub fn calculate_fleet_strength(
    side: &FleetComposition,
    opposing: &FleetComposition,
    factors: &[f64; 3],
) -> f64 {
    ALL_UNIT_TYPES
        .iter()
        .map(|&t| {
            let count = side.count(t) as f64;
            if count == 0.0 {
                return 0.0;
            }
            let versus: f64 = ALL_UNIT_TYPES
                .iter()
                .map(|&o| opposing.count(o) as f64 * effectiveness(t, o))
                .sum();
            count * versus * factors[t.index()]
        })
        .sum()
}

/// Classifies a battle by its strength ratio. A side with zero strength
/// cannot win, and the attacker check comes first.
pub fn determine_battle_outcome(attacker_strength: f64, defender_strength: f64) -> BattleOutcome {
    if attacker_strength <= 0.0 {
        return BattleOutcome::DecisiveDefender;
    }
    if defender_strength <= 0.0 {
        return BattleOutcome::DecisiveAttacker;
    }
    let ratio = attacker_strength / defender_strength;
    if ratio >= DECISIVE_RATIO {
        BattleOutcome::DecisiveAttacker
    } else if ratio <= 1.0 / DECISIVE_RATIO {
        BattleOutcome::DecisiveDefender
    } else {
        BattleOutcome::CloseBattle
    }
}

/// The casualty band for a side given the outcome.
pub fn casualty_band(outcome: BattleOutcome, role: CombatRole) -> (f64, f64) {
    match (outcome, role) {
        (BattleOutcome::CloseBattle, _) => CLOSE_BATTLE_BAND,
        (BattleOutcome::DecisiveAttacker, CombatRole::Attacker)
        | (BattleOutcome::DecisiveDefender, CombatRole::Defender) => DECISIVE_WINNER_BAND,
        (BattleOutcome::DecisiveAttacker, CombatRole::Defender)
        | (BattleOutcome::DecisiveDefender, CombatRole::Attacker) => DECISIVE_LOSER_BAND,
    }
}

/// Maps a roll in `[0, 1]` onto a band.
pub fn rate_in_band(band: (f64, f64), roll: f64) -> f64 {
    band.0 + (band.1 - band.0) * roll.clamp(0.0, 1.0)
}

/// Casualties from applying `rate` to every unit type: `floor(count * rate)`.
pub fn apply_casualty_rate(fleet: &FleetComposition, rate: f64) -> FleetComposition {
    let rate = rate.clamp(0.0, 1.0);
    FleetComposition::from_fn(|t| {
        let count = fleet.count(t);
        ((count as f64 * rate).floor() as u32).min(count)
    })
}

/// Casualties for `fleet` at position `roll` in the band for `outcome` and
/// `role`.
pub fn casualties_at_roll(
    fleet: &FleetComposition,
    outcome: BattleOutcome,
    role: CombatRole,
    roll: f64,
) -> FleetComposition {
    apply_casualty_rate(fleet, rate_in_band(casualty_band(outcome, role), roll))
}

/// Draws a casualty rate from the band for `outcome` and `role` and applies it.
pub fn calculate_casualties(
    fleet: &FleetComposition,
    outcome: BattleOutcome,
    role: CombatRole,
    rng: &mut impl Rng,
) -> FleetComposition {
    casualties_at_roll(fleet, outcome, role, rng.gen_range(0.0..=1.0))
}

/// Resolves a battle, drawing whatever randomness was not supplied.
/// Factors are drawn first, then attacker and defender casualties.
pub fn resolve_combat(
    attacker: &FleetComposition,
    defender: &FleetComposition,
    factors: Option<RandomFactors>,
    rng: &mut impl Rng,
) -> CombatResult {
    let factors = factors.unwrap_or_else(|| RandomFactors::draw(rng));
    fight(attacker, defender, &factors, |fleet, outcome, role| calculate_casualties(fleet, outcome, role, &mut *rng))
}

/// Resolves a battle from fixed rolls.
pub fn resolve_combat_with_rolls(
    attacker: &FleetComposition,
    defender: &FleetComposition,
    rolls: &CombatRolls,
) -> CombatResult {
    fight(attacker, defender, &rolls.factors, |fleet, outcome, role| {
        let roll = match role {
            CombatRole::Attacker => rolls.attacker_casualty_roll,
            CombatRole::Defender => rolls.defender_casualty_roll,
        };
        casualties_at_roll(fleet, outcome, role, roll)
    })
}

/// An empty defender facing any ships is a decisive attacker win with no
/// defender losses. `casualties` is called for the attacker, then the
/// defender.
fn fight(
    attacker: &FleetComposition,
    defender: &FleetComposition,
    factors: &RandomFactors,
    mut casualties: impl FnMut(&FleetComposition, BattleOutcome, CombatRole) -> FleetComposition,
) -> CombatResult {
    let attacker_strength = calculate_fleet_strength(attacker, defender, &factors.attacker);
    let defender_strength = calculate_fleet_strength(defender, attacker, &factors.defender);

    let outcome = if defender.is_empty() && !attacker.is_empty() {
        BattleOutcome::DecisiveAttacker
    } else {
        determine_battle_outcome(attacker_strength, defender_strength)
    };

    let attacker_casualties = casualties(attacker, outcome, CombatRole::Attacker);
    let defender_casualties = casualties(defender, outcome, CombatRole::Defender);

    let strength_ratio = if defender_strength > 0.0 {
        attacker_strength / defender_strength
    } else {
        f64::INFINITY
    };

    CombatResult {
        outcome,
        attacker_survivors: attacker.saturating_sub(&attacker_casualties),
        defender_survivors: defender.saturating_sub(&defender_casualties),
        attacker_casualties,
        defender_casualties,
        attacker_strength,
        defender_strength,
        strength_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn effectiveness_table_is_reciprocal() {
        for a in ALL_UNIT_TYPES {
            for b in ALL_UNIT_TYPES {
                let ab = effectiveness(a, b);
                let ba = effectiveness(b, a);
                if a == b {
                    assert_eq!(ab, 1.0);
                } else {
                    assert!(
                        (ab == 1.5 && ba == 0.7) || (ab == 0.7 && ba == 1.5),
                        "{:?} vs {:?}: {} / {}",
                        a,
                        b,
                        ab,
                        ba
                    );
                }
            }
        }
    }

    #[test]
    fn counters_form_a_cycle() {
        assert_eq!(counter_of(UnitType::Cruiser), UnitType::Frigate);
        assert_eq!(counter_of(UnitType::Battleship), UnitType::Cruiser);
        assert_eq!(counter_of(UnitType::Frigate), UnitType::Battleship);
    }

    #[test]
    fn frigates_beat_cruisers_decisively() {
        let attacker = FleetComposition::new(100, 0, 0);
        let defender = FleetComposition::new(0, 100, 0);
        let a = calculate_fleet_strength(&attacker, &defender, &[1.0; 3]);
        let d = calculate_fleet_strength(&defender, &attacker, &[1.0; 3]);
        assert!((a - 15_000.0).abs() < 1e-9);
        assert!((d - 7_000.0).abs() < 1e-9);
        assert_eq!(determine_battle_outcome(a, d), BattleOutcome::DecisiveAttacker);

        let result = resolve_combat_with_rolls(&attacker, &defender, &CombatRolls::pinned(0.5));
        assert_eq!(result.outcome, BattleOutcome::DecisiveAttacker);
        assert!((result.strength_ratio - 15.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn mirror_fleets_fight_close_battle() {
        let fleet = FleetComposition::new(50, 50, 50);
        for roll in [0.0, 1.0] {
            let result = resolve_combat_with_rolls(&fleet, &fleet, &CombatRolls::pinned(roll));
            assert_eq!(result.outcome, BattleOutcome::CloseBattle);
            assert!((result.strength_ratio - 1.0).abs() < 1e-9);
            for t in ALL_UNIT_TYPES {
                for casualties in [result.attacker_casualties, result.defender_casualties] {
                    let c = casualties.count(t);
                    assert!((20..=30).contains(&c), "{:?} casualties {}", t, c);
                }
            }
        }
        let low = resolve_combat_with_rolls(&fleet, &fleet, &CombatRolls::pinned(0.0));
        let high = resolve_combat_with_rolls(&fleet, &fleet, &CombatRolls::pinned(1.0));
        assert_eq!(low.attacker_casualties, FleetComposition::new(20, 20, 20));
        assert_eq!(high.defender_casualties, FleetComposition::new(30, 30, 30));
    }

    #[test]
    fn empty_defender_loses_nothing() {
        let attacker = FleetComposition::new(10, 0, 0);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let result = resolve_combat(&attacker, &FleetComposition::EMPTY, None, &mut rng);
            assert_eq!(result.outcome, BattleOutcome::DecisiveAttacker);
            assert_eq!(result.defender_casualties, FleetComposition::EMPTY);
            assert!(result.strength_ratio.is_infinite());
            assert!((1..=3).contains(&result.attacker_casualties.frigates));
        }
    }

    #[test]
    fn empty_attacker_cannot_win() {
        let result = resolve_combat_with_rolls(
            &FleetComposition::EMPTY,
            &FleetComposition::new(1, 0, 0),
            &CombatRolls::pinned(0.5),
        );
        assert_eq!(result.outcome, BattleOutcome::DecisiveDefender);
        assert_eq!(result.attacker_survivors, FleetComposition::EMPTY);
    }

    #[test]
    fn outcome_thresholds() {
        assert_eq!(determine_battle_outcome(0.0, 0.0), BattleOutcome::DecisiveDefender);
        assert_eq!(determine_battle_outcome(5.0, 0.0), BattleOutcome::DecisiveAttacker);
        assert_eq!(determine_battle_outcome(200.0, 100.0), BattleOutcome::DecisiveAttacker);
        assert_eq!(determine_battle_outcome(199.0, 100.0), BattleOutcome::CloseBattle);
        assert_eq!(determine_battle_outcome(50.0, 100.0), BattleOutcome::DecisiveDefender);
        assert_eq!(determine_battle_outcome(51.0, 100.0), BattleOutcome::CloseBattle);
    }

    #[test]
    fn casualty_bands_by_role() {
        assert_eq!(casualty_band(BattleOutcome::CloseBattle, CombatRole::Attacker), CLOSE_BATTLE_BAND);
        assert_eq!(casualty_band(BattleOutcome::DecisiveAttacker, CombatRole::Attacker), DECISIVE_WINNER_BAND);
        assert_eq!(casualty_band(BattleOutcome::DecisiveAttacker, CombatRole::Defender), DECISIVE_LOSER_BAND);
        assert_eq!(casualty_band(BattleOutcome::DecisiveDefender, CombatRole::Defender), DECISIVE_WINNER_BAND);
        assert_eq!(casualty_band(BattleOutcome::DecisiveDefender, CombatRole::Attacker), DECISIVE_LOSER_BAND);
    }

    #[test]
    fn random_casualties_stay_in_band() {
        let mut rng = SmallRng::seed_from_u64(42);
        let fleet = FleetComposition::new(100, 100, 100);
        for _ in 0..200 {
            let c = calculate_casualties(&fleet, BattleOutcome::DecisiveAttacker, CombatRole::Defender, &mut rng);
            for t in ALL_UNIT_TYPES {
                assert!((70..=90).contains(&c.count(t)));
            }
        }
    }

    #[test]
    fn resolve_combat_draws_through_calculate_casualties() {
        let attacker = FleetComposition::new(40, 10, 5);
        let defender = FleetComposition::new(5, 30, 8);
        let result = resolve_combat(&attacker, &defender, None, &mut SmallRng::seed_from_u64(21));

        let mut rng = SmallRng::seed_from_u64(21);
        let factors = RandomFactors::draw(&mut rng);
        let a = calculate_fleet_strength(&attacker, &defender, &factors.attacker);
        let d = calculate_fleet_strength(&defender, &attacker, &factors.defender);
        let outcome = determine_battle_outcome(a, d);
        assert_eq!(result.outcome, outcome);
        assert_eq!(
            result.attacker_casualties,
            calculate_casualties(&attacker, outcome, CombatRole::Attacker, &mut rng)
        );
        assert_eq!(
            result.defender_casualties,
            calculate_casualties(&defender, outcome, CombatRole::Defender, &mut rng)
        );
    }

    #[test]
    fn drawn_factors_are_bounded() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            let f = RandomFactors::draw(&mut rng);
            for x in f.attacker.iter().chain(f.defender.iter()) {
                assert!((FACTOR_RANGE.0..=FACTOR_RANGE.1).contains(x));
            }
        }
    }

    #[test]
    fn supplied_factors_are_used() {
        let attacker = FleetComposition::new(10, 10, 10);
        let factors = RandomFactors { attacker: [1.2; 3], defender: [0.8; 3] };
        let mut rng = SmallRng::seed_from_u64(3);
        let result = resolve_combat(&attacker, &attacker, Some(factors), &mut rng);
        assert!((result.strength_ratio - 1.5).abs() < 1e-9);
        assert_eq!(result.outcome, BattleOutcome::CloseBattle);
    }

    #[test]
    fn survivors_plus_casualties_equal_fleet() {
        let attacker = FleetComposition::new(7, 13, 1);
        let defender = FleetComposition::new(3, 0, 9);
        let mut rng = SmallRng::seed_from_u64(99);
        let r = resolve_combat(&attacker, &defender, None, &mut rng);
        assert_eq!(r.attacker_survivors.checked_add(&r.attacker_casualties), Some(attacker));
        assert_eq!(r.defender_survivors.checked_add(&r.defender_casualties), Some(defender));
    }
}
