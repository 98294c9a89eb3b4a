//! Resource amounts, costs and per-turn income.

use serde::{Deserialize, Serialize};

/// A metal/energy pair. Used for costs, reservations and per-turn flows,
/// so components may be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    pub metal: i64,
    pub energy: i64,
}

impl Amount {
    pub const ZERO: Amount = Amount { metal: 0, energy: 0 };

    pub const fn new(metal: i64, energy: i64) -> Self {
        Amount { metal, energy }
    }

    /// Multiplies both components by a scalar.
    pub fn scale(self, factor: i64) -> Amount {
        Amount::new(self.metal.saturating_mul(factor), self.energy.saturating_mul(factor))
    }

    /// True when both components are at least those of `other`.
    pub fn covers(&self, other: &Amount) -> bool {
        self.metal >= other.metal && self.energy >= other.energy
    }
}

impl std::ops::Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount::new(self.metal.saturating_add(rhs.metal), self.energy.saturating_add(rhs.energy))
    }
}

impl std::ops::AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount::new(self.metal.saturating_sub(rhs.metal), self.energy.saturating_sub(rhs.energy))
    }
}

impl std::ops::SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        *self = *self - rhs;
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

/// A player's stockpile and last computed net income.
///
/// `metal` and `energy` never go below zero once income has been applied.
/// The income fields are overwritten every turn and may be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub metal: i64,
    pub energy: i64,
    pub metal_income: i64,
    pub energy_income: i64,
}

impl Resources {
    pub fn new(metal: i64, energy: i64) -> Self {
        Resources { metal, energy, metal_income: 0, energy_income: 0 }
    }

    /// Current stockpile as an `Amount`.
    pub fn stock(&self) -> Amount {
        Amount::new(self.metal, self.energy)
    }

    /// Last computed net income as an `Amount`.
    pub fn income(&self) -> Amount {
        Amount::new(self.metal_income, self.energy_income)
    }

    /// Removes a cost from the stockpile. Returns false (and changes nothing)
    /// when the stockpile does not cover it.
    pub fn try_spend(&mut self, cost: &Amount) -> bool {
        if !self.stock().covers(cost) {
            return false;
        }
        self.metal -= cost.metal;
        self.energy -= cost.energy;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_arithmetic() {
        let a = Amount::new(10, -4);
        let b = Amount::new(3, 6);
        assert_eq!(a + b, Amount::new(13, 2));
        assert_eq!(a - b, Amount::new(7, -10));
        assert_eq!(b.scale(3), Amount::new(9, 18));
        assert_eq!([a, b].into_iter().sum::<Amount>(), Amount::new(13, 2));
    }

    #[test]
    fn covers_checks_both_components() {
        assert!(Amount::new(5, 5).covers(&Amount::new(5, 0)));
        assert!(!Amount::new(5, 5).covers(&Amount::new(0, 6)));
    }

    #[test]
    fn try_spend_is_all_or_nothing() {
        let mut r = Resources::new(100, 20);
        assert!(!r.try_spend(&Amount::new(50, 30)));
        assert_eq!(r.stock(), Amount::new(100, 20));
        assert!(r.try_spend(&Amount::new(50, 20)));
        assert_eq!(r.stock(), Amount::new(50, 0));
    }
}
