use nalgebra::Vector3;
use std::ops::{Add, AddAssign};

/// The complete mechanical and thermal output of one bond for one step.
///
/// The force is expressed as the load on the first partner; the second
/// partner receives its negation, so summing contributions over any closed
/// set of bonds conserves linear momentum exactly. Torques are stored per
/// partner because the moment-arm term of tangential forces acts with the
/// same sign on both bodies.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BondContribution {
    /// Force on the first partner; the second receives the negation.
    pub force: Vector3<f64>,
    /// Torque on the first partner.
    pub torque_a: Vector3<f64>,
    /// Torque on the second partner.
    pub torque_b: Vector3<f64>,
    /// Heat deposited into the first partner.
    pub heat_a: f64,
    /// Heat deposited into the second partner.
    pub heat_b: f64,
}

impl BondContribution {
    /// Total heat this bond injects into the pair.
    #[inline]
    pub fn total_heat(&self) -> f64 {
        self.heat_a + self.heat_b
    }
}

impl Add for BondContribution {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            force: self.force + rhs.force,
            torque_a: self.torque_a + rhs.torque_a,
            torque_b: self.torque_b + rhs.torque_b,
            heat_a: self.heat_a + rhs.heat_a,
            heat_b: self.heat_b + rhs.heat_b,
        }
    }
}

impl AddAssign for BondContribution {
    fn add_assign(&mut self, rhs: Self) {
        self.force += rhs.force;
        self.torque_a += rhs.torque_a;
        self.torque_b += rhs.torque_b;
        self.heat_a += rhs.heat_a;
        self.heat_b += rhs.heat_b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_initializes_all_fields_to_zero() {
        let c = BondContribution::default();
        assert_eq!(c.force, Vector3::zeros());
        assert_eq!(c.torque_a, Vector3::zeros());
        assert_eq!(c.torque_b, Vector3::zeros());
        assert_eq!(c.heat_a, 0.0);
        assert_eq!(c.heat_b, 0.0);
    }

    #[test]
    fn add_sums_each_field_correctly() {
        let a = BondContribution {
            force: Vector3::new(1.0, 0.0, 0.0),
            torque_a: Vector3::new(0.0, 1.0, 0.0),
            torque_b: Vector3::new(0.0, -1.0, 0.0),
            heat_a: 2.0,
            heat_b: 3.0,
        };
        let b = BondContribution {
            force: Vector3::new(0.0, 2.0, 0.0),
            torque_a: Vector3::new(1.0, 0.0, 0.0),
            torque_b: Vector3::new(0.0, 0.0, 1.0),
            heat_a: 0.5,
            heat_b: -1.0,
        };

        let sum = a + b;
        assert_eq!(sum.force, Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(sum.torque_a, Vector3::new(1.0, 1.0, 0.0));
        assert_eq!(sum.torque_b, Vector3::new(0.0, -1.0, 1.0));
        assert_eq!(sum.heat_a, 2.5);
        assert_eq!(sum.heat_b, 2.0);
    }

    #[test]
    fn add_assign_accumulates_each_field_correctly() {
        let mut acc = BondContribution::default();
        acc += BondContribution {
            force: Vector3::new(1.0, 1.0, 1.0),
            heat_a: 1.0,
            ..Default::default()
        };
        acc += BondContribution {
            force: Vector3::new(-1.0, 0.0, 0.0),
            heat_a: 0.25,
            ..Default::default()
        };

        assert_eq!(acc.force, Vector3::new(0.0, 1.0, 1.0));
        assert_eq!(acc.heat_a, 1.25);
    }

    #[test]
    fn total_heat_sums_both_partners() {
        let c = BondContribution {
            heat_a: 1.5,
            heat_b: 2.5,
            ..Default::default()
        };
        assert_eq!(c.total_heat(), 4.0);
    }
}
