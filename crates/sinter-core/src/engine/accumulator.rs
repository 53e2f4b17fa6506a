use crate::core::mechanics::contribution::BondContribution;
use crate::core::models::ids::ParticleId;
use nalgebra::Vector3;
use slotmap::SecondaryMap;
use std::ops::{Add, AddAssign};

/// Net force, torque, and heat accumulated on one particle over a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParticleLoads {
    pub force: Vector3<f64>,
    pub torque: Vector3<f64>,
    pub heat: f64,
}

impl Add for ParticleLoads {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            force: self.force + rhs.force,
            torque: self.torque + rhs.torque,
            heat: self.heat + rhs.heat,
        }
    }
}

impl AddAssign for ParticleLoads {
    fn add_assign(&mut self, rhs: Self) {
        self.force += rhs.force;
        self.torque += rhs.torque;
        self.heat += rhs.heat;
    }
}

/// Per-particle deposition arena for one force sweep.
///
/// Bond contributions land here instead of being written straight into
/// particle state, which keeps the sweep phase pure and leaves the host in
/// control of integration. Particles nothing was deposited on read as zero.
#[derive(Debug, Clone, Default)]
pub struct Accumulators {
    loads: SecondaryMap<ParticleId, ParticleLoads>,
}

impl Accumulators {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every deposit, readying the arena for the next sweep.
    pub fn clear(&mut self) {
        self.loads.clear();
    }

    /// Reads the accumulated loads of a particle.
    pub fn loads(&self, id: ParticleId) -> ParticleLoads {
        self.loads.get(id).copied().unwrap_or_default()
    }

    /// Adds loads onto one particle.
    pub fn deposit(&mut self, id: ParticleId, loads: ParticleLoads) {
        if let Some(slot) = self.loads.get_mut(id) {
            *slot += loads;
        } else {
            self.loads.insert(id, loads);
        }
    }

    /// Deposits a bond contribution onto its pair.
    ///
    /// The first partner receives the contribution force, the second its
    /// negation, so bond deposits can never change the total momentum of
    /// the system.
    pub fn deposit_bond(&mut self, a: ParticleId, b: ParticleId, contribution: &BondContribution) {
        self.deposit(
            a,
            ParticleLoads {
                force: contribution.force,
                torque: contribution.torque_a,
                heat: contribution.heat_a,
            },
        );
        self.deposit(
            b,
            ParticleLoads {
                force: -contribution.force,
                torque: contribution.torque_b,
                heat: contribution.heat_b,
            },
        );
    }

    /// Iterates over every particle with a non-default deposit.
    pub fn iter(&self) -> impl Iterator<Item = (ParticleId, &ParticleLoads)> {
        self.loads.iter()
    }

    /// Sum of all deposited forces. Zero up to rounding when every deposit
    /// came through [`deposit_bond`](Accumulators::deposit_bond).
    pub fn net_force(&self) -> Vector3<f64> {
        self.loads
            .values()
            .fold(Vector3::zeros(), |acc, l| acc + l.force)
    }

    /// Sum of all deposited heat.
    pub fn total_heat(&self) -> f64 {
        self.loads.values().map(|l| l.heat).sum()
    }
}
