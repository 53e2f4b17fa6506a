use super::ids::{BondTypeId, ParticleId};
use super::system::ParticleSystem;
use nalgebra::{UnitQuaternion, Vector3};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Default lower bound on the center-to-center separation of bonded particles.
///
/// Below this distance the bond axis is numerically meaningless, so bond
/// creation refuses outright and force evaluation clamps to it.
pub const DEFAULT_MIN_SEPARATION: f64 = 1e-10;

#[derive(Debug, Error)]
pub enum BondError {
    #[error("Particle {0:?} not found in the system")]
    ParticleNotFound(ParticleId),
    #[error(
        "Bond between {a:?} and {b:?} is degenerate: separation {separation:.3e} is below the minimum {minimum:.3e}"
    )]
    DegenerateGeometry {
        a: ParticleId,
        b: ParticleId,
        separation: f64,
        minimum: f64,
    },
}

/// The rest-state geometry of a bond, captured once at creation.
///
/// All subsequent deformation measures are taken relative to this snapshot,
/// which makes the bond response invariant under rigid-body motion: a pair of
/// particles translated and rotated together produces exactly zero deformation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceGeometry {
    /// The center-to-center distance at creation.
    pub length: f64,
    /// The relative orientation of the partners at creation, `q_b⁻¹ · q_a`.
    pub rest_rotation: UnitQuaternion<f64>,
    /// The bond axis expressed in the first partner's body frame at creation.
    pub axis_a: Vector3<f64>,
    /// The bond axis expressed in the second partner's body frame at creation.
    pub axis_b: Vector3<f64>,
}

/// A breakable mechanical bond between two particles.
///
/// A bond stores the IDs of its partners, the coefficient set it responds
/// with, the reference geometry frozen at creation, and its failure state.
/// Breakage is irreversible: once the flag is set the bond contributes
/// nothing and is never re-armed.
///
/// The broken flag is atomic so that concurrent force sweeps may observe and
/// publish failure without locking; all other fields are immutable after
/// creation except the peak-load diagnostic, which only the owning sweep
/// updates.
#[derive(Debug)]
pub struct Bond {
    a: ParticleId,
    b: ParticleId,
    type_id: BondTypeId,
    reference: ReferenceGeometry,
    broken: AtomicBool,
    peak_metric: f64,
}

impl Bond {
    /// Creates a bond between two particles, capturing the current pair
    /// geometry as the rest state.
    ///
    /// # Arguments
    ///
    /// * `system` - The particle system holding both partners.
    /// * `a` - The first partner.
    /// * `b` - The second partner.
    /// * `type_id` - The bond type whose coefficients govern this bond.
    ///
    /// # Errors
    ///
    /// Returns `BondError::ParticleNotFound` if either partner is missing and
    /// `BondError::DegenerateGeometry` if the partners are closer than
    /// [`DEFAULT_MIN_SEPARATION`], in which case no bond axis can be defined.
    pub fn create(
        system: &ParticleSystem,
        a: ParticleId,
        b: ParticleId,
        type_id: BondTypeId,
    ) -> Result<Self, BondError> {
        let pa = system.particle(a).ok_or(BondError::ParticleNotFound(a))?;
        let pb = system.particle(b).ok_or(BondError::ParticleNotFound(b))?;

        let separation = pb.position - pa.position;
        let length = separation.norm();
        if length < DEFAULT_MIN_SEPARATION {
            return Err(BondError::DegenerateGeometry {
                a,
                b,
                separation: length,
                minimum: DEFAULT_MIN_SEPARATION,
            });
        }
        let axis = separation / length;

        let reference = ReferenceGeometry {
            length,
            rest_rotation: pb.orientation.inverse() * pa.orientation,
            axis_a: pa.orientation.inverse_transform_vector(&axis),
            axis_b: pb.orientation.inverse_transform_vector(&axis),
        };

        Ok(Self {
            a,
            b,
            type_id,
            reference,
            broken: AtomicBool::new(false),
            peak_metric: 0.0,
        })
    }

    /// Reassembles a bond from persisted state.
    pub(crate) fn from_parts(
        a: ParticleId,
        b: ParticleId,
        type_id: BondTypeId,
        reference: ReferenceGeometry,
        broken: bool,
        peak_metric: f64,
    ) -> Self {
        Self {
            a,
            b,
            type_id,
            reference,
            broken: AtomicBool::new(broken),
            peak_metric,
        }
    }

    /// The first bonded partner.
    pub fn a(&self) -> ParticleId {
        self.a
    }

    /// The second bonded partner.
    pub fn b(&self) -> ParticleId {
        self.b
    }

    /// The bond type governing this bond's coefficients.
    pub fn type_id(&self) -> BondTypeId {
        self.type_id
    }

    /// The rest-state geometry captured at creation.
    pub fn reference(&self) -> &ReferenceGeometry {
        &self.reference
    }

    /// Whether this bond has failed.
    ///
    /// Uses acquire ordering so that a reader observing `true` also observes
    /// every write made before the flag was published.
    pub fn is_broken(&self) -> bool {
        self.broken.load(Ordering::Acquire)
    }

    /// Marks this bond as failed. The transition is irreversible.
    pub fn mark_broken(&self) {
        self.broken.store(true, Ordering::Release);
    }

    /// The highest breakage metric this bond has ever reached.
    pub fn peak_metric(&self) -> f64 {
        self.peak_metric
    }

    /// Folds a freshly computed breakage metric into the peak diagnostic.
    pub fn record_metric(&mut self, metric: f64) {
        if metric > self.peak_metric {
            self.peak_metric = metric;
        }
    }
}

impl Clone for Bond {
    fn clone(&self) -> Self {
        Self {
            a: self.a,
            b: self.b,
            type_id: self.type_id,
            reference: self.reference.clone(),
            broken: AtomicBool::new(self.is_broken()),
            peak_metric: self.peak_metric,
        }
    }
}

impl PartialEq for Bond {
    fn eq(&self, other: &Self) -> bool {
        self.a == other.a
            && self.b == other.b
            && self.type_id == other.type_id
            && self.reference == other.reference
            && self.is_broken() == other.is_broken()
            && self.peak_metric == other.peak_metric
    }
}

/// Owns every bond in the system, in creation order.
///
/// Creation order is the canonical iteration order for force sweeps and for
/// the restart codec, which is what makes runs reproducible bond-for-bond.
/// Bonds are never removed; a failed bond stays in place with its broken
/// flag set.
#[derive(Debug, Clone, Default)]
pub struct BondStore {
    bonds: Vec<Bond>,
}

impl BondStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a bond and returns its index in creation order.
    pub fn push(&mut self, bond: Bond) -> usize {
        self.bonds.push(bond);
        self.bonds.len() - 1
    }

    /// Retrieves a bond by its creation index.
    pub fn get(&self, index: usize) -> Option<&Bond> {
        self.bonds.get(index)
    }

    /// Retrieves a mutable bond by its creation index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Bond> {
        self.bonds.get_mut(index)
    }

    /// Returns the number of bonds ever created, including broken ones.
    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    /// Returns `true` if no bonds have been created.
    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    /// Iterates over all bonds in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Bond> {
        self.bonds.iter()
    }

    /// The bonds as a slice, in creation order.
    pub fn as_slice(&self) -> &[Bond] {
        &self.bonds
    }

    /// Iterates mutably over all bonds in creation order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Bond> {
        self.bonds.iter_mut()
    }

    /// Returns the number of bonds whose broken flag is set.
    pub fn broken_count(&self) -> usize {
        self.bonds.iter().filter(|b| b.is_broken()).count()
    }

    /// Returns the number of bonds still carrying load.
    pub fn active_count(&self) -> usize {
        self.bonds.len() - self.broken_count()
    }

    /// Marks every bond with a missing partner as broken.
    ///
    /// Hosts that remove particles call this before the next force sweep so
    /// that dangling bonds retire instead of failing the evaluation.
    ///
    /// # Return
    ///
    /// Returns the number of bonds retired by this call.
    pub fn retire_dangling(&mut self, system: &ParticleSystem) -> usize {
        let mut retired = 0;
        for bond in &self.bonds {
            if !bond.is_broken() && (!system.contains(bond.a()) || !system.contains(bond.b())) {
                bond.mark_broken();
                retired += 1;
            }
        }
        retired
    }
}
