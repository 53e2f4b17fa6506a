use super::ids::ParticleId;
use super::particle::Particle;
use slotmap::SlotMap;

/// Represents the collection of particles making up a bonded-particle system.
///
/// This struct is the central container for body state. Particles are stored
/// in a slot map so that identifiers stay stable under removal and can be
/// persisted across restarts. Bonds and accumulators reference particles
/// exclusively through their [`ParticleId`].
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    /// Primary storage for particles using a slot map for stable ID management.
    particles: SlotMap<ParticleId, Particle>,
}

impl ParticleSystem {
    /// Creates a new, empty particle system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a particle to the system and returns its newly assigned ID.
    ///
    /// # Arguments
    ///
    /// * `particle` - The particle to insert.
    pub fn add_particle(&mut self, particle: Particle) -> ParticleId {
        self.particles.insert(particle)
    }

    /// Removes a particle from the system.
    ///
    /// Any bonds referencing the removed particle become dangling and must be
    /// retired by the caller before the next force evaluation.
    ///
    /// # Return
    ///
    /// Returns the removed particle, or `None` if the ID was not present.
    pub fn remove_particle(&mut self, id: ParticleId) -> Option<Particle> {
        self.particles.remove(id)
    }

    /// Retrieves an immutable reference to a particle by its ID.
    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id)
    }

    /// Retrieves a mutable reference to a particle by its ID.
    pub fn particle_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.particles.get_mut(id)
    }

    /// Returns `true` if the system contains a particle with the given ID.
    pub fn contains(&self, id: ParticleId) -> bool {
        self.particles.contains_key(id)
    }

    /// Returns the number of particles in the system.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Returns `true` if the system contains no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Returns an iterator over all particles and their IDs.
    pub fn particles_iter(&self) -> impl Iterator<Item = (ParticleId, &Particle)> {
        self.particles.iter()
    }

    /// Returns a mutable iterator over all particles and their IDs.
    pub fn particles_iter_mut(&mut self) -> impl Iterator<Item = (ParticleId, &mut Particle)> {
        self.particles.iter_mut()
    }
}
