use nalgebra::{Point3, UnitQuaternion, Vector3};

/// Represents a rigid spherical particle in a bonded-particle system.
///
/// This struct carries the full kinematic and thermal state of one body:
/// translation, rotation, their rates, and a scalar temperature. Bonds read
/// this state when computing forces; integrators write it back. All angular
/// quantities are expressed in the world frame, while the orientation
/// quaternion maps body-frame vectors into the world frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// The position of the particle center in world coordinates.
    pub position: Point3<f64>,
    /// The orientation of the body frame relative to the world frame.
    pub orientation: UnitQuaternion<f64>,
    /// The translational velocity of the particle center.
    pub velocity: Vector3<f64>,
    /// The angular velocity in world coordinates.
    pub angular_velocity: Vector3<f64>,
    /// The particle mass.
    pub mass: f64,
    /// The moment of inertia about any axis through the center.
    pub inertia: f64,
    /// The current temperature of the particle.
    pub temperature: f64,
    /// The heat required to raise the particle temperature by one unit.
    pub heat_capacity: f64,
}

impl Particle {
    /// Creates a new `Particle` at rest at the given position.
    ///
    /// The orientation starts at identity, velocities at zero, and the scalar
    /// properties (mass, inertia, heat capacity) at one so that a bare particle
    /// is immediately usable in tests and simple setups. Callers populate the
    /// remaining fields directly.
    ///
    /// # Arguments
    ///
    /// * `position` - The world-frame position of the particle center.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            orientation: UnitQuaternion::identity(),
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            mass: 1.0,
            inertia: 1.0,
            temperature: 0.0,
            heat_capacity: 1.0,
        }
    }
}
