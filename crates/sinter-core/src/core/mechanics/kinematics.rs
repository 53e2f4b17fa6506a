use crate::core::models::bond::ReferenceGeometry;
use crate::core::models::particle::Particle;
use nalgebra::Vector3;

const MATERIAL_AXIS_EPSILON: f64 = 1e-12;

/// The instantaneous deformation and rate state of one bond.
///
/// All vectors are world-frame. The deformation measures compare the current
/// pair configuration against the bond's [`ReferenceGeometry`], so a rigidly
/// translated and rotated pair yields zeros throughout. Displacement-like
/// channels (`stretch`, `shear`) and rotation-like channels (`twist`, `bend`)
/// are split about the current bond axis, as are the corresponding rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondKinematics {
    /// Unit vector from the first partner to the second.
    pub axis: Vector3<f64>,
    /// Current center-to-center distance, clamped from below.
    pub length: f64,
    /// Elongation relative to the rest length.
    pub stretch: f64,
    /// Tangential displacement of the pair off the mean material axis.
    pub shear: Vector3<f64>,
    /// Relative rotation about the bond axis since creation.
    pub twist: Vector3<f64>,
    /// Relative rotation perpendicular to the bond axis since creation.
    pub bend: Vector3<f64>,
    /// Normal component of the contact-point relative velocity.
    pub normal_velocity: Vector3<f64>,
    /// Tangential component of the contact-point relative velocity.
    pub shear_velocity: Vector3<f64>,
    /// Relative angular velocity about the bond axis.
    pub twist_rate: Vector3<f64>,
    /// Relative angular velocity perpendicular to the bond axis.
    pub roll_rate: Vector3<f64>,
    /// Whether the separation fell below the minimum and was clamped.
    pub clamped: bool,
}

/// Extracts the deformation and rate state of a bond from its partners.
///
/// Separations below `min_separation` are clamped to it and flagged; the
/// bond axis then falls back to the mean material axis carried by the two
/// body frames, which stays well-defined when the centers coincide.
pub fn extract(
    pa: &Particle,
    pb: &Particle,
    reference: &ReferenceGeometry,
    min_separation: f64,
) -> BondKinematics {
    let separation = pb.position - pa.position;
    let mut length = separation.norm();
    let mut clamped = false;

    // The bond axis each body believes it carries, rotated into the world.
    let axis_a_world = pa.orientation * reference.axis_a;
    let axis_b_world = pb.orientation * reference.axis_b;
    let mean_axis = axis_a_world + axis_b_world;
    let material_axis = if mean_axis.norm() > MATERIAL_AXIS_EPSILON {
        mean_axis.normalize()
    } else {
        axis_a_world
    };

    let axis = if length < min_separation {
        length = min_separation;
        clamped = true;
        material_axis
    } else {
        separation / length
    };

    let stretch = length - reference.length;

    let offset = separation - reference.length * material_axis;
    let shear = offset - axis * offset.dot(&axis);

    let deviation = pb.orientation * reference.rest_rotation * pa.orientation.inverse();
    let rotation = deviation.scaled_axis();
    let twist = axis * rotation.dot(&axis);
    let bend = rotation - twist;

    // Relative velocity of the nominal contact point at the bond midpoint.
    let spin = pa.angular_velocity + pb.angular_velocity;
    let contact = (pb.velocity - pa.velocity) - (0.5 * length) * spin.cross(&axis);
    let normal_velocity = axis * contact.dot(&axis);
    let shear_velocity = contact - normal_velocity;

    let relative_spin = pb.angular_velocity - pa.angular_velocity;
    let twist_rate = axis * relative_spin.dot(&axis);
    let roll_rate = relative_spin - twist_rate;

    BondKinematics {
        axis,
        length,
        stretch,
        shear,
        twist,
        bend,
        normal_velocity,
        shear_velocity,
        twist_rate,
        roll_rate,
        clamped,
    }
}
