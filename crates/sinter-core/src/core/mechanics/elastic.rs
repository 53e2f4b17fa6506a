use super::kinematics::BondKinematics;
use super::params::BondTypeParams;
use nalgebra::Vector3;

/// Elastic loads of one bond, resolved per channel.
///
/// `force` and `torque` act on the first partner with the second receiving
/// their negation; `arm_torque` is the moment of the tangential force about
/// each particle center and acts with the same sign on both partners. The
/// scalar magnitudes are the per-channel loads fed to the breakage metric,
/// with `tension` already floored at zero so compression never breaks bonds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElasticForces {
    pub force: Vector3<f64>,
    pub torque: Vector3<f64>,
    pub arm_torque: Vector3<f64>,
    pub tension: f64,
    pub shear_mag: f64,
    pub twist_mag: f64,
    pub bend_mag: f64,
}

impl ElasticForces {
    /// Scales every load by a smoothing weight in `[0, 1]`.
    pub fn scaled(mut self, weight: f64) -> Self {
        self.force *= weight;
        self.torque *= weight;
        self.arm_torque *= weight;
        self.tension *= weight;
        self.shear_mag *= weight;
        self.twist_mag *= weight;
        self.bend_mag *= weight;
        self
    }
}

/// Full four-channel elastic response of a rotational bond.
pub fn rotational(kin: &BondKinematics, params: &BondTypeParams) -> ElasticForces {
    let normal = params.kr * kin.stretch * kin.axis;
    let shear = params.ks * kin.shear;
    let twist = params.kt * kin.twist;
    let bend = params.kb * kin.bend;

    ElasticForces {
        force: normal + shear,
        torque: twist + bend,
        arm_torque: (0.5 * kin.length) * kin.axis.cross(&shear),
        tension: (params.kr * kin.stretch).max(0.0),
        shear_mag: shear.norm(),
        twist_mag: twist.norm(),
        bend_mag: bend.norm(),
    }
}

/// Normal-only elastic response of a plain spring bond.
pub fn spring(kin: &BondKinematics, params: &BondTypeParams) -> ElasticForces {
    ElasticForces {
        force: params.kr * kin.stretch * kin.axis,
        tension: (params.kr * kin.stretch).max(0.0),
        ..Default::default()
    }
}

/// Load-softening factor applied to elastic channels as a bond nears failure.
///
/// Falls from one at zero load to zero at the failure surface, flattening the
/// force discontinuity a breaking bond would otherwise inject.
pub fn smoothing_weight(metric: f64) -> f64 {
    (1.0 - metric.powi(4)).clamp(0.0, 1.0)
}
