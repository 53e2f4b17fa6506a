use super::kinematics::BondKinematics;
use super::params::BondTypeParams;
use nalgebra::Vector3;

/// Damping loads of one bond together with the dissipated power.
///
/// Sign conventions match [`ElasticForces`](super::elastic::ElasticForces):
/// `force` and `torque` act on the first partner, `arm_torque` on both.
/// `power` is the total mechanical power removed from the pair and is
/// non-negative for non-negative damping coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DampingForces {
    pub force: Vector3<f64>,
    pub torque: Vector3<f64>,
    pub arm_torque: Vector3<f64>,
    pub power: f64,
}

/// Four-channel velocity-proportional damping of a rotational bond.
pub fn rotational(kin: &BondKinematics, params: &BondTypeParams) -> DampingForces {
    let normal = params.gnorm * kin.normal_velocity;
    let sliding = params.gslide * kin.shear_velocity;
    let rolling = params.groll * kin.roll_rate;
    let twisting = params.gtwist * kin.twist_rate;

    let power = params.gnorm * kin.normal_velocity.norm_squared()
        + params.gslide * kin.shear_velocity.norm_squared()
        + params.groll * kin.roll_rate.norm_squared()
        + params.gtwist * kin.twist_rate.norm_squared();

    DampingForces {
        force: normal + sliding,
        torque: rolling + twisting,
        arm_torque: (0.5 * kin.length) * kin.axis.cross(&sliding),
        power,
    }
}

/// Normal-only damping of a plain spring bond.
pub fn spring(kin: &BondKinematics, params: &BondTypeParams) -> DampingForces {
    DampingForces {
        force: params.gnorm * kin.normal_velocity,
        power: params.gnorm * kin.normal_velocity.norm_squared(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mechanics::kinematics::BondKinematics;

    const TOLERANCE: f64 = 1e-12;

    fn still_kinematics() -> BondKinematics {
        BondKinematics {
            axis: Vector3::x(),
            length: 1.0,
            stretch: 0.0,
            shear: Vector3::zeros(),
            twist: Vector3::zeros(),
            bend: Vector3::zeros(),
            normal_velocity: Vector3::zeros(),
            shear_velocity: Vector3::zeros(),
            twist_rate: Vector3::zeros(),
            roll_rate: Vector3::zeros(),
            clamped: false,
        }
    }

    fn damped_params() -> BondTypeParams {
        BondTypeParams {
            kr: 0.0,
            ks: 0.0,
            kt: 0.0,
            kb: 0.0,
            gnorm: 5.0,
            gslide: 2.0,
            groll: 0.5,
            gtwist: 0.25,
            fcr: 1.0,
            fcs: 1.0,
            tct: 1.0,
            tcb: 1.0,
            break_rule: Default::default(),
            model: Default::default(),
            thermal: None,
        }
    }

    #[test]
    fn still_pair_dissipates_nothing() {
        let loads = rotational(&still_kinematics(), &damped_params());
        assert!(loads.force.norm() < TOLERANCE);
        assert!(loads.torque.norm() < TOLERANCE);
        assert_eq!(loads.power, 0.0);
    }

    #[test]
    fn normal_separation_velocity_drives_normal_damping() {
        let mut kin = still_kinematics();
        kin.normal_velocity = Vector3::new(3.0, 0.0, 0.0);

        let loads = rotational(&kin, &damped_params());
        assert!((loads.force - Vector3::new(15.0, 0.0, 0.0)).norm() < TOLERANCE);
        assert!((loads.power - 45.0).abs() < TOLERANCE);
        assert!(loads.arm_torque.norm() < TOLERANCE);
    }

    #[test]
    fn sliding_velocity_drives_tangential_damping_with_arm_torque() {
        let mut kin = still_kinematics();
        kin.shear_velocity = Vector3::new(0.0, 1.5, 0.0);
        kin.length = 2.0;

        let loads = rotational(&kin, &damped_params());
        assert!((loads.force - Vector3::new(0.0, 3.0, 0.0)).norm() < TOLERANCE);
        assert!((loads.arm_torque - Vector3::new(0.0, 0.0, 3.0)).norm() < TOLERANCE);
        assert!((loads.power - 2.0 * 1.5 * 1.5).abs() < TOLERANCE);
    }

    #[test]
    fn relative_spin_drives_roll_and_twist_damping() {
        let mut kin = still_kinematics();
        kin.twist_rate = Vector3::new(2.0, 0.0, 0.0);
        kin.roll_rate = Vector3::new(0.0, 4.0, 0.0);

        let loads = rotational(&kin, &damped_params());
        let expected = Vector3::new(0.25 * 2.0, 0.5 * 4.0, 0.0);
        assert!((loads.torque - expected).norm() < TOLERANCE);
        assert!((loads.power - (0.25 * 4.0 + 0.5 * 16.0)).abs() < TOLERANCE);
    }

    #[test]
    fn dissipated_power_is_never_negative() {
        let states = [
            (
                Vector3::new(-1.0, 0.0, 0.0),
                Vector3::new(0.0, 2.0, -1.0),
                Vector3::new(0.5, 0.0, 0.0),
                Vector3::new(0.0, -0.25, 1.0),
            ),
            (
                Vector3::new(0.01, 0.0, 0.0),
                Vector3::zeros(),
                Vector3::new(-3.0, 0.0, 0.0),
                Vector3::zeros(),
            ),
        ];

        for (vn, vt, wt, wr) in states {
            let mut kin = still_kinematics();
            kin.normal_velocity = vn;
            kin.shear_velocity = vt;
            kin.twist_rate = wt;
            kin.roll_rate = wr;

            let loads = rotational(&kin, &damped_params());
            assert!(loads.power >= 0.0);
        }
    }

    #[test]
    fn spring_bond_damps_only_the_normal_channel() {
        let mut kin = still_kinematics();
        kin.normal_velocity = Vector3::new(1.0, 0.0, 0.0);
        kin.shear_velocity = Vector3::new(0.0, 2.0, 0.0);
        kin.twist_rate = Vector3::new(1.0, 0.0, 0.0);

        let loads = spring(&kin, &damped_params());
        assert!((loads.force - Vector3::new(5.0, 0.0, 0.0)).norm() < TOLERANCE);
        assert!(loads.torque.norm() < TOLERANCE);
        assert!(loads.arm_torque.norm() < TOLERANCE);
        assert!((loads.power - 5.0).abs() < TOLERANCE);
    }
}
