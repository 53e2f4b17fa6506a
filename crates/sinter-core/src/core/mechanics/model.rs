use super::breakage;
use super::contribution::BondContribution;
use super::damping::{self, DampingForces};
use super::elastic::{self, ElasticForces};
use super::kinematics::BondKinematics;
use super::params::BondTypeParams;
use super::thermal::{self, HeatSplit};
use serde::Deserialize;

/// Tag selecting the mechanical formulation of a bond type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BondModelKind {
    /// Four-channel formulation with stretch, shear, twist, and bend.
    #[default]
    Rotational,
    /// Normal-only formulation without rotational resistance.
    Spring,
}

impl BondModelKind {
    /// Resolves the tag to its formulation. Models are stateless, so a
    /// static instance per kind suffices.
    pub fn model(&self) -> &'static dyn BondModel {
        match self {
            BondModelKind::Rotational => &RotationalBond,
            BondModelKind::Spring => &SpringBond,
        }
    }
}

/// Per-sweep evaluation toggles shared by every bond.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EvalSettings {
    /// Whether elastic loads are softened toward the failure surface.
    pub smooth: bool,
    /// How generated heat is divided between the partners.
    pub heat_split: HeatSplit,
}

/// Partner temperatures, passed only when thermal coupling is active for
/// the bond being evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalContext {
    pub temp_a: f64,
    pub temp_b: f64,
}

/// The complete outcome of evaluating one bond for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondEvaluation {
    /// Loads and heat to deposit on the pair.
    pub contribution: BondContribution,
    /// Failure metric computed from the raw elastic loads.
    pub metric: f64,
    /// Whether this evaluation tripped the failure criterion.
    pub breaks: bool,
    /// Mechanical power removed by damping.
    pub dissipated_power: f64,
}

/// A mechanical bond formulation.
///
/// Implementations provide the three per-channel computations; the provided
/// [`evaluate`](BondModel::evaluate) method chains them into the canonical
/// per-step pipeline. The failure metric is always taken from the raw
/// elastic loads, before any smoothing, so softened bonds still break at the
/// same deformation.
pub trait BondModel: Send + Sync {
    /// Elastic response to the current deformation.
    fn compute_elastic(&self, kin: &BondKinematics, params: &BondTypeParams) -> ElasticForces;

    /// Velocity-proportional damping response and dissipated power.
    fn compute_damping(&self, kin: &BondKinematics, params: &BondTypeParams) -> DampingForces;

    /// Failure metric from raw elastic loads and an optional pair temperature.
    fn evaluate_breakage(
        &self,
        loads: &ElasticForces,
        params: &BondTypeParams,
        temperature: Option<f64>,
    ) -> f64;

    /// Runs the full per-step pipeline for one bond.
    fn evaluate(
        &self,
        kin: &BondKinematics,
        params: &BondTypeParams,
        settings: &EvalSettings,
        thermal_ctx: Option<ThermalContext>,
    ) -> BondEvaluation {
        let raw = self.compute_elastic(kin, params);
        let temperature = thermal_ctx.map(|ctx| 0.5 * (ctx.temp_a + ctx.temp_b));
        let metric = self.evaluate_breakage(&raw, params, temperature);
        let breaks = breakage::breaks(metric);

        let elastic = if settings.smooth {
            raw.scaled(elastic::smoothing_weight(metric))
        } else {
            raw
        };
        let damping = self.compute_damping(kin, params);

        let paired_torque = elastic.torque + damping.torque;
        let shared_torque = elastic.arm_torque + damping.arm_torque;
        let mut contribution = BondContribution {
            force: elastic.force + damping.force,
            torque_a: paired_torque + shared_torque,
            torque_b: -paired_torque + shared_torque,
            heat_a: 0.0,
            heat_b: 0.0,
        };

        if let (Some(ctx), Some(tp)) = (thermal_ctx, params.thermal) {
            let generated = thermal::dissipation_heat(damping.power, tp.kh);
            let (heat_a, heat_b) = settings.heat_split.split(generated);
            let exchanged = thermal::conduction(tp.kcond, ctx.temp_a, ctx.temp_b);
            contribution.heat_a = heat_a + exchanged;
            contribution.heat_b = heat_b - exchanged;
        }

        BondEvaluation {
            contribution,
            metric,
            breaks,
            dissipated_power: damping.power,
        }
    }
}

/// The four-channel rotational bond formulation.
pub struct RotationalBond;

impl BondModel for RotationalBond {
    fn compute_elastic(&self, kin: &BondKinematics, params: &BondTypeParams) -> ElasticForces {
        elastic::rotational(kin, params)
    }

    fn compute_damping(&self, kin: &BondKinematics, params: &BondTypeParams) -> DampingForces {
        damping::rotational(kin, params)
    }

    fn evaluate_breakage(
        &self,
        loads: &ElasticForces,
        params: &BondTypeParams,
        temperature: Option<f64>,
    ) -> f64 {
        breakage::combined_metric(loads, params, temperature)
    }
}

/// The normal-only spring bond formulation.
pub struct SpringBond;

impl BondModel for SpringBond {
    fn compute_elastic(&self, kin: &BondKinematics, params: &BondTypeParams) -> ElasticForces {
        elastic::spring(kin, params)
    }

    fn compute_damping(&self, kin: &BondKinematics, params: &BondTypeParams) -> DampingForces {
        damping::spring(kin, params)
    }

    fn evaluate_breakage(
        &self,
        loads: &ElasticForces,
        params: &BondTypeParams,
        temperature: Option<f64>,
    ) -> f64 {
        breakage::combined_metric(loads, params, temperature)
    }
}
