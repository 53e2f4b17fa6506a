use super::accumulator::Accumulators;
use super::config::EngineConfig;
use super::error::EngineError;
use crate::core::mechanics::kinematics;
use crate::core::mechanics::model::{BondEvaluation, EvalSettings, ThermalContext};
use crate::core::mechanics::params::BondTypeTable;
use crate::core::models::bond::{Bond, BondStore};
use crate::core::models::system::ParticleSystem;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Totals of one force sweep.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SweepReport {
    /// Bonds evaluated this sweep.
    pub evaluated: usize,
    /// Bonds skipped because they were already broken.
    pub skipped_broken: usize,
    /// Bonds whose failure criterion tripped this sweep.
    pub newly_broken: usize,
    /// Evaluations whose separation had to be clamped.
    pub clamped: usize,
    /// Total mechanical power removed by damping.
    pub dissipated_power: f64,
    /// Total heat deposited on particles.
    pub generated_heat: f64,
}

/// Sweeps every bond against the current particle state.
///
/// A sweep runs in two phases. The first evaluates all live bonds against an
/// immutable snapshot of particle state and is pure; with the `parallel`
/// feature it fans out across threads. The second folds the outcomes into
/// the accumulators serially, in bond creation order, so deposits, peak
/// metrics, and failure flags never depend on thread scheduling: a given
/// state produces bit-identical results on every run.
pub struct BondForceEvaluator {
    config: EngineConfig,
    degenerate_warned: AtomicBool,
}

impl BondForceEvaluator {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            degenerate_warned: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn settings(&self) -> EvalSettings {
        EvalSettings {
            smooth: self.config.smooth,
            heat_split: self.config.heat_split,
        }
    }

    /// Evaluates every bond and deposits the resulting loads.
    ///
    /// Bonds that trip their failure criterion still deposit this sweep's
    /// loads; they are flagged afterwards and contribute nothing from the
    /// next sweep on.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UninitializedType` if a bond references a type
    /// with no registered coefficients and `EngineError::ParticleNotFound`
    /// if a live bond references a particle missing from the system.
    pub fn sweep(
        &self,
        system: &ParticleSystem,
        table: &BondTypeTable,
        bonds: &mut BondStore,
        accumulators: &mut Accumulators,
    ) -> Result<SweepReport, EngineError> {
        let settings = self.settings();
        let evaluate = |bond: &Bond| self.evaluate_one(system, table, bond, &settings);

        // Phase 1: pure evaluation against the frozen particle state.
        #[cfg(not(feature = "parallel"))]
        let outcomes: Result<Vec<_>, _> = bonds.as_slice().iter().map(evaluate).collect();

        #[cfg(feature = "parallel")]
        let outcomes: Result<Vec<_>, _> = bonds.as_slice().par_iter().map(evaluate).collect();

        let outcomes = outcomes?;

        // Phase 2: serial fold in creation order.
        let mut report = SweepReport::default();
        for (bond, outcome) in bonds.iter_mut().zip(outcomes) {
            let Some((eval, clamped)) = outcome else {
                report.skipped_broken += 1;
                continue;
            };

            accumulators.deposit_bond(bond.a(), bond.b(), &eval.contribution);
            bond.record_metric(eval.metric);
            if eval.breaks {
                bond.mark_broken();
                report.newly_broken += 1;
            }

            report.evaluated += 1;
            if clamped {
                report.clamped += 1;
            }
            report.dissipated_power += eval.dissipated_power;
            report.generated_heat += eval.contribution.total_heat();
        }

        Ok(report)
    }

    /// Evaluates a single bond without depositing loads or advancing state.
    ///
    /// Returns `None` for a broken bond. This is the inspection entry point
    /// for diagnostics and tooling; only [`sweep`](BondForceEvaluator::sweep)
    /// mutates bonds.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::BondIndexOutOfRange` for a bad index, plus the
    /// same lookup errors as a sweep.
    pub fn probe(
        &self,
        system: &ParticleSystem,
        table: &BondTypeTable,
        bonds: &BondStore,
        index: usize,
    ) -> Result<Option<BondEvaluation>, EngineError> {
        let bond = bonds.get(index).ok_or(EngineError::BondIndexOutOfRange {
            index,
            len: bonds.len(),
        })?;
        let outcome = self.evaluate_one(system, table, bond, &self.settings())?;
        Ok(outcome.map(|(eval, _)| eval))
    }

    fn evaluate_one(
        &self,
        system: &ParticleSystem,
        table: &BondTypeTable,
        bond: &Bond,
        settings: &EvalSettings,
    ) -> Result<Option<(BondEvaluation, bool)>, EngineError> {
        if bond.is_broken() {
            return Ok(None);
        }

        let params = table
            .get(bond.type_id())
            .ok_or(EngineError::UninitializedType(bond.type_id()))?;
        let pa = system
            .particle(bond.a())
            .ok_or(EngineError::ParticleNotFound(bond.a()))?;
        let pb = system
            .particle(bond.b())
            .ok_or(EngineError::ParticleNotFound(bond.b()))?;

        let kin = kinematics::extract(pa, pb, bond.reference(), self.config.min_separation);
        if kin.clamped && !self.degenerate_warned.swap(true, Ordering::Relaxed) {
            warn!(
                min_separation = self.config.min_separation,
                "Bonded pair separation clamped to the minimum; geometry is degenerate"
            );
        }

        let thermal_ctx = if self.config.heat && params.thermal.is_some() {
            Some(ThermalContext {
                temp_a: pa.temperature,
                temp_b: pb.temperature,
            })
        } else {
            None
        };

        let eval = params
            .model
            .model()
            .evaluate(&kin, params, settings, thermal_ctx);
        Ok(Some((eval, kin.clamped)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mechanics::params::{BondTypeParams, ThermalParams};
    use crate::core::models::ids::{BondTypeId, ParticleId};
    use crate::core::models::particle::Particle;
    use nalgebra::{Point3, Vector3};

    const TOLERANCE: f64 = 1e-12;

    struct TestSetup {
        system: ParticleSystem,
        table: BondTypeTable,
        bonds: BondStore,
        a: ParticleId,
        b: ParticleId,
    }

    fn base_params() -> BondTypeParams {
        BondTypeParams {
            kr: 100.0,
            ks: 80.0,
            kt: 30.0,
            kb: 40.0,
            gnorm: 5.0,
            gslide: 2.0,
            groll: 0.5,
            gtwist: 0.25,
            fcr: 10.0,
            fcs: 8.0,
            tct: 5.0,
            tcb: 5.0,
            break_rule: Default::default(),
            model: Default::default(),
            thermal: None,
        }
    }

    fn setup_with(params: BondTypeParams) -> TestSetup {
        let mut system = ParticleSystem::new();
        let a = system.add_particle(Particle::new(Point3::origin()));
        let b = system.add_particle(Particle::new(Point3::new(1.0, 0.0, 0.0)));

        let mut table = BondTypeTable::new();
        table.set_coefficients(BondTypeId(1), params).unwrap();

        let mut bonds = BondStore::new();
        bonds.push(crate::core::models::bond::Bond::create(&system, a, b, BondTypeId(1)).unwrap());

        TestSetup {
            system,
            table,
            bonds,
            a,
            b,
        }
    }

    #[test]
    fn sweep_deposits_stretch_forces_on_both_partners() {
        let mut setup = setup_with(base_params());
        setup.system.particle_mut(setup.b).unwrap().position = Point3::new(1.05, 0.0, 0.0);

        let evaluator = BondForceEvaluator::new(EngineConfig::default());
        let mut acc = Accumulators::new();
        let report = evaluator
            .sweep(&setup.system, &setup.table, &mut setup.bonds, &mut acc)
            .unwrap();

        assert_eq!(report.evaluated, 1);
        assert_eq!(report.newly_broken, 0);
        assert!((acc.loads(setup.a).force - Vector3::new(5.0, 0.0, 0.0)).norm() < TOLERANCE);
        assert!((acc.loads(setup.b).force - Vector3::new(-5.0, 0.0, 0.0)).norm() < TOLERANCE);
        assert!(acc.net_force().norm() < TOLERANCE);
    }

    #[test]
    fn tripping_sweep_still_applies_loads_then_retires_the_bond() {
        let mut setup = setup_with(base_params());
        setup.system.particle_mut(setup.b).unwrap().position = Point3::new(1.2, 0.0, 0.0);

        let evaluator = BondForceEvaluator::new(EngineConfig::default());
        let mut acc = Accumulators::new();

        let first = evaluator
            .sweep(&setup.system, &setup.table, &mut setup.bonds, &mut acc)
            .unwrap();
        assert_eq!(first.newly_broken, 1);
        assert!((acc.loads(setup.a).force - Vector3::new(20.0, 0.0, 0.0)).norm() < TOLERANCE);
        assert!(setup.bonds.get(0).unwrap().is_broken());
        assert!((setup.bonds.get(0).unwrap().peak_metric() - 2.0).abs() < TOLERANCE);

        acc.clear();
        let second = evaluator
            .sweep(&setup.system, &setup.table, &mut setup.bonds, &mut acc)
            .unwrap();
        assert_eq!(second.evaluated, 0);
        assert_eq!(second.skipped_broken, 1);
        assert_eq!(second.newly_broken, 0);
        assert!(acc.loads(setup.a).force.norm() < TOLERANCE);
        assert!(acc.loads(setup.b).force.norm() < TOLERANCE);
    }

    #[test]
    fn sweep_fails_for_an_unregistered_bond_type() {
        let mut setup = setup_with(base_params());
        setup.table = BondTypeTable::new();

        let evaluator = BondForceEvaluator::new(EngineConfig::default());
        let mut acc = Accumulators::new();
        let result = evaluator.sweep(&setup.system, &setup.table, &mut setup.bonds, &mut acc);

        assert!(matches!(
            result,
            Err(EngineError::UninitializedType(BondTypeId(1)))
        ));
    }

    #[test]
    fn sweep_fails_for_a_missing_particle() {
        let mut setup = setup_with(base_params());
        setup.system.remove_particle(setup.b);

        let evaluator = BondForceEvaluator::new(EngineConfig::default());
        let mut acc = Accumulators::new();
        let result = evaluator.sweep(&setup.system, &setup.table, &mut setup.bonds, &mut acc);

        assert!(matches!(result, Err(EngineError::ParticleNotFound(id)) if id == setup.b));
    }

    #[test]
    fn repeated_sweeps_of_the_same_state_are_bit_identical() {
        let mut system = ParticleSystem::new();
        let a = system.add_particle(Particle::new(Point3::origin()));
        let b = system.add_particle(Particle::new(Point3::new(1.0, 0.1, 0.0)));
        let c = system.add_particle(Particle::new(Point3::new(2.0, -0.1, 0.3)));
        system.particle_mut(b).unwrap().velocity = Vector3::new(0.1, -0.3, 0.2);
        system.particle_mut(c).unwrap().angular_velocity = Vector3::new(0.5, 0.0, -0.4);

        let mut table = BondTypeTable::new();
        table.set_coefficients(BondTypeId(1), base_params()).unwrap();

        let mut bonds = BondStore::new();
        bonds.push(crate::core::models::bond::Bond::create(&system, a, b, BondTypeId(1)).unwrap());
        bonds.push(crate::core::models::bond::Bond::create(&system, b, c, BondTypeId(1)).unwrap());

        system.particle_mut(b).unwrap().position = Point3::new(1.02, 0.13, -0.01);

        let evaluator = BondForceEvaluator::new(EngineConfig::default());
        let mut first = Accumulators::new();
        let mut second = Accumulators::new();
        evaluator
            .sweep(&system, &table, &mut bonds, &mut first)
            .unwrap();
        evaluator
            .sweep(&system, &table, &mut bonds, &mut second)
            .unwrap();

        for id in [a, b, c] {
            assert_eq!(first.loads(id).force, second.loads(id).force);
            assert_eq!(first.loads(id).torque, second.loads(id).torque);
            assert_eq!(first.loads(id).heat, second.loads(id).heat);
        }
    }

    #[test]
    fn heat_requires_both_the_global_flag_and_a_thermal_block() {
        let thermal_params = {
            let mut p = base_params();
            p.kr = 0.0;
            p.thermal = Some(ThermalParams {
                kh: 1.0,
                fch: 20.0,
                kcond: 0.0,
                t_ref: 300.0,
            });
            p
        };

        // Global flag off: no heat despite the thermal block.
        let mut setup = setup_with(thermal_params);
        setup.system.particle_mut(setup.b).unwrap().velocity = Vector3::new(3.0, 0.0, 0.0);
        let evaluator = BondForceEvaluator::new(EngineConfig::default());
        let mut acc = Accumulators::new();
        let report = evaluator
            .sweep(&setup.system, &setup.table, &mut setup.bonds, &mut acc)
            .unwrap();
        assert_eq!(acc.loads(setup.a).heat, 0.0);
        assert_eq!(report.generated_heat, 0.0);
        assert!((report.dissipated_power - 45.0).abs() < TOLERANCE);

        // Global flag on: dissipation heats both partners evenly.
        let mut setup = setup_with(thermal_params);
        setup.system.particle_mut(setup.b).unwrap().velocity = Vector3::new(3.0, 0.0, 0.0);
        let heated = EngineConfig::builder().heat(true).build().unwrap();
        let evaluator = BondForceEvaluator::new(heated);
        let mut acc = Accumulators::new();
        let report = evaluator
            .sweep(&setup.system, &setup.table, &mut setup.bonds, &mut acc)
            .unwrap();
        assert!((acc.loads(setup.a).heat - 22.5).abs() < TOLERANCE);
        assert!((acc.loads(setup.b).heat - 22.5).abs() < TOLERANCE);
        assert!((report.generated_heat - 45.0).abs() < TOLERANCE);

        // Global flag on but no thermal block: still no heat.
        let mut setup = setup_with({
            let mut p = base_params();
            p.kr = 0.0;
            p
        });
        setup.system.particle_mut(setup.b).unwrap().velocity = Vector3::new(3.0, 0.0, 0.0);
        let evaluator = BondForceEvaluator::new(EngineConfig::builder().heat(true).build().unwrap());
        let mut acc = Accumulators::new();
        evaluator
            .sweep(&setup.system, &setup.table, &mut setup.bonds, &mut acc)
            .unwrap();
        assert_eq!(acc.loads(setup.a).heat, 0.0);
    }

    #[test]
    fn probe_inspects_without_mutating() {
        let mut setup = setup_with(base_params());
        setup.system.particle_mut(setup.b).unwrap().position = Point3::new(1.2, 0.0, 0.0);

        let evaluator = BondForceEvaluator::new(EngineConfig::default());
        let eval = evaluator
            .probe(&setup.system, &setup.table, &setup.bonds, 0)
            .unwrap()
            .unwrap();

        assert!((eval.metric - 2.0).abs() < TOLERANCE);
        assert!(eval.breaks);

        // The bond itself is untouched: not broken, no peak recorded.
        let bond = setup.bonds.get(0).unwrap();
        assert!(!bond.is_broken());
        assert_eq!(bond.peak_metric(), 0.0);
    }

    #[test]
    fn probe_reports_broken_bonds_as_none() {
        let setup = setup_with(base_params());
        setup.bonds.get(0).unwrap().mark_broken();

        let evaluator = BondForceEvaluator::new(EngineConfig::default());
        let outcome = evaluator
            .probe(&setup.system, &setup.table, &setup.bonds, 0)
            .unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn probe_rejects_out_of_range_indices() {
        let setup = setup_with(base_params());
        let evaluator = BondForceEvaluator::new(EngineConfig::default());
        let result = evaluator.probe(&setup.system, &setup.table, &setup.bonds, 5);
        assert!(matches!(
            result,
            Err(EngineError::BondIndexOutOfRange { index: 5, len: 1 })
        ));
    }

    #[test]
    fn clamped_pairs_are_counted_in_the_report() {
        let mut setup = setup_with(base_params());
        setup.system.particle_mut(setup.b).unwrap().position = Point3::new(1e-14, 0.0, 0.0);

        let evaluator = BondForceEvaluator::new(EngineConfig::default());
        let mut acc = Accumulators::new();
        let report = evaluator
            .sweep(&setup.system, &setup.table, &mut setup.bonds, &mut acc)
            .unwrap();

        assert_eq!(report.clamped, 1);
        assert_eq!(report.evaluated, 1);
    }
}
