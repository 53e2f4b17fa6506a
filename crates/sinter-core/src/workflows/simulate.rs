use crate::core::io::checkpoint::Checkpoint;
use crate::core::mechanics::params::BondTypeTable;
use crate::core::models::bond::BondStore;
use crate::core::models::system::ParticleSystem;
use crate::engine::accumulator::Accumulators;
use crate::engine::config::EngineConfig;
use crate::engine::error::EngineError;
use crate::engine::evaluator::BondForceEvaluator;
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::UnitQuaternion;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Periodic snapshot policy for a simulation run.
#[derive(Debug, Clone)]
pub struct CheckpointPolicy {
    /// Where the snapshot is written. Each save overwrites the previous one.
    pub path: PathBuf,
    /// Save every this many steps; zero saves only at the end of the run.
    pub every: u64,
}

/// Host-side settings for a complete simulation run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of integration steps to advance.
    pub steps: u64,
    /// Timestep applied to every particle update.
    pub dt: f64,
    /// Evaluation settings handed to the bond engine.
    pub engine: EngineConfig,
    /// Optional checkpointing; `None` runs without snapshots.
    pub checkpoint: Option<CheckpointPolicy>,
}

/// Summary of a finished simulation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationResult {
    /// Steps actually advanced.
    pub steps: u64,
    /// Bonds in the broken state at the end of the run.
    pub broken_bonds: usize,
    /// Total energy removed by damping, integrated over the run.
    pub dissipated_energy: f64,
    /// Total heat deposited on particles, integrated over the run.
    pub generated_heat: f64,
}

/// Runs a bonded-particle simulation to completion.
///
/// Each step sweeps every bond against the current particle state, then
/// advances velocities, spins, positions, orientations, and temperatures
/// with a semi-implicit Euler update. Bond failure is irreversible and is
/// reported through the progress callback as it happens.
///
/// # Arguments
///
/// * `system` - The particle state, advanced in place.
/// * `bonds` - The bond store; failed bonds keep their slot with the broken
///   flag set.
/// * `table` - Coefficients for every bond type used by `bonds`.
/// * `config` - Step count, timestep, engine settings, and checkpointing.
/// * `reporter` - Progress sink for phase, step, and breakage events.
///
/// # Errors
///
/// Returns `EngineError::InvalidTimestep` for a non-positive or non-finite
/// `dt`, `EngineError::UninitializedType` if any bond references a type the
/// table does not define, and `EngineError::Checkpoint` if a snapshot cannot
/// be written.
#[instrument(skip_all, name = "simulation_workflow")]
pub fn run(
    system: &mut ParticleSystem,
    bonds: &mut BondStore,
    table: &BondTypeTable,
    config: &SimulationConfig,
    reporter: &ProgressReporter,
) -> Result<SimulationResult, EngineError> {
    // === Phase 0: Validation and setup ===
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    if !config.dt.is_finite() || config.dt <= 0.0 {
        return Err(EngineError::InvalidTimestep(config.dt));
    }
    if let Some(bond) = bonds.iter().find(|bond| !table.contains(bond.type_id())) {
        return Err(EngineError::UninitializedType(bond.type_id()));
    }

    let evaluator = BondForceEvaluator::new(config.engine);
    let mut accumulators = Accumulators::new();
    info!(
        steps = config.steps,
        dt = config.dt,
        particles = system.len(),
        bonds = bonds.len(),
        "Starting bond simulation."
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 1: Time integration ===
    reporter.report(Progress::PhaseStart {
        name: "Integration",
    });
    reporter.report(Progress::TaskStart {
        total_steps: config.steps,
    });

    let mut dissipated_energy = 0.0;
    let mut generated_heat = 0.0;
    for step in 1..=config.steps {
        accumulators.clear();
        let report = evaluator.sweep(system, table, bonds, &mut accumulators)?;
        dissipated_energy += report.dissipated_power * config.dt;
        generated_heat += report.generated_heat * config.dt;

        if report.newly_broken > 0 {
            info!(step, count = report.newly_broken, "Bonds failed.");
            reporter.report(Progress::BondsBroken {
                step,
                count: report.newly_broken,
            });
        }

        integrate(system, &accumulators, config.dt);

        if let Some(policy) = &config.checkpoint {
            if policy.every > 0 && step % policy.every == 0 {
                write_checkpoint(&policy.path, &evaluator, table, bonds)?;
            }
        }
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Final snapshot and summary ===
    if let Some(policy) = &config.checkpoint {
        let saved_on_last_step =
            policy.every > 0 && config.steps > 0 && config.steps % policy.every == 0;
        if !saved_on_last_step {
            write_checkpoint(&policy.path, &evaluator, table, bonds)?;
        }
    }

    let result = SimulationResult {
        steps: config.steps,
        broken_bonds: bonds.broken_count(),
        dissipated_energy,
        generated_heat,
    };
    info!(
        broken = result.broken_bonds,
        dissipated = result.dissipated_energy,
        "Simulation complete."
    );
    Ok(result)
}

/// Resumes a simulation from a restart snapshot.
///
/// The engine settings, bond type table, and bond store are rebuilt from the
/// checkpoint; `config.engine` is ignored in favor of the snapshot's settings
/// so the resumed run evaluates exactly as the original would have. Particle
/// state is the host's to supply alongside.
///
/// # Return
///
/// Returns the run summary together with the advanced bond store.
///
/// # Errors
///
/// See [`run`].
#[instrument(skip_all, name = "resume_workflow")]
pub fn resume(
    system: &mut ParticleSystem,
    checkpoint: Checkpoint,
    config: &SimulationConfig,
    reporter: &ProgressReporter,
) -> Result<(SimulationResult, BondStore), EngineError> {
    let Checkpoint {
        settings,
        types,
        mut bonds,
    } = checkpoint;

    let mut run_config = config.clone();
    run_config.engine = EngineConfig::from(settings);
    info!(
        bonds = bonds.len(),
        broken = bonds.broken_count(),
        "Resuming from checkpoint."
    );

    let result = run(system, &mut bonds, &types, &run_config, reporter)?;
    Ok((result, bonds))
}

/// Advances every particle one timestep from its accumulated loads.
///
/// Semi-implicit Euler: velocities and spins pick up the step's impulse
/// first, then positions and orientations advance with the updated rates.
fn integrate(system: &mut ParticleSystem, accumulators: &Accumulators, dt: f64) {
    for (id, particle) in system.particles_iter_mut() {
        let loads = accumulators.loads(id);
        particle.velocity += loads.force / particle.mass * dt;
        particle.angular_velocity += loads.torque / particle.inertia * dt;
        particle.position += particle.velocity * dt;
        particle.orientation =
            UnitQuaternion::from_scaled_axis(particle.angular_velocity * dt) * particle.orientation;
        particle.temperature += loads.heat / particle.heat_capacity * dt;
    }
}

fn write_checkpoint(
    path: &PathBuf,
    evaluator: &BondForceEvaluator,
    table: &BondTypeTable,
    bonds: &BondStore,
) -> Result<(), EngineError> {
    let snapshot = Checkpoint {
        settings: evaluator.config().to_settings(),
        types: table.clone(),
        bonds: bonds.clone(),
    };
    snapshot.write_to_path(path)?;
    Ok(())
}
