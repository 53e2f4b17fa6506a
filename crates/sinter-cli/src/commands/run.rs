use crate::cli::RunArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use sinter::core::io::checkpoint::Checkpoint;
use sinter::core::io::scene::{self, Scene};
use sinter::core::mechanics::thermal::HeatSplit;
use sinter::engine::config::EngineConfig;
use sinter::engine::progress::ProgressReporter;
use sinter::workflows::simulate::{self, CheckpointPolicy, SimulationConfig, SimulationResult};
use tracing::info;

pub fn execute(args: RunArgs) -> Result<()> {
    info!("Loading scene from {:?}", &args.scene_dir);
    let mut scene = Scene::load_dir(&args.scene_dir)?;
    info!(
        "Scene loaded: {} particle(s), {} bond(s), {} bond type(s).",
        scene.system.len(),
        scene.bonds.len(),
        scene.types.len()
    );

    let mut builder = EngineConfig::builder().smooth(args.smooth).heat(args.heat);
    if let Some(share) = args.heat_share {
        builder = builder.heat_split(HeatSplit::Fraction(share));
    }
    if let Some(minimum) = args.min_separation {
        builder = builder.min_separation(minimum);
    }
    let engine = builder.build()?;

    let config = SimulationConfig {
        steps: args.steps,
        dt: args.dt,
        engine,
        checkpoint: args.checkpoint.as_ref().map(|path| CheckpointPolicy {
            path: path.clone(),
            every: args.checkpoint_every,
        }),
    };

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting bond simulation...");
    let result = match &args.restart {
        Some(restart_path) => {
            info!("Restoring bond state from {:?}", restart_path);
            let snapshot = Checkpoint::read_from_path(restart_path)?;
            snapshot.verify_matches(&scene.types)?;
            let (result, bonds) =
                simulate::resume(&mut scene.system, snapshot, &config, &reporter)?;
            scene.bonds = bonds;
            result
        }
        None => simulate::run(
            &mut scene.system,
            &mut scene.bonds,
            &scene.types,
            &config,
            &reporter,
        )?,
    };

    print_summary(&result, &scene);

    if let Some(output) = &args.output {
        info!("Writing final particle state to {:?}", output);
        scene::save_particles(output, &scene.system, &scene.particle_ids)?;
        println!("✓ Final particle state written to: {}", output.display());
    }
    if let Some(checkpoint) = &args.checkpoint {
        println!("✓ Restart snapshot written to: {}", checkpoint.display());
    }

    Ok(())
}

fn print_summary(result: &SimulationResult, scene: &Scene) {
    println!("Simulation complete after {} step(s).", result.steps);
    println!(
        "  Bonds: {} total, {} broken",
        scene.bonds.len(),
        result.broken_bonds
    );
    println!("  Dissipated energy: {:.6e}", result.dissipated_energy);
    println!("  Generated heat:    {:.6e}", result.generated_heat);
}
