use crate::cli::InfoArgs;
use crate::error::Result;
use sinter::core::io::checkpoint::Checkpoint;
use tracing::info;

pub fn execute(args: InfoArgs) -> Result<()> {
    info!("Reading checkpoint from {:?}", &args.checkpoint);
    let snapshot = Checkpoint::read_from_path(&args.checkpoint)?;

    println!("Checkpoint: {}", args.checkpoint.display());
    println!(
        "  Settings: smooth={} heat={} heat_split={:?} min_separation={:.3e}",
        snapshot.settings.smooth,
        snapshot.settings.heat,
        snapshot.settings.heat_split,
        snapshot.settings.min_separation
    );

    println!("  Bond types: {}", snapshot.types.len());
    for (type_id, params) in snapshot.types.iter_sorted() {
        println!(
            "    type {}: model={:?} rule={} kr={} ks={} kt={} kb={} thermal={}",
            type_id,
            params.model,
            params.break_rule,
            params.kr,
            params.ks,
            params.kt,
            params.kb,
            if params.thermal.is_some() { "yes" } else { "no" }
        );
    }

    println!(
        "  Bonds: {} total, {} active, {} broken",
        snapshot.bonds.len(),
        snapshot.bonds.active_count(),
        snapshot.bonds.broken_count()
    );
    let peak = snapshot
        .bonds
        .iter()
        .map(|bond| bond.peak_metric())
        .fold(0.0, f64::max);
    println!("  Highest recorded load metric: {:.4}", peak);

    Ok(())
}
