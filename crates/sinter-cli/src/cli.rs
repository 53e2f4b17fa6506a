use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The sinter developers",
    version,
    about = "sinter CLI - A command-line interface for sinter, a bonded-particle mechanics engine for breakable bonds with elastic, damping, and thermal response.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a bonded-particle simulation from a scene directory.
    Run(RunArgs),
    /// Inspect a restart checkpoint and print its contents.
    Info(InfoArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    // --- Core Arguments ---
    /// Path to the scene directory holding particles.csv, bonds.csv, and types.toml.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub scene_dir: PathBuf,

    /// Number of integration steps to advance.
    #[arg(short = 'n', long, required = true, value_name = "INT")]
    pub steps: u64,

    /// Integration timestep.
    #[arg(short = 't', long, required = true, value_name = "FLOAT")]
    pub dt: f64,

    /// Write the final particle state to this CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    // --- Checkpointing ---
    /// Write restart snapshots to this path during and after the run.
    #[arg(long, value_name = "PATH")]
    pub checkpoint: Option<PathBuf>,

    /// Snapshot every N steps; 0 snapshots only at the end of the run.
    #[arg(long, value_name = "INT", default_value_t = 0, requires = "checkpoint")]
    pub checkpoint_every: u64,

    /// Resume bond state from a restart snapshot instead of bonds.csv.
    #[arg(long, value_name = "PATH")]
    pub restart: Option<PathBuf>,

    // --- Engine Overrides ---
    /// Soften elastic response as bonds approach their failure load.
    #[arg(long)]
    pub smooth: bool,

    /// Enable heat generation and conduction along bonds.
    #[arg(long)]
    pub heat: bool,

    /// Fraction of generated heat deposited on the first bond partner.
    /// Defaults to an even split.
    #[arg(long, value_name = "FLOAT")]
    pub heat_share: Option<f64>,

    /// Lower clamp applied to bonded separations during evaluation.
    #[arg(long, value_name = "FLOAT")]
    pub min_separation: Option<f64>,
}

/// Arguments for the `info` subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to the checkpoint file to inspect.
    #[arg(required = true, value_name = "PATH")]
    pub checkpoint: PathBuf,
}
