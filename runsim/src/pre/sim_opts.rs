use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    name = "hurdle-run",
    about = "A keyboard-paced hurdle run simulator written in Rust"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug printing (only for non-live mode)
    #[clap(short, long)]
    pub debug: bool,

    /// Run the race in real time and print render updates to the terminal
    #[clap(short, long)]
    pub live: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set number of simulation runs (ignored in live mode)
    #[clap(short, long, default_value = "1")]
    pub no_sim_runs: u32,

    /// Set path to the simulation parameter file (OPTIONAL: if not set, uses a built-in
    /// exhibition setup)
    #[clap(short, long)]
    pub parfile_path: Option<PathBuf>,

    /// Set path to a key-script replay file (OPTIONAL: if not set, an auto-pacer drives
    /// the race)
    #[clap(short, long)]
    pub keyscript_path: Option<PathBuf>,

    /// Select the participant by name (defaults to the first registry entry)
    #[clap(long)]
    pub participant: Option<String>,

    /// Set real-time factor (only relevant in live mode)
    #[clap(short, long, default_value = "1.0")]
    pub realtime_factor: f64,

    /// Set simulation timestep size in seconds, should be in the range [0.001, 1.0]
    #[clap(short, long, default_value = "0.05")]
    pub timestep_size: f64,

    /// Set auto-pacer cadence in presses per second
    #[clap(short, long, default_value = "5.0")]
    pub cadence: f64,
}
