use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    name = "lapsim",
    about = "A lap-based race simulator written in Rust"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug logging (retirements, lap leaders), RUST_LOG takes precedence
    #[clap(short, long)]
    pub debug: bool,

    /// Print the lap time and race time tables (single simulation run only)
    #[clap(short, long)]
    pub laptimes: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set number of simulation runs (run i uses the seed base_seed + i)
    #[clap(short, long, default_value = "1")]
    pub no_sim_runs: u32,

    /// Set path to the simulation parameter file
    #[clap(parse(from_os_str), short, long)]
    pub parfile_path: PathBuf,

    /// Set the base seed of the random number generator (drawn from entropy if not set)
    #[clap(short, long)]
    pub seed: Option<u64>,

    /// Set path of a CSV file the lap records are written to (single simulation run only)
    #[clap(parse(from_os_str), short, long)]
    pub csv_path: Option<PathBuf>,
}
