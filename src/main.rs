use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use spacetime_fabric::window::{self, ViewerOptions};
use spacetime_fabric::{SimulationConfig, ViewerError};

/// Interactive spacetime fabric: move the pointer to bend the lattice.
///
/// Keys: Space pauses, R resets the lattice, Escape quits.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON configuration preset; the built-in demo preset is used otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Seed for the per-point jitter
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn run(args: Args) -> Result<(), ViewerError> {
    let config = match &args.config {
        Some(path) => {
            log::info!("Loading preset {}", path.display());
            SimulationConfig::from_path(path)?
        }
        None => SimulationConfig::default(),
    };

    window::run(
        config,
        ViewerOptions {
            width: args.width,
            height: args.height,
            seed: args.seed,
            ..Default::default()
        },
    )
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
