//! CLI frontend for the sprinkler simulation.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};

#[derive(Parser)]
#[command(
    name = "sprinkler",
    about = "Sprinkler footprints and garden watering scenarios",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the footprint of a sprinkler tile
    Footprint {
        /// Tile database (JSON)
        tiles: PathBuf,

        /// Tile code to inspect
        code: String,

        /// Placement variant (bit 10 swaps the axes)
        #[arg(short, long, default_value = "0")]
        variant: u32,
    },

    /// Run a garden scenario and report what each sprinkler watered
    Simulate {
        /// Scenario file (JSON)
        scenario: PathBuf,

        /// Number of ticks to simulate
        #[arg(short, long, default_value = "100")]
        ticks: u64,

        /// RNG seed for deterministic simulation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// In-world seconds per tick
        #[arg(long, default_value = "1.0")]
        step: f64,

        /// Seconds the garden stays unloaded halfway through the run
        #[arg(long)]
        skip: Option<f64>,

        /// Write the world save to this file after the run
        #[arg(long)]
        save: Option<PathBuf>,

        /// Show all events (not just summary)
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() {
    Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Footprint {
            tiles,
            code,
            variant,
        } => commands::footprint::run(&tiles, &code, variant),
        Commands::Simulate {
            scenario,
            ticks,
            seed,
            step,
            skip,
            save,
            verbose,
        } => commands::simulate::run(
            &scenario,
            &commands::simulate::Options {
                ticks,
                seed,
                step,
                skip,
                save,
                verbose,
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
