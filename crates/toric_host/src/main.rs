mod demo;
mod stats;
mod sweep;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(about = "Toric code logical error rate simulator with an MWPM decoder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a batch of trials at a single (L, p) point.
    Trials {
        #[arg(short = 'L', long, default_value_t = 8)]
        size: usize,
        #[arg(short, long, default_value_t = 0.1)]
        p: f64,
        #[arg(short = 'n', long, default_value_t = 5_000)]
        trials: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Run trials over a grid of lattice sizes and error rates.
    Sweep {
        #[arg(long, value_delimiter = ',', default_values_t = [4, 8, 12])]
        sizes: Vec<usize>,
        #[arg(long, default_value_t = 0.08)]
        p_min: f64,
        #[arg(long, default_value_t = 0.12)]
        p_max: f64,
        #[arg(long, default_value_t = 5)]
        steps: usize,
        #[arg(short = 'n', long, default_value_t = 5_000)]
        trials: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Run one seeded trial and log every stage.
    Demo {
        #[arg(short = 'L', long, default_value_t = 3)]
        size: usize,
        #[arg(short, long, default_value_t = 0.1)]
        p: f64,
        #[arg(long, default_value_t = 33)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Trials {
            size,
            p,
            trials,
            seed,
        } => {
            sweep::run_point(size, p, trials, seed)?;
        }
        Commands::Sweep {
            sizes,
            p_min,
            p_max,
            steps,
            trials,
            seed,
        } => {
            sweep::run_sweep(&sizes, p_min, p_max, steps, trials, seed)?;
        }
        Commands::Demo { size, p, seed } => {
            demo::run_demo(size, p, seed)?;
        }
    }
    Ok(())
}
