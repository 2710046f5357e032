use crate::stats::{ThresholdTable, linspace};
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;
use toric_core::matching::BlossomSolver;
use toric_core::trial::{TrialConfig, TrialSummary, run_trials};

fn run_config(config: &TrialConfig) -> Result<TrialSummary> {
    let start = Instant::now();
    let summary = run_trials(config, BlossomSolver::new)
        .with_context(|| format!("trials failed at L={} p={}", config.size, config.p))?;
    let seconds = start.elapsed().as_secs_f64();
    info!(
        "L={} p={:.4}: {}/{} logical failures in {:.3} s ({:.0} trials/s)",
        summary.size,
        summary.p,
        summary.logical_failures,
        summary.trials,
        seconds,
        summary.trials as f64 / seconds.max(f64::MIN_POSITIVE)
    );
    Ok(summary)
}

pub fn run_point(size: usize, p: f64, trials: usize, seed: u64) -> Result<()> {
    let config = TrialConfig::new(size, p, trials, seed)?;
    let mut table = ThresholdTable::new();
    table.update(run_config(&config)?);
    table.print_report();
    Ok(())
}

/// Runs every combination of lattice size and error rate.
///
/// Points run one after another; the trials within a point run in parallel.
/// Every point starts from the same base seed.
pub fn run_sweep(
    sizes: &[usize],
    p_min: f64,
    p_max: f64,
    steps: usize,
    trials: usize,
    seed: u64,
) -> Result<()> {
    let ps = linspace(p_min, p_max, steps);
    info!(
        "Sweeping L in {:?} over {} error rates, {} trials per point",
        sizes,
        ps.len(),
        trials
    );

    let start = Instant::now();
    let mut table = ThresholdTable::new();
    for &size in sizes {
        for &p in &ps {
            let config = TrialConfig::new(size, p, trials, seed)?;
            table.update(run_config(&config)?);
        }
    }

    table.print_report();
    info!(
        "{} trials in {:.3} s",
        table.total_trials(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
