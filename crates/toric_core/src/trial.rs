//! Monte Carlo trials of the toric code memory experiment.
//!
//! A trial injects bit-flip noise into a fresh lattice, measures the syndrome,
//! decodes it, applies every correction chain and checks whether the residual
//! error wraps the torus. Trials are independent: each owns its lattice and its
//! random stream, so a batch can be spread across a worker pool without any
//! shared mutable state.

use crate::QecError;
use crate::decoder::MwpmDecoder;
use crate::lattice::ToricLattice;
use crate::matching::MatchingSolver;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Parameters of a batch of trials at one (L, p) point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialConfig {
    /// Lattice size L.
    pub size: usize,
    /// Physical bit-flip probability per qubit.
    pub p: f64,
    /// Number of independent trials.
    pub trials: usize,
    /// Base seed; trial `i` uses `seed + i`.
    pub seed: u64,
}

impl TrialConfig {
    /// Validates and builds a trial configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLatticeSize` for a zero size and `InvalidProbability`
    /// for `p` outside [0, 1].
    pub fn new(size: usize, p: f64, trials: usize, seed: u64) -> Result<Self, QecError> {
        if size == 0 {
            return Err(QecError::InvalidLatticeSize { size });
        }
        if !(0.0..=1.0).contains(&p) {
            return Err(QecError::InvalidProbability { p });
        }
        Ok(Self {
            size,
            p,
            trials,
            seed,
        })
    }
}

/// What happened during a single trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialOutcome {
    /// Number of violated stabilizers after noise.
    pub syndrome_weight: usize,
    /// Number of correction chains applied.
    pub matched_pairs: usize,
    /// Whether the syndrome measured after correction was clear.
    pub residual_clear: bool,
    /// Whether the corrected lattice carries a logical error.
    pub logical_error: bool,
}

/// Aggregate result of a batch of trials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialSummary {
    /// Lattice size L.
    pub size: usize,
    /// Physical bit-flip probability per qubit.
    pub p: f64,
    /// Number of trials run.
    pub trials: usize,
    /// Number of trials that ended in a logical error.
    pub logical_failures: usize,
}

impl TrialSummary {
    /// Fraction of trials that ended in a logical error, 0 for an empty batch.
    pub fn logical_error_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.logical_failures as f64 / self.trials as f64
        }
    }

    /// Wald standard error of the logical error rate.
    pub fn standard_error(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        let rate = self.logical_error_rate();
        (rate * (1.0 - rate) / self.trials as f64).sqrt()
    }
}

/// Runs one noise, decode, correct and check cycle on a fresh lattice.
///
/// # Arguments
///
/// * `size` - Lattice size L
/// * `p` - Physical bit-flip probability per qubit
/// * `decoder` - Decoder used to pair up the syndrome
/// * `rng` - Random source for the noise
///
/// # Returns
///
/// The trial outcome, or the first error raised by any stage.
pub fn run_trial<S: MatchingSolver, R: Rng + ?Sized>(
    size: usize,
    p: f64,
    decoder: &mut MwpmDecoder<S>,
    rng: &mut R,
) -> Result<TrialOutcome, QecError> {
    let mut lattice = ToricLattice::new(size)?;
    lattice.step(p, rng)?;
    let syndrome_weight = lattice.syndrome_positions().len();

    let pairs = decoder.decode(lattice.stabs(), size)?;
    lattice.apply_matching(&pairs);
    lattice.recompute_syndrome();

    let residual_clear = lattice.is_syndrome_clear();
    if !residual_clear {
        warn!(
            "syndrome not cleared after correction (L={}, {} defects remain)",
            size,
            lattice.syndrome_positions().len()
        );
    }

    Ok(TrialOutcome {
        syndrome_weight,
        matched_pairs: pairs.len(),
        residual_clear,
        logical_error: lattice.check_logical_error(),
    })
}

/// Runs a batch of independent trials on the rayon pool.
///
/// Each worker builds its own decoder from `make_solver`, and trial `i` draws
/// from a private `StdRng` seeded with `config.seed + i` (wrapping), so the
/// summary does not depend on how trials are scheduled.
///
/// # Errors
///
/// Returns an error raised by any failing trial; the batch is abandoned.
pub fn run_trials<S, F>(config: &TrialConfig, make_solver: F) -> Result<TrialSummary, QecError>
where
    S: MatchingSolver + Send,
    F: Fn() -> S + Sync + Send,
{
    let logical_failures = (0..config.trials)
        .into_par_iter()
        .map_init(
            || MwpmDecoder::new(make_solver()),
            |decoder, i| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(i as u64));
                run_trial(config.size, config.p, decoder, &mut rng)
                    .map(|outcome| usize::from(outcome.logical_error))
            },
        )
        .try_reduce(|| 0, |a, b| Ok(a + b))?;

    debug!(
        "L={} p={} trials={} failures={}",
        config.size, config.p, config.trials, logical_failures
    );

    Ok(TrialSummary {
        size: config.size,
        p: config.p,
        trials: config.trials,
        logical_failures,
    })
}
