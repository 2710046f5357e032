//! Logical error rate tables for threshold sweeps.
//!
//! Collects the summaries of every (L, p) point and prints them as a plain
//! text table, one row per point, grouped by lattice size.

use toric_core::trial::TrialSummary;

/// Accumulates trial summaries for reporting.
pub struct ThresholdTable {
    pub rows: Vec<TrialSummary>,
}

impl ThresholdTable {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Records the summary of one (L, p) point.
    pub fn update(&mut self, summary: TrialSummary) {
        self.rows.push(summary);
    }

    /// Total number of trials across all points.
    pub fn total_trials(&self) -> usize {
        self.rows.iter().map(|r| r.trials).sum()
    }

    /// Prints the table to stdout.
    ///
    /// Rows are ordered by lattice size, then by error rate, regardless of
    /// the order in which points completed.
    pub fn print_report(&self) {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| a.size.cmp(&b.size).then(a.p.total_cmp(&b.p)));

        println!("\nLogical Error Rates");
        println!(
            "{:>4}  {:>8}  {:>8}  {:>8}  {:>10}  {:>10}",
            "L", "p", "trials", "failures", "p_L", "stderr"
        );
        for row in &rows {
            println!(
                "{:>4}  {:>8.4}  {:>8}  {:>8}  {:>10.6}  {:>10.6}",
                row.size,
                row.p,
                row.trials,
                row.logical_failures,
                row.logical_error_rate(),
                row.standard_error()
            );
        }
    }
}

/// Error rates from `p_min` to `p_max` inclusive in `steps` even increments.
///
/// A single step yields just `p_min`; zero steps yield nothing.
pub fn linspace(p_min: f64, p_max: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![p_min],
        _ => {
            let delta = (p_max - p_min) / (steps - 1) as f64;
            (0..steps).map(|i| p_min + delta * i as f64).collect()
        }
    }
}
