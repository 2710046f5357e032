//! Core toric code simulation and decoding.
//!
//! This crate provides the lattice state of an L×L toric code under independent
//! bit-flip noise, the periodic-boundary geometry used to measure distances on
//! the torus, and a minimum-weight perfect matching decoder that turns a
//! syndrome into correction chains. The trial module ties these together into
//! the noise, decode, correct and check cycle used for logical error rate
//! estimation.

/// Periodic-boundary geometry primitives.
///
/// Pure functions for toroidal distance and direction along one axis, and the
/// two-dimensional Manhattan distance on the torus. Used by the decoder to
/// weight the matching graph and by the lattice to lay out correction chains.
pub mod geometry;

/// Weighted matching graph over syndrome positions.
///
/// Complete graph whose vertices are violated stabilizers and whose edge
/// weights are toroidal Manhattan distances.
pub mod graph;

/// Toric code lattice state.
///
/// Owns the qubit and stabilizer bit arrays for one L×L instance. Errors are
/// injected and corrections applied through this type only; everything else
/// sees a read-only snapshot.
pub mod lattice;

/// Minimum-weight perfect matching capability.
///
/// Defines the pluggable solver interface consumed by the decoder together with
/// a blossom-backed implementation.
pub mod matching;

/// Syndrome decoder.
///
/// Reduces the set of violated stabilizers to a complete weighted graph and
/// asks the matching solver for a minimum-weight pairing.
pub mod decoder;

/// Trial pipeline and parallel trial runner.
///
/// Runs the inject, measure, decode, correct and check cycle for a single
/// lattice and fans independent trials out over a worker pool.
pub mod trial;

use thiserror::Error;

/// Error types returned by toric code operations.
///
/// Every failure aborts the current trial and is surfaced to the caller. None
/// of these are retried: all operations are deterministic given their inputs
/// and the state of the random stream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QecError {
    /// The requested lattice size is zero.
    #[error("invalid lattice size {size}: must be at least 1")]
    InvalidLatticeSize { size: usize },

    /// An error probability outside [0, 1] (or NaN) was supplied.
    ///
    /// Raised before any qubit is touched, so the lattice is left unchanged.
    #[error("invalid error probability {p}: must lie in [0, 1]")]
    InvalidProbability { p: f64 },

    /// The syndrome handed to the decoder has an odd number of defects.
    ///
    /// Every bit flip toggles exactly two stabilizers, so a syndrome measured
    /// from a real qubit configuration always has even weight. Seeing this
    /// means the syndrome buffer was corrupted upstream.
    #[error("syndrome has odd weight {count}; no perfect matching exists")]
    OddSyndromeCount { count: usize },

    /// The stabilizer buffer does not describe an L×L lattice.
    #[error("stabilizer buffer holds {actual} bits, expected {expected}")]
    SyndromeSizeMismatch { expected: usize, actual: usize },

    /// The matching solver could not produce a perfect matching.
    #[error("matching solver failed: {0}")]
    MatchingSolverFailure(String),
}
