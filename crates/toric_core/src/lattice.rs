//! Toric code lattice with bit-flip error tracking.
//!
//! The lattice is an L×L grid of unit cells with periodic boundaries. Each unit
//! cell carries two qubits, one on its left edge and one on its top edge, and a
//! single stabilizer whose value is the parity of the four qubits surrounding
//! the cell:
//!
//! ```text
//!            top(i, j)
//!          +-----------+
//! left(i,j)|  stab(i,j)| left(i, j+1)
//!          +-----------+
//!           top(i+1, j)
//! ```
//!
//! Only X errors are tracked, so every qubit is a single bit. Stabilizers are
//! derived data: they are recomputed from the qubit array on demand and cannot
//! be set directly.

use crate::QecError;
use crate::geometry::{Coord, toroidal_direction, toroidal_distance};
use bitvec::prelude::*;
use log::trace;
use rand::Rng;

/// Which edge of a unit cell a qubit sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Left = 0,
    Top = 1,
}

impl Orientation {
    /// Both orientations in storage order.
    pub const ALL: [Orientation; 2] = [Orientation::Left, Orientation::Top];
}

/// A qubit position as `(row, col, orientation)`.
pub type QubitPos = (usize, usize, Orientation);

/// Qubit and stabilizer state of one L×L toric code instance.
///
/// Both arrays are bit-packed and owned exclusively by the lattice. Qubits are
/// stored row-major with the two orientations of a unit cell adjacent; the
/// stabilizers are stored row-major. A value of 1 marks an X error on a qubit
/// or a violated stabilizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToricLattice {
    size: usize,
    qubits: BitVec<u64, Lsb0>,
    stabs: BitVec<u64, Lsb0>,
}

impl ToricLattice {
    /// Creates an error-free lattice of the given size.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLatticeSize` if `size` is zero.
    pub fn new(size: usize) -> Result<Self, QecError> {
        if size == 0 {
            return Err(QecError::InvalidLatticeSize { size });
        }
        Ok(Self {
            size,
            qubits: bitvec![u64, Lsb0; 0; 2 * size * size],
            stabs: bitvec![u64, Lsb0; 0; size * size],
        })
    }

    /// Lattice dimension L.
    pub fn size(&self) -> usize {
        self.size
    }

    fn qubit_index(&self, row: usize, col: usize, orientation: Orientation) -> usize {
        let row = row % self.size;
        let col = col % self.size;
        ((row * self.size + col) << 1) | orientation as usize
    }

    fn stab_index(&self, row: usize, col: usize) -> usize {
        (row % self.size) * self.size + col % self.size
    }

    /// Value of a single qubit. Coordinates are taken modulo L.
    pub fn qubit(&self, row: usize, col: usize, orientation: Orientation) -> bool {
        self.qubits[self.qubit_index(row, col, orientation)]
    }

    /// Value of a single stabilizer as of the last syndrome computation.
    pub fn stab(&self, row: usize, col: usize) -> bool {
        self.stabs[self.stab_index(row, col)]
    }

    /// Raw qubit bits (read-only).
    pub fn qubits(&self) -> &BitSlice<u64, Lsb0> {
        &self.qubits
    }

    /// Raw stabilizer bits (read-only), row-major.
    pub fn stabs(&self) -> &BitSlice<u64, Lsb0> {
        &self.stabs
    }

    /// Toggles a single qubit. Coordinates are taken modulo L.
    ///
    /// Stabilizers are not updated; call `recompute_syndrome` afterwards.
    pub fn flip_qubit(&mut self, row: usize, col: usize, orientation: Orientation) {
        let idx = self.qubit_index(row, col, orientation);
        let old = self.qubits[idx];
        self.qubits.set(idx, !old);
    }

    /// Applies independent bit-flip noise to every qubit.
    ///
    /// Each qubit is XORed with a Bernoulli(p) draw, visited in row-major order
    /// with the left qubit of a cell before its top qubit. Stabilizers become
    /// stale until the syndrome is recomputed.
    ///
    /// # Arguments
    ///
    /// * `p` - Physical error probability per qubit
    /// * `rng` - Random source for the Bernoulli draws
    ///
    /// # Errors
    ///
    /// Returns `InvalidProbability` if `p` lies outside [0, 1]. The qubits are
    /// left untouched in that case.
    pub fn apply_error_channel<R: Rng + ?Sized>(
        &mut self,
        p: f64,
        rng: &mut R,
    ) -> Result<(), QecError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(QecError::InvalidProbability { p });
        }
        for idx in 0..self.qubits.len() {
            if rng.gen_bool(p) {
                let old = self.qubits[idx];
                self.qubits.set(idx, !old);
            }
        }
        Ok(())
    }

    /// Recomputes every stabilizer from the current qubits.
    ///
    /// Stabilizer `(i, j)` is the parity of `left(i, j)`, `top(i, j)`,
    /// `left(i, j+1)` and `top(i+1, j)` with indices wrapped. This is a pure
    /// function of the qubit array, so repeated calls without intervening
    /// flips leave the stabilizers unchanged.
    pub fn recompute_syndrome(&mut self) {
        let l = self.size;
        for i in 0..l {
            for j in 0..l {
                let parity = self.qubit(i, j, Orientation::Left)
                    ^ self.qubit(i, j, Orientation::Top)
                    ^ self.qubit(i, (j + 1) % l, Orientation::Left)
                    ^ self.qubit((i + 1) % l, j, Orientation::Top);
                let idx = self.stab_index(i, j);
                self.stabs.set(idx, parity);
            }
        }
    }

    /// Noise followed by a perfect syndrome measurement.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProbability` if `p` lies outside [0, 1].
    pub fn step<R: Rng + ?Sized>(&mut self, p: f64, rng: &mut R) -> Result<(), QecError> {
        self.apply_error_channel(p, rng)?;
        self.recompute_syndrome();
        Ok(())
    }

    /// Lays down the correction chain joining unit cells `a` and `b`.
    ///
    /// The chain first travels along column `a.1` from row `a.0` to row `b.0`
    /// by flipping top qubits, then along row `b.0` from column `a.1` to
    /// column `b.1` by flipping left qubits. Each leg follows the shorter way
    /// around the torus, with ties going across the grid. When stepping
    /// backwards a leg starts on the qubit of the starting cell itself; when
    /// stepping forwards it starts one cell further on, since the shared edge
    /// between cells `k` and `k+1` belongs to cell `k+1`.
    ///
    /// Applying the chain toggles exactly the stabilizers at `a` and `b`.
    /// Coordinates are taken modulo L.
    pub fn apply_correction_chain(&mut self, a: Coord, b: Coord) {
        let l = self.size as isize;
        let a = (a.0 % self.size, a.1 % self.size);
        let b = (b.0 % self.size, b.1 % self.size);

        let dir_r = toroidal_direction(a.0, b.0, self.size);
        let dist_r = toroidal_distance(a.0, b.0, self.size) as isize;
        let r0 = if dir_r == -1 { a.0 as isize } else { a.0 as isize + 1 };
        for i in 0..dist_r {
            let r = (r0 + i * dir_r).rem_euclid(l) as usize;
            trace!("chain {:?}->{:?}: flip top({}, {})", a, b, r, a.1);
            self.flip_qubit(r, a.1, Orientation::Top);
        }

        let dir_c = toroidal_direction(a.1, b.1, self.size);
        let dist_c = toroidal_distance(a.1, b.1, self.size) as isize;
        let c0 = if dir_c == -1 { a.1 as isize } else { a.1 as isize + 1 };
        for i in 0..dist_c {
            let c = (c0 + i * dir_c).rem_euclid(l) as usize;
            trace!("chain {:?}->{:?}: flip left({}, {})", a, b, b.0, c);
            self.flip_qubit(b.0, c, Orientation::Left);
        }
    }

    /// Applies the correction chain of every matched pair.
    pub fn apply_matching(&mut self, pairs: &[(Coord, Coord)]) {
        for &(a, b) in pairs {
            self.apply_correction_chain(a, b);
        }
    }

    /// Whether the residual error wraps a non-trivial cycle of the torus.
    ///
    /// Counts the top qubits along row 0 and the left qubits along column 0;
    /// an odd count on either cut means a logical operator was applied. Only
    /// meaningful once corrections have cleared the syndrome, so that the
    /// remaining errors form closed loops.
    pub fn check_logical_error(&self) -> bool {
        let top_crossings = (0..self.size)
            .filter(|&c| self.qubit(0, c, Orientation::Top))
            .count();
        let left_crossings = (0..self.size)
            .filter(|&r| self.qubit(r, 0, Orientation::Left))
            .count();
        top_crossings % 2 == 1 || left_crossings % 2 == 1
    }

    /// Positions of violated stabilizers in row-major order.
    pub fn syndrome_positions(&self) -> Vec<Coord> {
        syndrome_positions(&self.stabs, self.size)
    }

    /// True when no stabilizer is violated.
    pub fn is_syndrome_clear(&self) -> bool {
        self.stabs.not_any()
    }

    /// Positions of all qubits carrying an error, in storage order.
    pub fn flipped_qubits(&self) -> Vec<QubitPos> {
        self.qubits
            .iter_ones()
            .map(|idx| {
                let cell = idx >> 1;
                let orientation = Orientation::ALL[idx & 1];
                (cell / self.size, cell % self.size, orientation)
            })
            .collect()
    }
}

/// Row-major positions of the set bits of an L×L stabilizer buffer.
pub(crate) fn syndrome_positions(stabs: &BitSlice<u64, Lsb0>, size: usize) -> Vec<Coord> {
    stabs
        .iter_ones()
        .map(|idx| (idx / size, idx % size))
        .collect()
}
