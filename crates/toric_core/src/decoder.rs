use crate::QecError;
use crate::geometry::Coord;
use crate::graph::MatchingGraph;
use crate::lattice::syndrome_positions;
use crate::matching::{BlossomSolver, MatchingSolver};
use bitvec::prelude::*;
use log::debug;

/// Minimum-weight perfect matching decoder for the toric code.
///
/// Pairs up violated stabilizers so that the summed toroidal distance between
/// partners is minimal. The actual matching is delegated to a pluggable
/// [`MatchingSolver`].
pub struct MwpmDecoder<S: MatchingSolver = BlossomSolver> {
    solver: S,
}

impl Default for MwpmDecoder<BlossomSolver> {
    fn default() -> Self {
        Self::new(BlossomSolver::new())
    }
}

impl<S: MatchingSolver> MwpmDecoder<S> {
    /// Creates a decoder that delegates matching to `solver`.
    pub fn new(solver: S) -> Self {
        Self { solver }
    }

    /// Builds the complete distance graph over the syndrome of `stabs`.
    ///
    /// Vertices are the violated stabilizers in row-major order.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLatticeSize` for a zero size and `SyndromeSizeMismatch`
    /// if `stabs` does not hold exactly `size * size` bits.
    pub fn build_graph(
        stabs: &BitSlice<u64, Lsb0>,
        size: usize,
    ) -> Result<MatchingGraph, QecError> {
        if size == 0 {
            return Err(QecError::InvalidLatticeSize { size });
        }
        if stabs.len() != size * size {
            return Err(QecError::SyndromeSizeMismatch {
                expected: size * size,
                actual: stabs.len(),
            });
        }
        let positions = syndrome_positions(stabs, size);
        Ok(MatchingGraph::complete(&positions, size))
    }

    /// Decodes a stabilizer measurement into matched pairs of unit cells.
    ///
    /// Each returned pair is to be joined by a correction chain. An empty
    /// syndrome yields an empty matching.
    ///
    /// # Arguments
    ///
    /// * `stabs` - Row-major stabilizer bits of an L×L lattice
    /// * `size` - Lattice size L
    ///
    /// # Errors
    ///
    /// Returns `OddSyndromeCount` if the syndrome has odd weight, and
    /// `MatchingSolverFailure` if the solver fails or hands back something
    /// other than a perfect matching.
    pub fn decode(
        &mut self,
        stabs: &BitSlice<u64, Lsb0>,
        size: usize,
    ) -> Result<Vec<(Coord, Coord)>, QecError> {
        let graph = Self::build_graph(stabs, size)?;
        let count = graph.num_nodes();
        if count % 2 == 1 {
            return Err(QecError::OddSyndromeCount { count });
        }

        let pairs = self.solver.minimum_weight_perfect_matching(&graph)?;
        check_perfect(&pairs, count)?;
        debug!(
            "decoded {} defects into {} pairs (weight {:?})",
            count,
            pairs.len(),
            graph.matching_weight(&pairs)
        );

        Ok(pairs
            .into_iter()
            .map(|(u, v)| (graph.vertex(u), graph.vertex(v)))
            .collect())
    }
}

fn check_perfect(pairs: &[(usize, usize)], num_nodes: usize) -> Result<(), QecError> {
    let mut covered = vec![false; num_nodes];
    for &(u, v) in pairs {
        for w in [u, v] {
            if w >= num_nodes || covered[w] {
                return Err(QecError::MatchingSolverFailure(format!(
                    "vertex {} matched twice or out of range",
                    w
                )));
            }
            covered[w] = true;
        }
    }
    if let Some(missing) = covered.iter().position(|&c| !c) {
        return Err(QecError::MatchingSolverFailure(format!(
            "vertex {} left unmatched",
            missing
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::manhattan_toroidal_distance;
    use crate::lattice::{Orientation, ToricLattice};
    use crate::matching::tests::ExhaustiveSolver;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct FixedSolver(Vec<(usize, usize)>);

    impl MatchingSolver for FixedSolver {
        fn minimum_weight_perfect_matching(
            &mut self,
            _graph: &MatchingGraph,
        ) -> Result<Vec<(usize, usize)>, QecError> {
            Ok(self.0.clone())
        }
    }

    fn known_pattern() -> ToricLattice {
        let mut lat = ToricLattice::new(3).unwrap();
        lat.flip_qubit(1, 0, Orientation::Top);
        lat.flip_qubit(1, 2, Orientation::Left);
        lat.flip_qubit(2, 1, Orientation::Top);
        lat.recompute_syndrome();
        lat
    }

    fn pair_weight(pairs: &[(Coord, Coord)], size: usize) -> usize {
        pairs
            .iter()
            .map(|&(a, b)| manhattan_toroidal_distance(a, b, size))
            .sum()
    }

    #[test]
    fn test_empty_syndrome() {
        let lat = ToricLattice::new(5).unwrap();
        let pairs = MwpmDecoder::default().decode(lat.stabs(), 5).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_odd_syndrome_rejected() {
        let mut stabs = bitvec![u64, Lsb0; 0; 9];
        stabs.set(4, true);
        let err = MwpmDecoder::default().decode(&stabs, 3).unwrap_err();
        assert_eq!(err, QecError::OddSyndromeCount { count: 1 });
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let stabs = bitvec![u64, Lsb0; 0; 8];
        let err = MwpmDecoder::default().decode(&stabs, 3).unwrap_err();
        assert_eq!(
            err,
            QecError::SyndromeSizeMismatch {
                expected: 9,
                actual: 8
            }
        );
    }

    #[test]
    fn test_zero_size_rejected() {
        let stabs = BitVec::<u64, Lsb0>::new();
        let err = MwpmDecoder::default().decode(&stabs, 0).unwrap_err();
        assert_eq!(err, QecError::InvalidLatticeSize { size: 0 });
    }

    #[test]
    fn test_partial_matching_rejected() {
        let lat = known_pattern();
        let mut decoder = MwpmDecoder::new(FixedSolver(vec![(0, 1)]));
        let err = decoder.decode(lat.stabs(), 3).unwrap_err();
        assert!(matches!(err, QecError::MatchingSolverFailure(_)));
    }

    #[test]
    fn test_known_pattern_round_trip() {
        let mut lat = known_pattern();
        let pairs = MwpmDecoder::default().decode(lat.stabs(), 3).unwrap();
        assert_eq!(pairs.len(), 2);
        // Two matchings tie at weight 3 on this syndrome.
        assert_eq!(pair_weight(&pairs, 3), 3);

        lat.apply_matching(&pairs);
        lat.recompute_syndrome();
        assert!(lat.is_syndrome_clear());
    }

    #[test]
    fn test_known_pattern_fixed_matching() {
        // (0,0)-(1,0) and (1,2)-(2,1), given as vertex indices in row-major order.
        let mut lat = known_pattern();
        let mut decoder = MwpmDecoder::new(FixedSolver(vec![(0, 1), (2, 3)]));
        let pairs = decoder.decode(lat.stabs(), 3).unwrap();
        assert_eq!(pairs, vec![((0, 0), (1, 0)), ((1, 2), (2, 1))]);

        lat.apply_matching(&pairs);
        lat.recompute_syndrome();
        assert!(lat.is_syndrome_clear());
        assert!(!lat.check_logical_error());
    }

    #[test]
    fn test_seeded_noise_round_trip() {
        let mut lat = ToricLattice::new(3).unwrap();
        lat.step(0.1, &mut StdRng::seed_from_u64(33)).unwrap();
        assert_eq!(
            lat.flipped_qubits(),
            vec![(1, 1, Orientation::Left), (2, 0, Orientation::Left)]
        );

        // Only one matching has weight 2 on this syndrome.
        let pairs = MwpmDecoder::default().decode(lat.stabs(), 3).unwrap();
        let mut normalized: Vec<(Coord, Coord)> = pairs
            .iter()
            .map(|&(a, b)| if a <= b { (a, b) } else { (b, a) })
            .collect();
        normalized.sort();
        assert_eq!(normalized, vec![((1, 0), (1, 1)), ((2, 0), (2, 2))]);
        assert_eq!(pair_weight(&pairs, 3), 2);

        lat.apply_matching(&pairs);
        lat.recompute_syndrome();
        assert!(lat.is_syndrome_clear());
        assert!(lat.flipped_qubits().is_empty());
        assert!(!lat.check_logical_error());
    }

    #[test]
    fn test_half_lattice_pairs() {
        // Defects separated by L/2 on both axes.
        let mut lat = ToricLattice::new(4).unwrap();
        lat.apply_correction_chain((0, 0), (2, 2));
        lat.apply_correction_chain((1, 3), (3, 1));
        lat.recompute_syndrome();
        let pairs = MwpmDecoder::default().decode(lat.stabs(), 4).unwrap();
        assert_eq!(pairs.len(), 2);

        lat.apply_matching(&pairs);
        lat.recompute_syndrome();
        assert!(lat.is_syndrome_clear());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_decode_then_correct_clears_syndrome(l in 2usize..7, seed in any::<u64>(), p in 0.0f64..0.2) {
            let mut lat = ToricLattice::new(l).unwrap();
            lat.step(p, &mut StdRng::seed_from_u64(seed)).unwrap();
            let pairs = MwpmDecoder::default().decode(lat.stabs(), l).unwrap();
            lat.apply_matching(&pairs);
            lat.recompute_syndrome();
            prop_assert!(lat.is_syndrome_clear());
        }

        #[test]
        fn prop_decode_is_minimum_weight(l in 2usize..6, seed in any::<u64>(), p in 0.0f64..0.15) {
            let mut lat = ToricLattice::new(l).unwrap();
            lat.step(p, &mut StdRng::seed_from_u64(seed)).unwrap();
            prop_assume!(lat.syndrome_positions().len() <= 12);
            let blossom = MwpmDecoder::default().decode(lat.stabs(), l).unwrap();
            let reference = MwpmDecoder::new(ExhaustiveSolver).decode(lat.stabs(), l).unwrap();
            prop_assert_eq!(pair_weight(&blossom, l), pair_weight(&reference, l));
        }
    }
}
