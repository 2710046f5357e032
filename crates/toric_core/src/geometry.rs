//! Distances and directions on a periodic lattice.
//!
//! Coordinates live on a ring of length L where index L is identified with 0.
//! Along one axis there are always two ways to travel between two points:
//! directly across the grid, or around through the boundary. These helpers
//! pick the shorter one and report its length and orientation.

/// A unit-cell coordinate on the torus, as `(row, col)`.
pub type Coord = (usize, usize);

/// Shortest distance between two positions on a ring of length `l`.
///
/// The result is symmetric in its arguments and lies in `[0, l / 2]`. Inputs
/// equal to `l` are treated as the wrapped position 0.
///
/// # Arguments
///
/// * `x1` - First position
/// * `x2` - Second position
/// * `l` - Ring length (lattice size)
pub fn toroidal_distance(x1: usize, x2: usize, l: usize) -> usize {
    let adist = x1.abs_diff(x2) % l;
    adist.min(l - adist)
}

/// Step direction of the shortest path from `x1` to `x2` on a ring of length `l`.
///
/// Returns `+1` when moving towards increasing indices is shortest, `-1` when
/// decreasing is, and `0` when the positions coincide. If the path through the
/// boundary is strictly shorter the direction is flipped relative to the sign of
/// `x2 - x1`; on an exact tie the path across the grid wins.
///
/// A zero result means no movement is required. Callers must not feed it into
/// a loop that expects to step.
///
/// # Arguments
///
/// * `x1` - Start position
/// * `x2` - End position
/// * `l` - Ring length (lattice size)
pub fn toroidal_direction(x1: usize, x2: usize, l: usize) -> isize {
    let diff = x2 as isize - x1 as isize;
    let adiff = diff.abs();
    if adiff > l as isize - adiff {
        -diff.signum()
    } else {
        diff.signum()
    }
}

/// Manhattan distance between two unit cells on an `l`×`l` torus.
///
/// Sum of the toroidal distances along rows and along columns. This is the
/// length of the correction chain the lattice lays down between the two cells.
pub fn manhattan_toroidal_distance(a: Coord, b: Coord, l: usize) -> usize {
    toroidal_distance(a.0, b.0, l) + toroidal_distance(a.1, b.1, l)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_distance_wraps_through_boundary() {
        assert_eq!(toroidal_distance(1, 5, 5), 1);
    }

    #[test]
    fn test_distance_across_grid() {
        assert_eq!(toroidal_distance(3, 6, 8), 3);
    }

    #[test]
    fn test_distance_tied_paths() {
        assert_eq!(toroidal_distance(2, 4, 4), 2);
    }

    #[test]
    fn test_distance_same_position() {
        assert_eq!(toroidal_distance(3, 3, 7), 0);
    }

    #[test]
    fn test_direction_through_boundary() {
        assert_eq!(toroidal_direction(1, 5, 5), -1);
        assert_eq!(toroidal_direction(5, 1, 5), 1);
    }

    #[test]
    fn test_direction_across_grid() {
        assert_eq!(toroidal_direction(3, 6, 8), 1);
        assert_eq!(toroidal_direction(6, 3, 8), -1);
    }

    #[test]
    fn test_direction_tie_prefers_grid() {
        assert_eq!(toroidal_direction(2, 4, 4), 1);
        assert_eq!(toroidal_direction(4, 2, 4), -1);
        assert_eq!(toroidal_direction(0, 3, 6), 1);
    }

    #[test]
    fn test_direction_zero_when_coincident() {
        assert_eq!(toroidal_direction(2, 2, 5), 0);
    }

    #[test]
    fn test_manhattan_row_wrap() {
        assert_eq!(manhattan_toroidal_distance((1, 2), (5, 2), 5), 1);
    }

    #[test]
    fn test_manhattan_col_wrap() {
        assert_eq!(manhattan_toroidal_distance((2, 1), (2, 5), 5), 1);
    }

    #[test]
    fn test_manhattan_row_and_col_wrap() {
        assert_eq!(manhattan_toroidal_distance((1, 1), (5, 5), 5), 2);
    }

    #[test]
    fn test_manhattan_no_wrap() {
        assert_eq!(manhattan_toroidal_distance((2, 2), (3, 3), 5), 2);
    }

    proptest! {
        #[test]
        fn prop_distance_symmetric_and_bounded((l, a, b) in (1usize..40).prop_flat_map(|l| (Just(l), 0..l, 0..l))) {
            let d = toroidal_distance(a, b, l);
            prop_assert_eq!(d, toroidal_distance(b, a, l));
            prop_assert!(d <= l / 2);
        }

        #[test]
        fn prop_direction_steps_reach_target((l, a, b) in (1usize..40).prop_flat_map(|l| (Just(l), 0..l, 0..l))) {
            let dir = toroidal_direction(a, b, l);
            let dist = toroidal_distance(a, b, l) as isize;
            let end = (a as isize + dir * dist).rem_euclid(l as isize) as usize;
            prop_assert_eq!(end, b);
        }
    }
}
