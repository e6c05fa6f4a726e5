//! Property tests for code-word bit operations.

use cct::bits::{canonical, even_parity, has_opposite_pair, rotate_left};
use proptest::prelude::*;

proptest! {
    #[test]
    fn rotation_preserves_popcount(w in 0u64..(1 << 14), k in 0u32..14) {
        let r = rotate_left(w, k, 14);
        prop_assert_eq!(r.count_ones(), w.count_ones());
    }

    #[test]
    fn rotation_composes(w in 0u64..(1 << 14), a in 0u32..14, b in 0u32..14) {
        let lhs = rotate_left(rotate_left(w, a, 14), b, 14);
        let rhs = rotate_left(w, (a + b) % 14, 14);
        prop_assert_eq!(lhs, rhs);
    }

    #[test]
    fn canonical_is_rotation_invariant(w in 0u64..(1 << 14), k in 0u32..14) {
        prop_assert_eq!(canonical(rotate_left(w, k, 14), 14), canonical(w, 14));
    }

    #[test]
    fn canonical_bounds_all_rotations(w in 0u64..(1 << 14)) {
        let c = canonical(w, 14);
        for k in 0..14 {
            prop_assert!(c <= rotate_left(w, k, 14));
        }
    }

    #[test]
    fn parity_invariant_under_rotation(w in 0u64..(1 << 14), k in 0u32..14) {
        prop_assert_eq!(even_parity(rotate_left(w, k, 14)), even_parity(w));
    }

    #[test]
    fn opposite_pair_invariant_under_rotation(w in 0u64..(1 << 14), k in 0u32..14) {
        prop_assert_eq!(
            has_opposite_pair(rotate_left(w, k, 14), 14),
            has_opposite_pair(w, 14)
        );
    }
}
