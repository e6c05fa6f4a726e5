//! Codebook generation for circular coded targets.
//!
//! Implements the coding scheme of expired patent DE19733466A1: every
//! candidate word is reduced to its canonical rotation, then kept when it
//! has even parity, at least one diametrically opposite sector pair, and
//! (optionally) a required number of bit transitions. The resulting list
//! is rotation-invariant unique: no two codebook entries share any cyclic
//! rotation, which is what makes the printed targets decodable regardless
//! of in-plane orientation.

use crate::bits::{canonical, even_parity, has_opposite_pair, rising_transitions};
use crate::error::CodeError;
use crate::scheme::Scheme;

/// An ordered set of code words for a scheme. The target ID is the index
/// into this list.
#[derive(Debug, Clone)]
pub struct Codebook {
    scheme: Scheme,
    codes: Vec<u64>,
}

impl Codebook {
    /// Generate the full codebook for a scheme.
    ///
    /// Candidates are enumerated as `(i << 1) | 1` for `i` in
    /// `0..2^(bits-2)`: every canonical form is odd and has a clear top
    /// bit, so this covers all of them while skipping three quarters of
    /// the word space.
    pub fn generate(scheme: &Scheme) -> Codebook {
        let bits = scheme.bits();
        let mut codes: Vec<u64> = Vec::new();

        for i in 0..(1u64 << (bits - 2)) {
            let code = canonical((i << 1) | 1, bits);

            if !even_parity(code) || !has_opposite_pair(code, bits) {
                continue;
            }
            if let Some(want) = scheme.transitions() {
                if rising_transitions(code) != want {
                    continue;
                }
            }

            // Every canonical form first appears at its own candidate
            // value (canonical(c) <= c), so fresh codes arrive in
            // increasing order and only duplicates of earlier entries
            // need filtering.
            if codes.binary_search(&code).is_err() {
                codes.push(code);
            }
        }

        Codebook {
            scheme: scheme.clone(),
            codes,
        }
    }

    /// Build a codebook from caller-supplied codes, validating every
    /// scheme invariant including rotation-invariant uniqueness.
    pub fn from_codes(scheme: &Scheme, codes: Vec<u64>) -> Result<Codebook, CodeError> {
        let bits = scheme.bits();
        for &code in &codes {
            if code & !scheme.mask() != 0 {
                return Err(CodeError::OutOfRange { code, bits });
            }
            if !even_parity(code) {
                return Err(CodeError::OddParity(code));
            }
            if !has_opposite_pair(code, bits) {
                return Err(CodeError::NoOppositePair(code));
            }
            if let Some(want) = scheme.transitions() {
                let got = rising_transitions(code);
                if got != want {
                    return Err(CodeError::TransitionMismatch { code, got, want });
                }
            }
        }

        let book = Codebook {
            scheme: scheme.clone(),
            codes,
        };
        book.check_rotation_uniqueness()?;
        Ok(book)
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn codes(&self) -> &[u64] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Look up the code word for a target ID.
    pub fn code(&self, id: usize) -> Result<u64, CodeError> {
        self.codes.get(id).copied().ok_or(CodeError::InvalidId {
            id,
            count: self.codes.len(),
        })
    }

    /// Recover the ID for an observed bit pattern, in any rotation.
    ///
    /// This is the decoder-facing contract: a decoder that reads the data
    /// ring starting at an arbitrary sector feeds the raw pattern here.
    pub fn id_of(&self, pattern: u64) -> Option<usize> {
        let canon = canonical(pattern, self.scheme.bits());
        // Generated codebooks are sorted; validated ones may not be.
        self.codes.iter().position(|&c| c == canon)
    }

    /// Verify that no two codes share any cyclic rotation.
    ///
    /// Codes are compared by canonical form: two words collide under
    /// rotation exactly when their canonical forms are equal.
    pub fn check_rotation_uniqueness(&self) -> Result<(), CodeError> {
        let bits = self.scheme.bits();
        let mut canons: Vec<(u64, u64)> = self
            .codes
            .iter()
            .map(|&c| (canonical(c, bits), c))
            .collect();
        canons.sort_unstable();
        for pair in canons.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(CodeError::RotationCollision {
                    a: pair[0].1,
                    b: pair[1].1,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::rotate_left;
    use crate::scheme;

    #[test]
    fn generate_cct14_matches_reference() {
        // Reference values from the original DE19733466A1 generator.
        let book = Codebook::generate(&scheme::cct14());
        assert_eq!(book.len(), 516, "expected 516 codes for the 14-bit scheme");
        assert_eq!(&book.codes()[..5], &[0x81, 0x87, 0x8b, 0x8d, 0x93]);
        assert_eq!(book.codes()[100], 0x2a7);
        assert_eq!(book.codes()[250], 0x5f5);
        assert_eq!(*book.codes().last().unwrap(), 0x1fbf);
    }

    #[test]
    fn generate_smaller_schemes_match_reference() {
        assert_eq!(Codebook::generate(&scheme::cct8()).len(), 13);
        assert_eq!(Codebook::generate(&scheme::cct10()).len(), 42);
        assert_eq!(Codebook::generate(&scheme::cct12()).len(), 147);
    }

    #[test]
    fn generate_cct8_first_codes() {
        let book = Codebook::generate(&scheme::cct8());
        assert_eq!(&book.codes()[..5], &[0x11, 0x17, 0x1b, 0x1d, 0x27]);
        assert_eq!(*book.codes().last().unwrap(), 0x77);
    }

    #[test]
    fn generate_with_transition_filter() {
        let scheme = Scheme::new("cct14t4", 14, Some(4)).unwrap();
        let book = Codebook::generate(&scheme);
        assert_eq!(book.len(), 201);
        assert_eq!(&book.codes()[..3], &[0x95, 0xa5, 0xa9]);
    }

    #[test]
    fn generated_codes_are_canonical_and_sorted() {
        let book = Codebook::generate(&scheme::cct14());
        for pair in book.codes().windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for &code in book.codes() {
            assert_eq!(canonical(code, 14), code);
            assert!(even_parity(code));
            assert!(has_opposite_pair(code, 14));
        }
    }

    #[test]
    fn rotation_uniqueness_holds_for_full_set() {
        let book = Codebook::generate(&scheme::cct14());
        book.check_rotation_uniqueness().unwrap();
    }

    #[test]
    fn all_rotations_decode_to_same_id() {
        let book = Codebook::generate(&scheme::cct14());
        for id in [0usize, 77, 250, 515] {
            let code = book.code(id).unwrap();
            for k in 0..14 {
                assert_eq!(book.id_of(rotate_left(code, k, 14)), Some(id));
            }
        }
    }

    #[test]
    fn invalid_id_is_an_error() {
        let book = Codebook::generate(&scheme::cct14());
        assert!(matches!(
            book.code(516),
            Err(CodeError::InvalidId { id: 516, count: 516 })
        ));
    }

    #[test]
    fn from_codes_accepts_generated_set() {
        let generated = Codebook::generate(&scheme::cct12());
        let book = Codebook::from_codes(&scheme::cct12(), generated.codes().to_vec()).unwrap();
        assert_eq!(book.len(), 147);
    }

    #[test]
    fn from_codes_rejects_rotation_collision() {
        // 0x87 rotated left by 3 is a different word with the same orbit.
        let rotated = rotate_left(0x87, 3, 14);
        assert_ne!(rotated, 0x87);
        let err = Codebook::from_codes(&scheme::cct14(), vec![0x87, rotated]).unwrap_err();
        assert!(matches!(err, CodeError::RotationCollision { .. }));
    }

    #[test]
    fn from_codes_rejects_odd_parity() {
        // 0b111 has odd parity
        let err = Codebook::from_codes(&scheme::cct14(), vec![0b111]).unwrap_err();
        assert!(matches!(err, CodeError::OddParity(0b111)));
    }

    #[test]
    fn from_codes_rejects_out_of_range() {
        let err = Codebook::from_codes(&scheme::cct14(), vec![1 << 20]).unwrap_err();
        assert!(matches!(err, CodeError::OutOfRange { bits: 14, .. }));
    }

    #[test]
    fn unknown_pattern_has_no_id() {
        let book = Codebook::generate(&scheme::cct14());
        // 0b11 has odd parity and can never be a codebook entry.
        assert_eq!(book.id_of(0b11), None);
    }
}
