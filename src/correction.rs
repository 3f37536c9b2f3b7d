//! Exact rational correction factor V(z).
//!
//! V(z) = prod_{5 <= ell <= z, ell prime} (ell - 2)/(ell - 1), with
//! z = floor(sqrt(X)) + 1. The primes 2 and 3 never enter the product: the
//! derivation of the bound excludes the residue class behind the modulus-3
//! obstruction (the mod-3 gate), and 2 is outside the sieve range by
//! construction.
//!
//! The product is kept as an exact ratio of big integers; conversion to a
//! fixed-precision decimal happens only at the assembly point, under an
//! explicit rounding direction.

use num_bigint::BigInt;
use num_integer::Roots;
use num_rational::BigRational;
use num_traits::One;

use crate::sieve::prime_table;

/// Compute z = floor(sqrt(X)) + 1 and the exact product V(z).
///
/// The iteration runs over primes in ascending order. Order does not change
/// the product, but it is fixed so that published certificates reproduce
/// digit for digit.
pub fn correction_factor(x: u64) -> (u64, BigRational) {
    let z = x.sqrt() + 1;
    let table = prime_table(z);
    let mut v = BigRational::one();
    for ell in 5..=z {
        if table[ell as usize] {
            let term = BigRational::new(BigInt::from(ell - 2), BigInt::from(ell - 1));
            v = v * term;
        }
    }
    (z, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_prime_range_gives_identity() {
        // X = 9 gives z = 4; no primes in [5, 4], so V = 1 exactly.
        let (z, v) = correction_factor(9);
        assert_eq!(z, 4);
        assert!(v.is_one());
    }

    #[test]
    fn test_single_prime() {
        // X = 25 gives z = 6; the only prime in [5, 6] is 5, so V = 3/4.
        let (z, v) = correction_factor(25);
        assert_eq!(z, 6);
        assert_eq!(v, BigRational::new(BigInt::from(3), BigInt::from(4)));
    }

    #[test]
    fn test_three_primes() {
        // X = 100 gives z = 11; primes 5, 7, 11 contribute
        // (3/4)(5/6)(9/10) = 9/16.
        let (z, v) = correction_factor(100);
        assert_eq!(z, 11);
        assert_eq!(v, BigRational::new(BigInt::from(9), BigInt::from(16)));
    }

    #[test]
    fn test_mod3_gate_excludes_three() {
        // z = 4 covers primes 2 and 3 only; neither may contribute.
        let (_, v) = correction_factor(9);
        assert!(v.is_one());
    }

    #[test]
    fn test_deterministic() {
        let (_, a) = correction_factor(123_456);
        let (_, b) = correction_factor(123_456);
        assert_eq!(a, b);
    }
}
