//! Directed-rounding evaluation of the analytic bounds.
//!
//! Every transcendental quantity here feeds the final bound with a known
//! sign, so each is rounded in the one direction that cannot inflate the
//! result. The direction travels in the *type* of the value
//! ([`DecDown`] / [`DecUp`]), not in any ambient context: a down-rounded
//! value cannot leak into a position that needs an up-rounded one without an
//! explicit conversion at the assembly point.
//!
//! Rounding discipline for a quotient: a lower bound needs the numerator
//! rounded down and the denominator rounded *up*, and vice versa. The
//! logarithm is therefore evaluated in the direction opposite to the
//! quantity it divides.

use dashu_float::round::mode::{Down, Up};
use dashu_float::round::Round;
use dashu_float::FBig;
use dashu_int::UBig;
use num_bigint::BigUint;
use num_rational::BigRational;
use num_traits::Signed;

use crate::CertifyError;

/// Decimal rounded toward negative infinity on every operation.
pub type DecDown = FBig<Down, 10>;
/// Decimal rounded toward positive infinity on every operation.
pub type DecUp = FBig<Up, 10>;

/// Working precision in decimal digits. Large enough that accumulated
/// rounding across log, power, and division cannot erode the sign of terms
/// many orders of magnitude apart.
pub const WORKING_PRECISION: usize = 80;

/// Ceiling for precision escalation when a sign refuses to resolve.
pub const MAX_PRECISION: usize = 1280;

/// Exact integer as a directed decimal at the given precision.
pub fn dec_from_u64<R: Round>(x: u64, precision: usize) -> FBig<R, 10> {
    FBig::<R, 10>::from(UBig::from(x))
        .with_precision(precision)
        .value()
}

/// Parse a string-encoded decimal constant at the given precision.
pub fn parse_constant<R: Round>(c: &str, precision: usize) -> Result<FBig<R, 10>, CertifyError> {
    FBig::from_str_native(c)
        .map(|d| d.with_precision(precision).value())
        .map_err(|_| CertifyError::InvalidConstant(c.to_string()))
}

/// Convert an exact non-negative rational into a directed decimal. The one
/// sanctioned crossing from the exact domain into fixed precision: numerator
/// and denominator convert exactly, the division rounds in R.
pub fn rational_to_dec<R: Round>(v: &BigRational, precision: usize) -> FBig<R, 10> {
    assert!(!v.is_negative(), "directed conversion expects a non-negative rational");
    let numer = FBig::<R, 10>::from(ubig_from(v.numer().magnitude()))
        .with_precision(precision)
        .value();
    let denom = FBig::<R, 10>::from(ubig_from(v.denom().magnitude()))
        .with_precision(precision)
        .value();
    numer / denom
}

fn ubig_from(n: &BigUint) -> UBig {
    UBig::from_le_bytes(&n.to_bytes_le())
}

/// ln x, never below the true value.
pub fn ln_above(x: u64, precision: usize) -> DecUp {
    assert!(x > 0, "logarithm requires a positive argument");
    dec_from_u64::<Up>(x, precision).ln()
}

/// ln x, never above the true value.
pub fn ln_below(x: u64, precision: usize) -> DecDown {
    assert!(x > 0, "logarithm requires a positive argument");
    dec_from_u64::<Down>(x, precision).ln()
}

/// Lower bound for li(X) via X / ln X, rounded toward negative infinity.
///
/// The log is taken from above so the quotient can only land below the true
/// value of X / ln X; at any working precision the result converges to the
/// truth from below, never overshooting.
pub fn li_lower(x: u64, precision: usize) -> DecDown {
    assert!(x > 1, "X / ln X requires X > 1");
    let l = ln_above(x, precision).with_rounding::<Down>();
    dec_from_u64::<Down>(x, precision) / l
}

/// Upper counterpart of [`li_lower`]: X / ln X rounded toward positive
/// infinity, with the log taken from below.
pub fn li_upper(x: u64, precision: usize) -> DecUp {
    assert!(x > 1, "X / ln X requires X > 1");
    let l = ln_below(x, precision).with_rounding::<Up>();
    dec_from_u64::<Up>(x, precision) / l
}

/// Upper bound for the BV penalty C * X / (ln X)^A, rounded toward positive
/// infinity.
///
/// (ln X)^A is assembled from a below-truth log by repeated multiplication,
/// so the denominator is a lower bound and the quotient an upper bound.
pub fn bv_upper(x: u64, a: usize, c: &str, precision: usize) -> Result<DecUp, CertifyError> {
    assert!(x > 1, "BV penalty requires X > 1");
    let c = parse_constant::<Up>(c, precision)?;
    let la = pow(ln_below(x, precision), a).with_rounding::<Up>();
    Ok(c * dec_from_u64::<Up>(x, precision) / la)
}

/// Lower counterpart of [`bv_upper`]: C * X / (ln X)^A rounded toward
/// negative infinity, with the power taken from above.
pub fn bv_lower(x: u64, a: usize, c: &str, precision: usize) -> Result<DecDown, CertifyError> {
    assert!(x > 1, "BV penalty requires X > 1");
    let c = parse_constant::<Down>(c, precision)?;
    let la = pow(ln_above(x, precision), a).with_rounding::<Down>();
    Ok(c * dec_from_u64::<Down>(x, precision) / la)
}

/// base^exp by repeated multiplication. For a positive base each partial
/// product rounds in R, so the result is itself R-directed relative to the
/// true power.
pub fn pow<R: Round>(base: FBig<R, 10>, exp: usize) -> FBig<R, 10> {
    assert!(exp >= 1, "exponent must be at least 1");
    let mut acc = base.clone();
    for _ in 1..exp {
        acc = acc * &base;
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn test_li_lower_brackets_known_value() {
        // 100000 / ln(100000) = 8685.889...
        let li = li_lower(100_000, WORKING_PRECISION);
        assert!(li > dec_from_u64::<Down>(8_685, WORKING_PRECISION));
        assert!(li < dec_from_u64::<Down>(8_686, WORKING_PRECISION));
    }

    #[test]
    fn test_li_lower_monotone_in_precision() {
        // Converges from below: more digits can only move the bound up.
        let mut prev = li_lower(100_000, 20);
        for precision in [40, 80, 160] {
            let next = li_lower(100_000, precision);
            assert!(prev <= next, "li_lower regressed at precision {}", precision);
            prev = next;
        }
    }

    #[test]
    fn test_li_sandwich() {
        let lower = li_lower(100_000, WORKING_PRECISION);
        let upper = li_upper(100_000, WORKING_PRECISION);
        assert!(lower.clone().with_rounding::<Up>() <= upper);
    }

    #[test]
    fn test_bv_upper_brackets_known_value() {
        // 5 * 100000 / ln(100000)^3 = 327.64...
        let bv = bv_upper(100_000, 3, "5.0", WORKING_PRECISION).unwrap();
        assert!(bv > dec_from_u64::<Up>(327, WORKING_PRECISION));
        assert!(bv < dec_from_u64::<Up>(328, WORKING_PRECISION));
    }

    #[test]
    fn test_bv_upper_monotone_in_precision() {
        // Converges from above: more digits can only move the bound down.
        let mut prev = bv_upper(100_000, 3, "5.0", 20).unwrap();
        for precision in [40, 80, 160] {
            let next = bv_upper(100_000, 3, "5.0", precision).unwrap();
            assert!(next <= prev, "bv_upper grew at precision {}", precision);
            prev = next;
        }
    }

    #[test]
    fn test_bv_sandwich() {
        let lower = bv_lower(100_000, 3, "5.0", WORKING_PRECISION).unwrap();
        let upper = bv_upper(100_000, 3, "5.0", WORKING_PRECISION).unwrap();
        assert!(lower.with_rounding::<Up>() <= upper);
    }

    #[test]
    fn test_parse_constant_rejects_garbage() {
        let err = parse_constant::<Up>("not-a-decimal", WORKING_PRECISION);
        assert!(matches!(err, Err(CertifyError::InvalidConstant(_))));
    }

    #[test]
    fn test_rational_conversion_directions() {
        // 1/3 is not exactly representable: the two directions must straddle it.
        let third = BigRational::new(BigInt::from(1), BigInt::from(3));
        let down = rational_to_dec::<Down>(&third, WORKING_PRECISION);
        let up = rational_to_dec::<Up>(&third, WORKING_PRECISION);
        assert!(down.with_rounding::<Up>() < up);
    }

    #[test]
    fn test_rational_conversion_exact_value() {
        // 3/4 is exact in decimal: both directions agree.
        let v = BigRational::new(BigInt::from(3), BigInt::from(4));
        let down = rational_to_dec::<Down>(&v, WORKING_PRECISION);
        let up = rational_to_dec::<Up>(&v, WORKING_PRECISION);
        assert_eq!(down.with_rounding::<Up>(), up);
    }

    #[test]
    fn test_pow_cubes() {
        let two = dec_from_u64::<Down>(2, WORKING_PRECISION);
        assert_eq!(pow(two, 3), dec_from_u64::<Down>(8, WORKING_PRECISION));
    }
}
