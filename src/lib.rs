//! # pcp-certify
//!
//! Rigorous positivity certification for the counting function PCp(X).
//!
//! Computes a signed lower bound `PCp_lower(X) <= PCp(X)` in which every
//! intermediate quantity is rounded in the direction that can only shrink the
//! final value, then sweeps a window of even X verifying `PCp_lower(X) > 0`
//! for each one. The bound combines an exact rational sieve product, a
//! logarithmic-integral lower bound, and two Bombieri-Vinogradov-type
//! penalties evaluated under directed rounding at 80 decimal digits.
//!
//! ## Pipeline
//!
//! - **sieve**: Eratosthenes primality table, the leaf dependency
//! - **correction**: exact rational factor V(z) over primes in [5, z]
//! - **directed**: li and BV bounds with rounding direction carried in the type
//! - **bound**: assembly of the per-X lower bound with exact r5 correction
//! - **window**: sequential sweep with early exit at the first failure
//! - **exact**: independent exact count of PCp(X) for small X (ground truth)

pub mod bound;
pub mod correction;
pub mod directed;
pub mod exact;
pub mod sieve;
pub mod window;

pub use bound::{pcp_lower, pcp_lower_parts, r5_indicator, resolve_bound_sign, BoundParts, BoundSign};
pub use directed::{bv_upper, li_lower, DecDown, DecUp, MAX_PRECISION, WORKING_PRECISION};
pub use window::{certify_window, WindowOutcome, WindowReport};

/// A named set of bound parameters together with the threshold below which
/// the analytic inequality backing them is not proven.
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    /// Smallest even X the profile certifies.
    pub min_x: u64,
    /// BV exponent A.
    pub a: usize,
    /// BV constant for the arithmetic-progression penalty, as a decimal string.
    pub c_ap: String,
    /// BV constant for the aggregate sieve remainder, as a decimal string.
    pub c_agg: String,
}

impl Profile {
    /// Conservative profile: (A, C) = (3, 5.0), valid for even X >= 80,000.
    pub fn conservative() -> Self {
        Profile {
            name: "conservative".to_string(),
            min_x: 80_000,
            a: 3,
            c_ap: "5.0".to_string(),
            c_agg: "5.0".to_string(),
        }
    }

    /// Optimized profile: unified constant (A, C) = (3, 3.0), valid for even
    /// X >= 50,000.
    pub fn optimized() -> Self {
        Profile {
            name: "optimized".to_string(),
            min_x: 50_000,
            a: 3,
            c_ap: "3.0".to_string(),
            c_agg: "3.0".to_string(),
        }
    }
}

/// Errors raised by the certification pipeline.
///
/// A window refutation (`PCp_lower <= 0` at some X) is not an error: it is a
/// legitimate negative result, reported through [`window::WindowOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum CertifyError {
    #[error("X must be even, got {0}")]
    OddX(u64),

    #[error("X = {x} is below the {profile} profile threshold of {min_x}")]
    BelowThreshold {
        x: u64,
        min_x: u64,
        profile: String,
    },

    #[error("window bounds must be even and ordered, got [{lo}, {hi}]")]
    InvalidWindow { lo: u64, hi: u64 },

    #[error("penalty constant {0:?} is not a valid decimal")]
    InvalidConstant(String),

    #[error("sign of the lower bound at X = {x} still unresolved at {precision} digits")]
    PrecisionInconclusive { x: u64, precision: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_constants() {
        let cons = Profile::conservative();
        assert_eq!(cons.min_x, 80_000);
        assert_eq!(cons.a, 3);
        assert_eq!(cons.c_ap, cons.c_agg);

        let opt = Profile::optimized();
        assert_eq!(opt.min_x, 50_000);
        assert_eq!(opt.c_ap, "3.0");
    }

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = CertifyError::OddX(80_001);
        assert!(err.to_string().contains("80001"));

        let err = CertifyError::BelowThreshold {
            x: 79_998,
            min_x: 80_000,
            profile: "conservative".to_string(),
        };
        assert!(err.to_string().contains("conservative"));
    }
}
