//! Assembly of the per-X lower bound.
//!
//! PCp_lower = main - BV_AP - BV_AGG - r5, where
//!
//! - main   = (li_lower(X)/2) * V(z) * f(3), every factor rounded down,
//! - BV_AP  = C_AP * X / (ln X)^A * V(z) * f(3), rounded up,
//! - BV_AGG = C_AGG * X / (ln X)^A, rounded up,
//! - r5     = 1 exactly when X - 3 is prime (the r = 5 => q = 3 case the
//!            analytic bound does not see), else 0.
//!
//! Down-rounded factors enter positively, up-rounded penalties are
//! subtracted, and the final subtraction rounds down, so the result can only
//! sit at or below the true value of the bound expression.

use dashu_float::round::mode::{Down, Up};
use dashu_float::round::Round;
use dashu_float::FBig;
use num_rational::BigRational;

use crate::correction::correction_factor;
use crate::directed::{
    bv_lower, bv_upper, dec_from_u64, li_lower, li_upper, ln_below, rational_to_dec, DecDown,
    DecUp, MAX_PRECISION, WORKING_PRECISION,
};
use crate::sieve::prime_table;
use crate::{CertifyError, Profile};

/// f(3), already rounded down. Supplied by the analytic derivation, not
/// computed here.
const F3: &str = "0.8230302166065229129458236";

fn f3<R: Round>(precision: usize) -> FBig<R, 10> {
    FBig::from_str_native(F3)
        .expect("fixed decimal literal")
        .with_precision(precision)
        .value()
}

/// Full breakdown of one bound evaluation. The intermediates are purely
/// observational; `lower` is the certified value.
#[derive(Debug, Clone)]
pub struct BoundParts {
    pub x: u64,
    /// Sieve ceiling z = floor(sqrt(X)) + 1.
    pub z: u64,
    /// Exact correction factor V(z).
    pub v: BigRational,
    /// V(z) as a down-rounded decimal.
    pub v_down: DecDown,
    /// The supplied f(3) constant at working precision.
    pub f3: DecDown,
    /// Lower bound for li(X).
    pub li_lower: DecDown,
    /// Main term (li/2) * V * f(3).
    pub main: DecDown,
    /// main / (X / ln^2 X): normalized leading-constant check.
    pub leading_ratio: DecDown,
    /// Arithmetic-progression penalty, rounded up.
    pub bv_ap: DecUp,
    /// Aggregate sieve-remainder penalty, rounded up.
    pub bv_agg: DecUp,
    /// Whether the exceptional r5 correction applied.
    pub r5: bool,
    /// The certified lower bound for PCp(X).
    pub lower: DecDown,
    /// Working precision the evaluation ran at, in decimal digits.
    pub precision: usize,
}

/// Exceptional correction: true iff X - 3 >= 2 and X - 3 is prime.
///
/// A discrete indicator, not a bound; it is decided by an exact sieve test
/// and never rounded.
pub fn r5_indicator(x: u64) -> bool {
    if x < 5 {
        return false;
    }
    let table = prime_table(x);
    table[(x - 3) as usize]
}

fn check_preconditions(x: u64, profile: &Profile) -> Result<(), CertifyError> {
    if x % 2 != 0 {
        return Err(CertifyError::OddX(x));
    }
    if x < profile.min_x {
        return Err(CertifyError::BelowThreshold {
            x,
            min_x: profile.min_x,
            profile: profile.name.clone(),
        });
    }
    Ok(())
}

/// Evaluate the lower bound at X with the full diagnostic breakdown.
///
/// Preconditions (X even, X >= profile threshold) are contract violations,
/// reported as errors rather than silently coerced: a value computed outside
/// the proven regime would look valid and mean nothing.
pub fn pcp_lower_parts(
    x: u64,
    profile: &Profile,
    precision: usize,
) -> Result<BoundParts, CertifyError> {
    check_preconditions(x, profile)?;

    let (z, v) = correction_factor(x);
    let v_down = rational_to_dec::<Down>(&v, precision);
    let v_up = rational_to_dec::<Up>(&v, precision);
    let f3_down = f3::<Down>(precision);

    // Main term: every factor already at or below its true value.
    let li = li_lower(x, precision);
    let two = dec_from_u64::<Down>(2, precision);
    let main = (&li / &two) * &v_down * &f3_down;

    // Penalties: every factor at or above its true value. V converts again,
    // this time from above, so the subtracted terms stay genuine upper
    // bounds.
    let bv_ap = bv_upper(x, profile.a, &profile.c_ap, precision)? * &v_up * &f3::<Up>(precision);
    let bv_agg = bv_upper(x, profile.a, &profile.c_agg, precision)?;

    let r5 = r5_indicator(x);

    // Final combination rounds down. The up-rounded penalties cross into the
    // down domain value-preserving; only the subtraction itself rounds.
    let mut lower = main.clone()
        - bv_ap.clone().with_rounding::<Down>()
        - bv_agg.clone().with_rounding::<Down>();
    if r5 {
        lower = lower - DecDown::ONE;
    }

    // Diagnostic: main relative to X / ln^2 X.
    let l = ln_below(x, precision);
    let denom = dec_from_u64::<Down>(x, precision) / (&l * &l);
    let leading_ratio = &main / &denom;

    Ok(BoundParts {
        x,
        z,
        v,
        v_down,
        f3: f3_down,
        li_lower: li,
        main,
        leading_ratio,
        bv_ap,
        bv_agg,
        r5,
        lower,
        precision,
    })
}

/// The certified lower bound for PCp(X) at the standard working precision.
pub fn pcp_lower(x: u64, profile: &Profile) -> Result<DecDown, CertifyError> {
    Ok(pcp_lower_parts(x, profile, WORKING_PRECISION)?.lower)
}

/// Upper-directed evaluation of the same expression, every rounding flipped.
///
/// Dominates the lower evaluation pointwise. When the lower bound comes out
/// non-positive, a non-positive value here shows the sign is real rather
/// than an artifact of exhausted precision.
pub fn pcp_upper(x: u64, profile: &Profile, precision: usize) -> Result<DecUp, CertifyError> {
    check_preconditions(x, profile)?;

    let (_, v) = correction_factor(x);
    let v_up = rational_to_dec::<Up>(&v, precision);
    let v_down = rational_to_dec::<Down>(&v, precision);

    let li = li_upper(x, precision);
    let two = dec_from_u64::<Up>(2, precision);
    let main = (&li / &two) * &v_up * &f3::<Up>(precision);

    let bv_ap = bv_lower(x, profile.a, &profile.c_ap, precision)? * &v_down * &f3::<Down>(precision);
    let bv_agg = bv_lower(x, profile.a, &profile.c_agg, precision)?;

    let mut upper = main
        - bv_ap.with_rounding::<Up>()
        - bv_agg.with_rounding::<Up>();
    if r5_indicator(x) {
        upper = upper - DecUp::ONE;
    }
    Ok(upper)
}

/// Resolved sign of the lower bound at X.
#[derive(Debug, Clone)]
pub enum BoundSign {
    /// PCp_lower > 0: X certifies.
    Positive(DecDown),
    /// Both directed evaluations are non-positive: a definitive failure.
    NonPositive(DecDown),
}

/// Decide the sign of the bound at X, escalating precision when the two
/// directed evaluations straddle zero.
///
/// Starts at [`WORKING_PRECISION`] and doubles up to [`MAX_PRECISION`]; if
/// the sign still refuses to resolve there, the outcome is
/// [`CertifyError::PrecisionInconclusive`] rather than a false pass or fail.
pub fn resolve_bound_sign(x: u64, profile: &Profile) -> Result<BoundSign, CertifyError> {
    let mut precision = WORKING_PRECISION;
    loop {
        let lower = pcp_lower_parts(x, profile, precision)?.lower;
        if lower > DecDown::ZERO {
            return Ok(BoundSign::Positive(lower));
        }
        let upper = pcp_upper(x, profile, precision)?;
        if upper <= DecUp::ZERO {
            return Ok(BoundSign::NonPositive(lower));
        }
        if precision >= MAX_PRECISION {
            return Err(CertifyError::PrecisionInconclusive { x, precision });
        }
        log::debug!(
            "sign of bound at X={} unresolved at {} digits, doubling",
            x,
            precision
        );
        precision *= 2;
    }
}
