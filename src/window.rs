//! Window certification: sweep every even X in an inclusive range.
//!
//! A window is certified only if every member passes; the sweep stops at the
//! first X whose bound is non-positive, since a single failure already
//! refutes the claim for the whole window. There is nothing to retry: the
//! inequality either holds at an X or it does not.

use std::time::{Duration, Instant};

use crate::bound::{resolve_bound_sign, BoundSign};
use crate::directed::DecDown;
use crate::{CertifyError, Profile};

/// Tagged outcome of a window sweep.
#[derive(Debug, Clone)]
pub enum WindowOutcome {
    /// Every even X in the window certified positive.
    Certified { checked: u64 },
    /// Sweep stopped at the smallest failing X.
    Refuted {
        first_failure: u64,
        value: DecDown,
        checked: u64,
    },
}

impl WindowOutcome {
    pub fn is_certified(&self) -> bool {
        matches!(self, WindowOutcome::Certified { .. })
    }
}

/// Result of certifying one window under one profile.
#[derive(Debug, Clone)]
pub struct WindowReport {
    pub lo: u64,
    pub hi: u64,
    pub profile: String,
    pub outcome: WindowOutcome,
    pub elapsed: Duration,
}

/// Certify every even X in [lo, hi] under the given profile, ascending, with
/// early exit at the first failure.
///
/// The sweep is strictly sequential, so a refutation always reports the
/// *smallest* failing X. Progress is logged every 1000 values; the log is
/// purely informational and never affects the outcome.
pub fn certify_window(lo: u64, hi: u64, profile: &Profile) -> Result<WindowReport, CertifyError> {
    if lo % 2 != 0 || hi % 2 != 0 || lo > hi {
        return Err(CertifyError::InvalidWindow { lo, hi });
    }

    let start = Instant::now();
    let mut checked = 0u64;

    for x in (lo..=hi).step_by(2) {
        match resolve_bound_sign(x, profile)? {
            BoundSign::Positive(_) => {
                checked += 1;
                if checked % 1000 == 0 {
                    log::info!(
                        "checked {} values in [{}, {}], all positive so far",
                        checked,
                        lo,
                        hi
                    );
                }
            }
            BoundSign::NonPositive(value) => {
                return Ok(WindowReport {
                    lo,
                    hi,
                    profile: profile.name.clone(),
                    outcome: WindowOutcome::Refuted {
                        first_failure: x,
                        value,
                        checked,
                    },
                    elapsed: start.elapsed(),
                });
            }
        }
    }

    Ok(WindowReport {
        lo,
        hi,
        profile: profile.name.clone(),
        outcome: WindowOutcome::Certified { checked },
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odd_bounds_rejected() {
        let profile = Profile::conservative();
        assert!(matches!(
            certify_window(80_001, 80_100, &profile),
            Err(CertifyError::InvalidWindow { .. })
        ));
        assert!(matches!(
            certify_window(80_000, 80_101, &profile),
            Err(CertifyError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_reversed_bounds_rejected() {
        let profile = Profile::conservative();
        assert!(matches!(
            certify_window(90_000, 80_000, &profile),
            Err(CertifyError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_window_below_threshold_fails_loudly() {
        let profile = Profile::conservative();
        assert!(matches!(
            certify_window(79_000, 79_100, &profile),
            Err(CertifyError::BelowThreshold { .. })
        ));
    }

    #[test]
    fn test_small_conservative_slice_certifies() {
        let profile = Profile::conservative();
        let report = certify_window(80_000, 80_100, &profile).unwrap();
        match report.outcome {
            WindowOutcome::Certified { checked } => assert_eq!(checked, 51),
            WindowOutcome::Refuted { first_failure, .. } => {
                panic!("unexpected failure at X={}", first_failure)
            }
        }
    }

    #[test]
    fn test_small_optimized_slice_certifies() {
        let profile = Profile::optimized();
        let report = certify_window(50_000, 50_100, &profile).unwrap();
        assert!(report.outcome.is_certified());
    }

    #[test]
    fn test_single_point_window() {
        let profile = Profile::conservative();
        let report = certify_window(80_000, 80_000, &profile).unwrap();
        match report.outcome {
            WindowOutcome::Certified { checked } => assert_eq!(checked, 1),
            _ => panic!("expected certification"),
        }
    }

    // Decisive windows from the published certification runs. Minutes-long in
    // debug builds, hence ignored by default; run with `cargo test -- --ignored`.

    #[test]
    #[ignore]
    fn test_full_conservative_window_certifies() {
        let profile = Profile::conservative();
        let report = certify_window(80_000, 90_000, &profile).unwrap();
        match report.outcome {
            WindowOutcome::Certified { checked } => assert_eq!(checked, 5001),
            WindowOutcome::Refuted { first_failure, .. } => {
                panic!("unexpected failure at X={}", first_failure)
            }
        }
    }

    #[test]
    #[ignore]
    fn test_full_optimized_window_certifies() {
        let profile = Profile::optimized();
        let report = certify_window(50_000, 60_000, &profile).unwrap();
        match report.outcome {
            WindowOutcome::Certified { checked } => assert_eq!(checked, 5001),
            WindowOutcome::Refuted { first_failure, .. } => {
                panic!("unexpected failure at X={}", first_failure)
            }
        }
    }
}
