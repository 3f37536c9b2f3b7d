//! Exact PCp(X) for small X.
//!
//! An independent verification path: counts, with no analytic input at all,
//! the representations X = p + q with p prime, q >= 4 composite, and q + 2
//! prime. Used as ground truth to cross-check the lower-bound formula on
//! small inputs; the bound path consumes nothing from it.
//!
//! Counts at distinct X are independent, so they are computed in parallel
//! and collected by index: the result is deterministic regardless of thread
//! schedule.

use rayon::prelude::*;

use crate::sieve::{prime_table, primes_up_to};

/// Exact PCp(X) for all X in 0..=x_max, indexed by X.
///
/// Entries at odd X and at X < 6 are zero; PCp is only meaningful at even
/// X >= 6 and no representation exists below that.
pub fn pcp_exact_up_to(x_max: u64) -> Vec<u32> {
    // q + 2 is probed at q = x_max - 2 at most, but keep the table at
    // x_max + 2 so every q in 0..=x_max can be tested uniformly.
    let table = prime_table(x_max + 2);
    let primes = primes_up_to(x_max);

    // q is admissible iff q >= 4, q composite, q + 2 prime.
    let admissible: Vec<bool> = (0..=x_max as usize)
        .map(|q| q >= 4 && !table[q] && table[q + 2])
        .collect();

    (0..=x_max)
        .into_par_iter()
        .map(|x| {
            if x < 6 || x % 2 != 0 {
                return 0;
            }
            let cutoff = primes.partition_point(|&p| p <= x);
            primes[..cutoff]
                .iter()
                .filter(|&&p| admissible[(x - p) as usize])
                .count() as u32
        })
        .collect()
}

/// Even X in [6, x_max] with PCp(X) = 0.
pub fn zero_set(x_max: u64) -> Vec<u64> {
    let counts = pcp_exact_up_to(x_max);
    (6..=x_max)
        .step_by(2)
        .filter(|&x| counts[x as usize] == 0)
        .collect()
}
