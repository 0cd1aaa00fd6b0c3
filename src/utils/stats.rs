//! stats.rs
//!
//! Exact tests and probability conversions used by the derived statistics.

use std::ops::RangeInclusive;

use bio::stats::{PHREDProb, Prob};
use statrs::distribution::{Binomial, Discrete, Hypergeometric};

/// Relative tolerance when collecting outcomes at least as extreme as the
/// observed one.
const EXTREME_TOLERANCE: f64 = 1e-7;

/// Convert PHRED-scaled probability to linear probability.
/// Uses rust-bio's `PHREDProb` and `Prob` types for precise, idiomatic conversion.
pub(crate) fn phred_to_prob(phred: f64) -> f64 {
    *Prob::from(PHREDProb(phred))
}

/// Convert a p-value to PHRED scale. A p-value of one maps to exactly zero.
pub(crate) fn pvalue_to_phred(pvalue: f64) -> f64 {
    if pvalue >= 1.0 {
        return 0.0;
    }
    *PHREDProb::from(Prob(pvalue.max(f64::MIN_POSITIVE)))
}

/// Sum the probabilities of all outcomes that are not more likely than the
/// observed one.
fn two_sided<D>(dist: &D, outcomes: RangeInclusive<u64>, observed: u64) -> f64
where
    D: Discrete<u64, f64>,
{
    let cutoff = dist.pmf(observed) * (1.0 + EXTREME_TOLERANCE);
    let p: f64 = outcomes.map(|k| dist.pmf(k)).filter(|p| *p <= cutoff).sum();
    p.min(1.0)
}

/// Two-sided Fisher exact test on the 2x2 table `[[a, b], [c, d]]`.
pub(crate) fn fisher_exact_two_sided(a: u64, b: u64, c: u64, d: u64) -> f64 {
    let row1 = a + b;
    let row2 = c + d;
    let col1 = a + c;
    let n = row1 + row2;
    // any empty margin fixes the table
    if row1 == 0 || col1 == 0 || row1 == n || col1 == n {
        return 1.0;
    }
    let dist = match Hypergeometric::new(n, row1, col1) {
        Ok(dist) => dist,
        Err(_) => return 1.0,
    };

    let min = col1.saturating_sub(row2);
    let max = row1.min(col1);
    two_sided(&dist, min..=max, a)
}

/// Two-sided exact binomial test of `k` successes in `n` trials with success
/// probability `p`.
pub(crate) fn binomial_two_sided(k: u64, n: u64, p: f64) -> f64 {
    assert!(k <= n, "bug: more successes than trials");
    if n == 0 {
        return 1.0;
    }
    let dist = match Binomial::new(p, n) {
        Ok(dist) => dist,
        Err(_) => return 1.0,
    };
    two_sided(&dist, 0..=n, k)
}
