// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-sample statistics derived from indel read support and flanking window
//! noise. All functions are pure; rounding happens only when writing VCF.

use crate::model::{SampleIndelReportInfo, WindowAverageSet};
use crate::utils::safe_frac;
use crate::utils::stats::{binomial_two_sided, fisher_exact_two_sided, pvalue_to_phred};

/// Fraction of reads supporting the indel.
pub fn allele_fraction(info: &SampleIndelReportInfo) -> f64 {
    safe_frac(
        info.n_q30_indel_reads().total() as f64,
        info.n_total_reads() as f64,
    )
}

/// Fraction of reads that could not be assigned to either allele.
pub fn other_allele_fraction(info: &SampleIndelReportInfo) -> f64 {
    safe_frac(info.n_other_reads() as f64, info.n_total_reads() as f64)
}

/// Symmetric strand odds ratio of reference vs. indel supporting reads, with
/// a pseudocount of one per cell.
pub fn strand_odds_ratio(info: &SampleIndelReportInfo) -> f64 {
    let ref_fwd = info.n_q30_ref_reads().forward() as f64 + 1.0;
    let ref_rev = info.n_q30_ref_reads().reverse() as f64 + 1.0;
    let indel_fwd = info.n_q30_indel_reads().forward() as f64 + 1.0;
    let indel_rev = info.n_q30_indel_reads().reverse() as f64 + 1.0;

    let r = (ref_fwd * indel_rev) / (ref_rev * indel_fwd);
    let symmetric = r + 1.0 / r;
    let ref_ratio = ref_fwd.min(ref_rev) / ref_fwd.max(ref_rev);
    let indel_ratio = indel_fwd.min(indel_rev) / indel_fwd.max(indel_rev);

    symmetric.ln() + ref_ratio.ln() - indel_ratio.ln()
}

/// PHRED-scaled Fisher exact test p-value for strand bias of the indel
/// supporting reads relative to the reference supporting reads.
pub fn fisher_strand_bias(info: &SampleIndelReportInfo) -> f64 {
    let pvalue = fisher_exact_two_sided(
        info.n_q30_ref_reads().forward() as u64,
        info.n_q30_ref_reads().reverse() as u64,
        info.n_q30_indel_reads().forward() as u64,
        info.n_q30_indel_reads().reverse() as u64,
    );
    pvalue_to_phred(pvalue)
}

/// PHRED-scaled binomial test p-value against indel supporting reads being
/// balanced between strands.
pub fn binomial_strand_asymmetry(info: &SampleIndelReportInfo) -> f64 {
    let indel = info.n_q30_indel_reads();
    let pvalue = binomial_two_sided(indel.forward() as u64, indel.total() as u64, 0.5);
    pvalue_to_phred(pvalue)
}

/// Fraction of basecalls filtered in the flanking window.
pub fn background_noise_fraction(window: &WindowAverageSet) -> f64 {
    safe_frac(window.filtered_basecalls(), window.total_basecalls())
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::model::{SampleIndelReportInfoBuilder, StrandCounts};

    fn info(
        ref_reads: StrandCounts,
        indel_reads: StrandCounts,
        alt: u32,
        other: u32,
    ) -> SampleIndelReportInfo {
        SampleIndelReportInfoBuilder::default()
            .n_q30_ref_reads(ref_reads)
            .n_q30_indel_reads(indel_reads)
            .n_q30_alt_reads(alt)
            .n_other_reads(other)
            .build()
            .unwrap()
    }

    #[test]
    fn test_fractions_without_reads() {
        let empty = SampleIndelReportInfo::default();
        assert_eq!(allele_fraction(&empty), 0.0);
        assert_eq!(other_allele_fraction(&empty), 0.0);
    }

    #[test]
    fn test_fractions() {
        let info = info(StrandCounts::new(6, 4), StrandCounts::new(3, 2), 1, 4);
        assert_relative_eq!(allele_fraction(&info), 0.25);
        assert_relative_eq!(other_allele_fraction(&info), 0.2);
    }

    #[test]
    fn test_strand_odds_ratio_balanced() {
        let empty = SampleIndelReportInfo::default();
        assert_relative_eq!(strand_odds_ratio(&empty), 2.0f64.ln());

        let balanced = info(StrandCounts::new(9, 9), StrandCounts::new(4, 4), 0, 0);
        assert_relative_eq!(strand_odds_ratio(&balanced), 2.0f64.ln());
    }

    #[test]
    fn test_strand_odds_ratio_biased() {
        let biased = info(StrandCounts::new(10, 10), StrandCounts::new(9, 0), 0, 0);
        assert!(strand_odds_ratio(&biased) > strand_odds_ratio(&SampleIndelReportInfo::default()));
        // R = 11 * 1 / (11 * 10) = 0.1, indel ratio = 1 / 10
        assert_relative_eq!(
            strand_odds_ratio(&biased),
            (0.1f64 + 10.0).ln() - 0.1f64.ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_fisher_strand_bias() {
        let balanced = info(StrandCounts::new(5, 5), StrandCounts::new(5, 5), 0, 0);
        assert_relative_eq!(fisher_strand_bias(&balanced), 0.0, epsilon = 1e-9);

        let biased = info(StrandCounts::new(10, 0), StrandCounts::new(0, 10), 0, 0);
        assert_relative_eq!(
            fisher_strand_bias(&biased),
            -10.0 * (2.0f64 / 184756.0).log10(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_binomial_strand_asymmetry() {
        let balanced = info(StrandCounts::default(), StrandCounts::new(5, 5), 0, 0);
        assert_relative_eq!(binomial_strand_asymmetry(&balanced), 0.0, epsilon = 1e-9);
        assert_eq!(binomial_strand_asymmetry(&SampleIndelReportInfo::default()), 0.0);

        let biased = info(StrandCounts::default(), StrandCounts::new(1, 9), 0, 0);
        assert_relative_eq!(
            binomial_strand_asymmetry(&biased),
            -10.0 * (22.0f64 / 1024.0).log10(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_background_noise_fraction() {
        assert_eq!(background_noise_fraction(&WindowAverageSet::default()), 0.0);
        let window = WindowAverageSet::new(5.0, 15.0, 0.0, 0.0);
        assert_relative_eq!(background_noise_fraction(&window), 0.25);
    }
}
