// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use crate::config::PileupConfig;
use crate::pileup::error_prob::ErrorProbabilityModel;
use crate::pileup::{BaseCall, CleanedPileup, RawPileup};

/// Turns a raw single sample pileup into the cleaned pileup the genotyping
/// engine expects.
///
/// The error probability cache is owned by the cleaner. Use one cleaner per
/// thread.
#[derive(Debug)]
pub struct PileupCleaner {
    config: PileupConfig,
    error_model: ErrorProbabilityModel,
}

impl PileupCleaner {
    pub fn new(config: PileupConfig) -> Self {
        let error_model = ErrorProbabilityModel::new(config.dependent_eprob, config.dependency);
        PileupCleaner {
            config,
            error_model,
        }
    }

    fn is_valid_call(&self, call: &BaseCall) -> bool {
        call.is_called_base() && call.qscore() >= self.config.min_qscore
    }

    fn is_tier1_call(&self, call: &BaseCall) -> bool {
        !call.is_call_filter() && call.mapq() >= self.config.min_mapq && self.is_valid_call(call)
    }

    /// Select the calls used for genotyping. With `include_tier2`, calls of
    /// filtered or low MAPQ reads and tier2-only calls are used as well.
    pub fn clean_pileup_filter(
        &self,
        raw: &RawPileup,
        include_tier2: bool,
        cleaned: &mut CleanedPileup,
    ) {
        cleaned.clear();
        cleaned.ref_base = raw.ref_base();
        cleaned.n_raw_calls = raw.calls().len();

        cleaned.calls.extend(
            raw.calls()
                .iter()
                .filter(|call| {
                    if include_tier2 {
                        self.is_valid_call(call)
                    } else {
                        self.is_tier1_call(call)
                    }
                })
                .cloned(),
        );

        if include_tier2 {
            cleaned.n_raw_calls += raw.tier2_calls().len();
            cleaned.calls.extend(
                raw.tier2_calls()
                    .iter()
                    .filter(|call| self.is_valid_call(call))
                    .cloned(),
            );
        }
    }

    /// Populate the dependent error probabilities of an already filtered
    /// pileup.
    pub fn clean_pileup_error_prob(&mut self, cleaned: &mut CleanedPileup) {
        let CleanedPileup {
            calls,
            dependent_error_prob,
            ..
        } = cleaned;
        self.error_model.compute(calls, dependent_error_prob);
    }

    /// Filter the pileup and compute error probabilities. Has to be called
    /// exactly once per position and sample before reading `cleaned`.
    pub fn clean_pileup(
        &mut self,
        raw: &RawPileup,
        include_tier2: bool,
        cleaned: &mut CleanedPileup,
    ) {
        self.clean_pileup_filter(raw, include_tier2, cleaned);
        self.clean_pileup_error_prob(cleaned);
        debug_assert_eq!(cleaned.calls.len(), cleaned.dependent_error_prob.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::config::PileupConfigBuilder;
    use crate::pileup::Strand;

    fn cleaner() -> PileupCleaner {
        PileupCleaner::new(
            PileupConfigBuilder::default()
                .min_qscore(17)
                .min_mapq(20)
                .dependent_eprob(false)
                .build()
                .unwrap(),
        )
    }

    fn raw() -> RawPileup {
        RawPileup::new(
            'A',
            vec![
                BaseCall::new('A', 30, 60, Strand::Forward, 5, false),
                BaseCall::new('N', 30, 60, Strand::Forward, 6, false),
                BaseCall::new('C', 10, 60, Strand::Reverse, 7, false),
                BaseCall::new('A', 30, 60, Strand::Reverse, 8, true),
                BaseCall::new('A', 30, 5, Strand::Reverse, 9, false),
            ],
            vec![
                BaseCall::new('A', 20, 3, Strand::Forward, 10, true),
                BaseCall::new('T', 2, 3, Strand::Forward, 11, true),
            ],
        )
    }

    #[test]
    fn test_tier1() {
        let mut cleaner = cleaner();
        let mut cleaned = CleanedPileup::default();
        cleaner.clean_pileup(&raw(), false, &mut cleaned);

        assert_eq!(cleaned.ref_base(), 'A');
        assert_eq!(cleaned.n_calls(), 5);
        assert_eq!(cleaned.n_used_calls(), 1);
        assert_eq!(cleaned.n_unused_calls(), 4);
        assert_eq!(cleaned.calls()[0].read_pos(), 5);
        assert_eq!(cleaned.dependent_error_prob().len(), 1);
        assert_relative_eq!(cleaned.dependent_error_prob()[0], 0.001, epsilon = 1e-12);
    }

    #[test]
    fn test_tier2() {
        let mut cleaner = cleaner();
        let mut cleaned = CleanedPileup::default();
        cleaner.clean_pileup(&raw(), true, &mut cleaned);

        assert_eq!(cleaned.n_calls(), 7);
        assert_eq!(cleaned.n_used_calls(), 4);
        assert_eq!(cleaned.n_used_calls() + cleaned.n_unused_calls(), cleaned.n_calls());
        assert_eq!(cleaned.calls().len(), cleaned.dependent_error_prob().len());
    }

    #[test]
    fn test_tier2_superset() {
        let raw = RawPileup::new(
            'A',
            vec![BaseCall::new('A', 30, 60, Strand::Forward, 1, true)],
            vec![],
        );
        let mut cleaner = cleaner();
        let mut cleaned = CleanedPileup::default();

        cleaner.clean_pileup(&raw, false, &mut cleaned);
        assert_eq!(cleaned.n_calls(), 1);
        assert_eq!(cleaned.n_used_calls(), 0);

        cleaner.clean_pileup(&raw, true, &mut cleaned);
        assert_eq!(cleaned.n_calls(), 1);
        assert_eq!(cleaned.n_used_calls(), 1);
        assert_eq!(cleaned.calls()[0].read_pos(), 1);
    }

    #[test]
    fn test_reuse() {
        let mut cleaner = cleaner();
        let mut cleaned = CleanedPileup::default();
        cleaner.clean_pileup(&raw(), true, &mut cleaned);
        cleaner.clean_pileup(&RawPileup::default(), false, &mut cleaned);

        assert_eq!(cleaned.n_calls(), 0);
        assert_eq!(cleaned.n_used_calls(), 0);
        assert!(cleaned.dependent_error_prob().is_empty());
    }
}
