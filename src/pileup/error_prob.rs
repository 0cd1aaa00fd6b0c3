// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::cmp::Reverse;
use std::collections::HashMap;

use itertools::Itertools;

use crate::pileup::BaseCall;
use crate::utils::stats::phred_to_prob;

/// Error probabilities of basecalls, optionally modelling that errors of
/// calls with the same base on the same strand are not independent.
///
/// Inside each (base, strand) group calls are ranked by decreasing quality.
/// The call at rank `r` gets the error probability `e^((1 - dependency)^r)`,
/// so that each additional call of a group adds less independent evidence.
#[derive(Clone, Debug)]
pub struct ErrorProbabilityModel {
    dependent: bool,
    dependency: f64,
    cache: HashMap<(u8, usize), f64>,
}

impl ErrorProbabilityModel {
    pub fn new(dependent: bool, dependency: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&dependency),
            "bug: error dependency must be a probability"
        );
        ErrorProbabilityModel {
            dependent,
            dependency,
            cache: HashMap::new(),
        }
    }

    fn error_prob(&mut self, qscore: u8, rank: usize) -> f64 {
        let rank = if self.dependent { rank } else { 0 };
        let dependency = self.dependency;
        *self.cache.entry((qscore, rank)).or_insert_with(|| {
            let independent = phred_to_prob(qscore as f64);
            if rank == 0 {
                independent
            } else {
                independent.powf((1.0 - dependency).powi(rank as i32))
            }
        })
    }

    /// Fill `probs` with one error probability per call, aligned by index.
    pub fn compute(&mut self, calls: &[BaseCall], probs: &mut Vec<f64>) {
        probs.clear();
        probs.resize(calls.len(), 0.0);

        let order = (0..calls.len())
            .sorted_by_key(|&i| (calls[i].base(), calls[i].strand(), Reverse(calls[i].qscore())));

        let mut group = None;
        let mut rank = 0;
        for i in order {
            let call = &calls[i];
            let key = (call.base(), call.strand());
            if group == Some(key) {
                rank += 1;
            } else {
                group = Some(key);
                rank = 0;
            }
            probs[i] = self.error_prob(call.qscore(), rank);
        }
    }

    #[cfg(test)]
    pub(crate) fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
