// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-position pileups of one sample, before and after cleaning.

pub mod cleaner;
pub mod error_prob;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    Forward,
    Reverse,
}

/// A single base observed in a read overlapping the pileup position.
#[derive(Clone, Copy, Debug, PartialEq, new, CopyGetters, Serialize, Deserialize)]
#[getset(get_copy = "pub")]
pub struct BaseCall {
    base: char,
    /// Base quality (PHRED).
    qscore: u8,
    mapq: u8,
    strand: Strand,
    /// Position of the base in the read.
    read_pos: u16,
    /// Set if the read failed tier1 filtration.
    #[serde(default)]
    is_call_filter: bool,
}

impl BaseCall {
    pub fn is_called_base(&self) -> bool {
        matches!(self.base, 'A' | 'C' | 'G' | 'T')
    }
}

/// Raw basecalls at one position as delivered by the pileup producer.
#[derive(Default, Clone, Debug, PartialEq, new, Getters, CopyGetters, Serialize, Deserialize)]
pub struct RawPileup {
    #[getset(get_copy = "pub")]
    ref_base: char,
    /// Calls from reads passing tier1 read filtration (or flagged by
    /// `is_call_filter` otherwise).
    #[getset(get = "pub")]
    calls: Vec<BaseCall>,
    /// Calls from reads only admitted at tier2.
    #[getset(get = "pub")]
    #[serde(default)]
    tier2_calls: Vec<BaseCall>,
}

/// Filtered pileup with per-call dependent error probabilities.
///
/// A single instance is meant to be reused across positions: the cleaner
/// clears it before filling it for the next position.
#[derive(Clone, Debug, PartialEq)]
pub struct CleanedPileup {
    pub(crate) ref_base: char,
    pub(crate) n_raw_calls: usize,
    pub(crate) calls: Vec<BaseCall>,
    pub(crate) dependent_error_prob: Vec<f64>,
}

impl Default for CleanedPileup {
    fn default() -> Self {
        CleanedPileup {
            ref_base: 'N',
            n_raw_calls: 0,
            calls: Vec::new(),
            dependent_error_prob: Vec::new(),
        }
    }
}

impl CleanedPileup {
    pub fn ref_base(&self) -> char {
        self.ref_base
    }

    /// Number of raw calls considered, reflecting the tier.
    pub fn n_calls(&self) -> usize {
        self.n_raw_calls
    }

    pub fn n_used_calls(&self) -> usize {
        self.calls.len()
    }

    pub fn n_unused_calls(&self) -> usize {
        self.n_calls() - self.n_used_calls()
    }

    pub fn calls(&self) -> &[BaseCall] {
        &self.calls
    }

    /// Error probabilities aligned by index with `calls()`.
    pub fn dependent_error_prob(&self) -> &[f64] {
        &self.dependent_error_prob
    }

    pub fn clear(&mut self) {
        self.ref_base = 'N';
        self.n_raw_calls = 0;
        self.calls.clear();
        self.dependent_error_prob.clear();
    }
}

/// Summary of a cleaned pileup as written by the `clean-pileup` subcommand.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CleanedPileupSummary {
    pub ref_base: char,
    pub n_calls: usize,
    pub n_used_calls: usize,
    pub n_unused_calls: usize,
    pub dependent_error_prob: Vec<f64>,
}

impl From<&CleanedPileup> for CleanedPileupSummary {
    fn from(cleaned: &CleanedPileup) -> Self {
        CleanedPileupSummary {
            ref_base: cleaned.ref_base(),
            n_calls: cleaned.n_calls(),
            n_used_calls: cleaned.n_used_calls(),
            n_unused_calls: cleaned.n_unused_calls(),
            dependent_error_prob: cleaned.dependent_error_prob().to_vec(),
        }
    }
}
