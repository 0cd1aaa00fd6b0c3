// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use derive_builder::Builder;

/// Whether the indel is a breakpoint of a larger event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakpointType {
    None,
    Left,
    Right,
}

impl Default for BreakpointType {
    fn default() -> Self {
        BreakpointType::None
    }
}

impl BreakpointType {
    pub fn is_breakpoint(self) -> bool {
        self != BreakpointType::None
    }
}

/// Static description of one indel allele.
#[derive(Default, Clone, Debug, PartialEq, Builder, Getters, CopyGetters, Serialize, Deserialize)]
#[builder(default)]
pub struct IndelReportInfo {
    #[getset(get = "pub")]
    vcf_ref_seq: String,
    #[getset(get = "pub")]
    vcf_indel_seq: String,
    #[getset(get = "pub")]
    #[serde(default)]
    repeat_unit: Option<String>,
    #[getset(get_copy = "pub")]
    #[serde(default)]
    ref_repeat_count: u32,
    #[getset(get_copy = "pub")]
    #[serde(default)]
    indel_repeat_count: u32,
    /// Length of the longest homopolymer touching the indel.
    #[getset(get_copy = "pub")]
    #[serde(default)]
    ihpol: u32,
    #[getset(get_copy = "pub")]
    #[serde(default)]
    breakpoint: BreakpointType,
}

impl IndelReportInfo {
    pub fn is_repeat_unit(&self) -> bool {
        self.repeat_unit.as_ref().map_or(false, |ru| !ru.is_empty())
    }
}

/// Forward and reverse strand read counts.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, new, CopyGetters, Serialize, Deserialize)]
#[getset(get_copy = "pub")]
pub struct StrandCounts {
    forward: u32,
    reverse: u32,
}

impl StrandCounts {
    pub fn total(&self) -> u32 {
        self.forward + self.reverse
    }
}

/// Read support of one indel in one sample at one tier.
#[derive(Default, Clone, Debug, PartialEq, Builder, CopyGetters, Serialize, Deserialize)]
#[builder(default)]
#[getset(get_copy = "pub")]
#[serde(default)]
pub struct SampleIndelReportInfo {
    depth: u32,
    /// Reads with quality >= 30 supporting the reference allele.
    n_q30_ref_reads: StrandCounts,
    /// Reads with quality >= 30 supporting an allele other than the
    /// reference or this indel, but confidently placed.
    n_q30_alt_reads: u32,
    /// Reads with quality >= 30 supporting this indel.
    n_q30_indel_reads: StrandCounts,
    /// Reads that could not be confidently assigned.
    n_other_reads: u32,
    mean_mapq: f64,
    mapq0_frac: f64,
    /// Number of reads contributing to the MAPQ statistics.
    n_mapq: u32,
    /// Read position rank-sum statistic.
    read_pos_ranksum: f64,
}

impl SampleIndelReportInfo {
    /// Quality >= 30 reads supporting either the reference or a non-indel
    /// alternative.
    pub fn n_q30_ref_alt_reads(&self) -> u32 {
        self.n_q30_ref_reads.total() + self.n_q30_alt_reads
    }

    /// All reads counted towards allele fractions.
    pub fn n_total_reads(&self) -> u32 {
        self.n_q30_ref_alt_reads() + self.n_q30_indel_reads.total() + self.n_other_reads
    }
}
