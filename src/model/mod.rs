// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Inputs of the somatic indel writer: the indel description, per-sample
//! read support, flanking window noise and the externally computed genotype
//! decision.

pub mod report;
pub mod window;

use derive_builder::Builder;

pub use self::report::{
    BreakpointType, IndelReportInfo, IndelReportInfoBuilder, SampleIndelReportInfo,
    SampleIndelReportInfoBuilder, StrandCounts,
};
pub use self::window::WindowAverageSet;

/// Read filtration tier. Tier2 is a superset of tier1, admitting
/// lower confidence reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Tier1,
    Tier2,
}

impl Default for Tier {
    fn default() -> Self {
        Tier::Tier1
    }
}

impl Tier {
    /// Index into per-tier arrays.
    pub fn index(self) -> usize {
        match self {
            Tier::Tier1 => 0,
            Tier::Tier2 => 1,
        }
    }

    /// One-based tier number as written to VCF.
    pub fn number(self) -> usize {
        self.index() + 1
    }
}

/// Genotype of the non-somatic hypothesis at a site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NType {
    Ref,
    Het,
    Hom,
    Conflict,
}

impl Default for NType {
    fn default() -> Self {
        NType::Ref
    }
}

/// Genotype decision computed by the likelihood engine.
#[derive(Default, Clone, Debug, PartialEq, Builder, CopyGetters, Serialize, Deserialize)]
#[builder(default)]
#[getset(get_copy = "pub")]
pub struct ResultSet {
    ntype: NType,
    /// Somatic quality (phred).
    sindel_qphred: i32,
    sindel_tier: Tier,
    /// Somatic quality given the null-type genotype (phred).
    sindel_from_ntype_qphred: i32,
    sindel_from_ntype_tier: Tier,
    /// Index of the most likely joint genotype.
    max_gt: u32,
    is_overlap: bool,
}

/// Everything known about one candidate somatic indel at a position.
#[derive(Clone, Debug, PartialEq, new, Getters, Serialize, Deserialize)]
#[getset(get = "pub")]
pub struct SomaticIndelCallInfo {
    indel: IndelReportInfo,
    normal: [SampleIndelReportInfo; 2],
    tumor: [SampleIndelReportInfo; 2],
    result: ResultSet,
}

impl SomaticIndelCallInfo {
    pub fn normal_tier(&self, tier: Tier) -> &SampleIndelReportInfo {
        &self.normal[tier.index()]
    }

    pub fn tumor_tier(&self, tier: Tier) -> &SampleIndelReportInfo {
        &self.tumor[tier.index()]
    }

    /// Mean MAPQ over the tier2 data of both samples.
    pub fn mean_mapq(&self) -> f64 {
        let normal = self.normal_tier(Tier::Tier2);
        let tumor = self.tumor_tier(Tier::Tier2);
        (normal.mean_mapq() + tumor.mean_mapq()) / 2.0
    }

    /// Fraction of MAPQ0 reads over the tier2 data of both samples, weighted
    /// by the number of MAPQ observations in each sample.
    pub fn mapq0_fraction(&self) -> f64 {
        let normal = self.normal_tier(Tier::Tier2);
        let tumor = self.tumor_tier(Tier::Tier2);
        let n = normal.n_mapq() + tumor.n_mapq();
        if n == 0 {
            return 0.0;
        }
        let normal_mapq0 = normal.mapq0_frac() * normal.n_mapq() as f64;
        let tumor_mapq0 = tumor.mapq0_frac() * tumor.n_mapq() as f64;
        (normal_mapq0 + tumor_mapq0) / n as f64
    }
}
