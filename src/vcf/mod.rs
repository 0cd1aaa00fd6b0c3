// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Text rendering of somatic indel calls as VCF records.

pub mod header;

use std::fmt;

use crate::config::Config;
use crate::filter::FilterOutcome;
use crate::model::{SampleIndelReportInfo, SomaticIndelCallInfo, Tier, WindowAverageSet};
use crate::stats;
use crate::Pos;

pub use self::header::write_header;

const SEP: char = '\t';
const FORMAT_SEP: char = ':';

/// FORMAT keys, completed by the flank size of the window noise statistic.
pub(crate) const FORMAT_KEYS: &str = "DP:DP2:TAR:TIR:TOR:AF:OF:SOR:FS:BSA:RR";

/// One resolved somatic indel call, displayed as a single VCF line without
/// the trailing newline.
#[derive(new)]
pub struct SomaticIndelRecord<'a> {
    config: &'a Config,
    /// Zero-based position.
    pos: Pos,
    info: &'a SomaticIndelCallInfo,
    outcome: &'a FilterOutcome,
    window_normal: &'a WindowAverageSet,
    window_tumor: &'a WindowAverageSet,
}

impl<'a> SomaticIndelRecord<'a> {
    fn fmt_info(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = self.info;
        let result = info.result();
        let indel = info.indel();

        write!(f, "SOMATIC")?;
        if let Some(qscore) = self.outcome.qscore() {
            write!(f, ";EQSI={:.4}", qscore)?;
        }
        write!(
            f,
            ";QSI={};TQSI={};NT={};QSI_NT={};TQSI_NT={};SGT={}",
            result.sindel_qphred(),
            result.sindel_tier().number(),
            result.ntype(),
            result.sindel_from_ntype_qphred(),
            result.sindel_from_ntype_tier().number(),
            result.max_gt(),
        )?;
        write!(
            f,
            ";MQ={:.2};MQ0={:.2}",
            info.mean_mapq(),
            info.mapq0_fraction()
        )?;
        if let (true, Some(repeat_unit)) = (indel.is_repeat_unit(), indel.repeat_unit()) {
            write!(
                f,
                ";RU={};RC={};IC={}",
                repeat_unit,
                indel.ref_repeat_count(),
                indel.indel_repeat_count()
            )?;
        }
        write!(f, ";IHP={}", indel.ihpol())?;
        if self.config.scoring.is_empirical() {
            write!(f, ";ESF={}", self.outcome.features().to_info_value())?;
        }
        if indel.breakpoint().is_breakpoint() {
            write!(f, ";SVTYPE=BND")?;
        }
        if result.is_overlap() {
            write!(f, ";OVERLAP")?;
        }
        Ok(())
    }
}

/// Sample column: counts of both tiers, statistics of tier1.
fn fmt_sample(
    f: &mut fmt::Formatter<'_>,
    tiers: &[SampleIndelReportInfo; 2],
    window: &WindowAverageSet,
) -> fmt::Result {
    let tier1 = &tiers[Tier::Tier1.index()];
    let tier2 = &tiers[Tier::Tier2.index()];

    write!(
        f,
        "{dp1}{s}{dp2}{s}{tar1},{tar2}{s}{tir1},{tir2}{s}{tor1},{tor2}",
        s = FORMAT_SEP,
        dp1 = tier1.depth(),
        dp2 = tier2.depth(),
        tar1 = tier1.n_q30_ref_alt_reads(),
        tar2 = tier2.n_q30_ref_alt_reads(),
        tir1 = tier1.n_q30_indel_reads().total(),
        tir2 = tier2.n_q30_indel_reads().total(),
        tor1 = tier1.n_other_reads(),
        tor2 = tier2.n_other_reads(),
    )?;

    for value in &[
        stats::allele_fraction(tier1),
        stats::other_allele_fraction(tier1),
        stats::strand_odds_ratio(tier1),
        stats::fisher_strand_bias(tier1),
        stats::binomial_strand_asymmetry(tier1),
        tier1.read_pos_ranksum(),
        stats::background_noise_fraction(window),
    ] {
        write!(f, "{}{:.3}", FORMAT_SEP, value)?;
    }
    Ok(())
}

impl<'a> fmt::Display for SomaticIndelRecord<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indel = self.info.indel();

        // CHROM, POS, ID, REF, ALT, QUAL, FILTER
        write!(
            f,
            "{chrom}{s}{pos}{s}.{s}{ref_seq}{s}{alt_seq}{s}.{s}{filters}{s}",
            s = SEP,
            chrom = self.config.chrom,
            pos = self.pos + 1,
            ref_seq = indel.vcf_ref_seq(),
            alt_seq = indel.vcf_indel_seq(),
            filters = self.outcome.filters(),
        )?;

        self.fmt_info(f)?;

        write!(
            f,
            "{}{}{}BCN{}",
            SEP, FORMAT_KEYS, FORMAT_SEP, self.config.indel_region_flank_size
        )?;

        write!(f, "{}", SEP)?;
        fmt_sample(f, self.info.normal(), self.window_normal)?;
        write!(f, "{}", SEP)?;
        fmt_sample(f, self.info.tumor(), self.window_tumor)
    }
}
