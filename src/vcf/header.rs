// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::io::{self, Write};

use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::config::{Config, ScoringMode};
use crate::filter::Filter;
use crate::scoring::SomaticIndelFeature;

/// INFO definitions as (ID, Number, Type, Description).
const INFO_FIELDS: &[(&str, &str, &str, &str)] = &[
    ("SOMATIC", "0", "Flag", "Somatic mutation"),
    ("QSI", "1", "Integer", "Quality score for any somatic variant, ie. for the ALT haplotype to be present at a significantly different frequency in the tumor and normal"),
    ("TQSI", "1", "Integer", "Data tier used to compute QSI"),
    ("NT", "1", "String", "Genotype of the normal in all data tiers, as used to classify somatic variants. One of {ref,het,hom,conflict}."),
    ("QSI_NT", "1", "Integer", "Quality score reflecting the joint probability of a somatic variant and NT"),
    ("TQSI_NT", "1", "Integer", "Data tier used to compute QSI_NT"),
    ("SGT", "1", "Integer", "Index of the most likely somatic genotype"),
    ("MQ", "1", "Float", "Mean mapping quality of tier2 reads in both samples"),
    ("MQ0", "1", "Float", "Fraction of tier2 reads with mapping quality zero in both samples"),
    ("RU", "1", "String", "Smallest repeating sequence unit in inserted or deleted sequence"),
    ("RC", "1", "Integer", "Number of times RU repeats in the reference allele"),
    ("IC", "1", "Integer", "Number of times RU repeats in the indel allele"),
    ("IHP", "1", "Integer", "Largest reference interrupted homopolymer length intersecting with the indel"),
    ("SVTYPE", "1", "String", "Type of structural variant"),
    ("OVERLAP", "0", "Flag", "Somatic indel possibly overlaps a second indel."),
];

/// FORMAT definitions as (ID, Number, Type, Description), without BCN.
const FORMAT_FIELDS: &[(&str, &str, &str, &str)] = &[
    ("DP", "1", "Integer", "Read depth for tier1"),
    ("DP2", "1", "Integer", "Read depth for tier2"),
    ("TAR", "2", "Integer", "Reads strongly supporting alternate allele for tiers 1,2"),
    ("TIR", "2", "Integer", "Reads strongly supporting indel allele for tiers 1,2"),
    ("TOR", "2", "Integer", "Other reads (weak support or insufficient indel breakpoint overlap) for tiers 1,2"),
    ("AF", "1", "Float", "Estimated Indel AF in tier1"),
    ("OF", "1", "Float", "Estimated frequency of other indel alleles in tier1"),
    ("SOR", "1", "Float", "Strand odds ratio of reference and indel supporting reads in tier1"),
    ("FS", "1", "Float", "Fisher exact test strand bias (PHRED) in tier1"),
    ("BSA", "1", "Float", "Binomial test strand asymmetry of indel supporting reads (PHRED) in tier1"),
    ("RR", "1", "Float", "Read position ranksum of indel vs. reference supporting reads in tier1"),
];

fn filters(config: &Config) -> Vec<Filter> {
    let mut filters = Vec::new();
    if config.max_depth.is_some() {
        filters.push(Filter::HighDepth);
    }
    filters.extend(Filter::iter().filter(|filter| match (filter, &config.scoring) {
        (Filter::IndelBcNoise, ScoringMode::Legacy { .. })
        | (Filter::QsiRef, ScoringMode::Legacy { .. })
        | (Filter::Nonref, ScoringMode::Empirical)
        | (Filter::LowQscore, ScoringMode::Empirical) => true,
        _ => false,
    }));
    filters
}

/// Write the VCF header documenting every field a record may carry under the
/// given configuration.
pub fn write_header<W: Write>(config: &Config, out: &mut W) -> io::Result<()> {
    writeln!(out, "##fileformat=VCFv4.1")?;
    writeln!(
        out,
        "##source={} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out, "##contig=<ID={}>", config.chrom)?;

    for (id, number, kind, description) in INFO_FIELDS {
        writeln!(
            out,
            "##INFO=<ID={},Number={},Type={},Description=\"{}\">",
            id, number, kind, description
        )?;
    }
    writeln!(
        out,
        "##INFO=<ID=EQSI,Number=1,Type=Float,Description=\"Empirically calibrated quality score for somatic variants\">"
    )?;
    if config.scoring.is_empirical() {
        writeln!(
            out,
            "##INFO=<ID=ESF,Number=.,Type=Float,Description=\"Empirical scoring features: {}\">",
            SomaticIndelFeature::iter().join(",")
        )?;
    }

    for (id, number, kind, description) in FORMAT_FIELDS {
        writeln!(
            out,
            "##FORMAT=<ID={},Number={},Type={},Description=\"{}\">",
            id, number, kind, description
        )?;
    }
    writeln!(
        out,
        "##FORMAT=<ID=BCN{flank},Number=1,Type=Float,Description=\"Fraction of filtered reads within {flank} bases of the indel.\">",
        flank = config.indel_region_flank_size
    )?;

    for filter in filters(config) {
        writeln!(
            out,
            "##FILTER=<ID={},Description=\"{}\">",
            filter,
            filter.description()
        )?;
    }

    writeln!(
        out,
        "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNORMAL\tTUMOR"
    )
}
