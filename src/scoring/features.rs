// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::model::{SomaticIndelCallInfo, Tier, WindowAverageSet};
use crate::stats;
use crate::utils::safe_frac;

/// Features of a somatic indel call consumed by the calibration model, in the
/// order they are written to the `ESF` INFO field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
pub enum SomaticIndelFeature {
    #[strum(serialize = "QSI_NT")]
    QsiNt,
    #[strum(serialize = "T_AF")]
    TumorAlleleFraction,
    #[strum(serialize = "N_AF")]
    NormalAlleleFraction,
    #[strum(serialize = "T_OF")]
    TumorOtherFraction,
    #[strum(serialize = "T_SOR")]
    TumorStrandOddsRatio,
    #[strum(serialize = "T_FS")]
    TumorFisherStrand,
    #[strum(serialize = "ABS_T_RR")]
    AbsTumorReadPosRankSum,
    #[strum(serialize = "MQ")]
    MeanMapq,
    #[strum(serialize = "MQ0")]
    Mapq0Fraction,
    #[strum(serialize = "IHP")]
    HomopolymerLength,
    #[strum(serialize = "RC")]
    RefRepeatCount,
    #[strum(serialize = "IC")]
    IndelRepeatCount,
    #[strum(serialize = "BCN_N")]
    NormalNoise,
    #[strum(serialize = "BCN_T")]
    TumorNoise,
    #[strum(serialize = "T_DP_RATE")]
    TumorDepthRate,
}

impl SomaticIndelFeature {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn count() -> usize {
        SomaticIndelFeature::iter().count()
    }
}

/// Feature vector of one call, indexed by `SomaticIndelFeature`.
#[derive(Clone, Debug, PartialEq)]
pub struct Features {
    values: Vec<f64>,
}

impl Features {
    pub fn from_values(values: Vec<f64>) -> Self {
        assert_eq!(
            values.len(),
            SomaticIndelFeature::count(),
            "bug: feature vector of wrong length"
        );
        Features { values }
    }

    pub fn compute(
        info: &SomaticIndelCallInfo,
        window_normal: &WindowAverageSet,
        window_tumor: &WindowAverageSet,
    ) -> Self {
        let normal = info.normal_tier(Tier::Tier1);
        let tumor = info.tumor_tier(Tier::Tier1);
        let indel = info.indel();
        let (ref_repeat_count, indel_repeat_count) = if indel.is_repeat_unit() {
            (indel.ref_repeat_count(), indel.indel_repeat_count())
        } else {
            (0, 0)
        };

        let values = SomaticIndelFeature::iter()
            .map(|feature| match feature {
                SomaticIndelFeature::QsiNt => info.result().sindel_from_ntype_qphred() as f64,
                SomaticIndelFeature::TumorAlleleFraction => stats::allele_fraction(tumor),
                SomaticIndelFeature::NormalAlleleFraction => stats::allele_fraction(normal),
                SomaticIndelFeature::TumorOtherFraction => stats::other_allele_fraction(tumor),
                SomaticIndelFeature::TumorStrandOddsRatio => stats::strand_odds_ratio(tumor),
                SomaticIndelFeature::TumorFisherStrand => stats::fisher_strand_bias(tumor),
                SomaticIndelFeature::AbsTumorReadPosRankSum => tumor.read_pos_ranksum().abs(),
                SomaticIndelFeature::MeanMapq => info.mean_mapq(),
                SomaticIndelFeature::Mapq0Fraction => info.mapq0_fraction(),
                SomaticIndelFeature::HomopolymerLength => indel.ihpol() as f64,
                SomaticIndelFeature::RefRepeatCount => ref_repeat_count as f64,
                SomaticIndelFeature::IndelRepeatCount => indel_repeat_count as f64,
                SomaticIndelFeature::NormalNoise => stats::background_noise_fraction(window_normal),
                SomaticIndelFeature::TumorNoise => stats::background_noise_fraction(window_tumor),
                SomaticIndelFeature::TumorDepthRate => safe_frac(
                    tumor.depth() as f64,
                    (tumor.depth() + normal.depth()) as f64,
                ),
            })
            .collect();

        Features { values }
    }

    pub fn get(&self, feature: SomaticIndelFeature) -> f64 {
        self.values[feature.index()]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Comma separated values with four decimals, in feature order.
    pub fn to_info_value(&self) -> String {
        self.values.iter().map(|value| format!("{:.4}", value)).join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::str::FromStr;

    use approx::assert_relative_eq;

    use crate::model::tests::call_info;
    use crate::model::ResultSetBuilder;

    #[test]
    fn test_feature_names() {
        assert_eq!(SomaticIndelFeature::QsiNt.to_string(), "QSI_NT");
        assert_eq!(
            SomaticIndelFeature::from_str("T_DP_RATE").unwrap(),
            SomaticIndelFeature::TumorDepthRate
        );
        assert!(SomaticIndelFeature::from_str("XYZ").is_err());
        assert_eq!(SomaticIndelFeature::count(), 15);
    }

    #[test]
    fn test_compute() {
        let result = ResultSetBuilder::default()
            .sindel_from_ntype_qphred(42)
            .build()
            .unwrap();
        let info = call_info(25, result);
        let features = Features::compute(
            &info,
            &WindowAverageSet::new(1.0, 9.0, 0.0, 0.0),
            &WindowAverageSet::default(),
        );
        assert_eq!(features.values().len(), SomaticIndelFeature::count());
        assert_relative_eq!(features.get(SomaticIndelFeature::QsiNt), 42.0);
        assert_relative_eq!(features.get(SomaticIndelFeature::NormalNoise), 0.1);
        assert_relative_eq!(features.get(SomaticIndelFeature::TumorNoise), 0.0);
        assert_relative_eq!(features.get(SomaticIndelFeature::HomopolymerLength), 2.0);
        assert_relative_eq!(features.get(SomaticIndelFeature::RefRepeatCount), 0.0);
        assert_relative_eq!(features.get(SomaticIndelFeature::TumorDepthRate), 0.5);
        assert_relative_eq!(features.get(SomaticIndelFeature::MeanMapq), 55.0);
    }

    #[test]
    fn test_info_value() {
        let mut values = vec![0.0; SomaticIndelFeature::count()];
        values[0] = 1.23456;
        let features = Features::from_values(values);
        let info_value = features.to_info_value();
        assert!(info_value.starts_with("1.2346,0.0000,"));
        assert_eq!(info_value.split(',').count(), SomaticIndelFeature::count());
    }
}
