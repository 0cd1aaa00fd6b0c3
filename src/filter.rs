// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Site filters of somatic indel calls.

use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;

use crate::config::{Config, ScoringMode};
use crate::model::{NType, SomaticIndelCallInfo, Tier, WindowAverageSet};
use crate::scoring::{Features, ScoringModel, VariantKind};
use crate::stats;

/// VCF FILTER values. Filters are written in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum Filter {
    HighDepth,
    #[strum(serialize = "IndelBCNoise")]
    IndelBcNoise,
    #[strum(serialize = "QSI_ref")]
    QsiRef,
    Nonref,
    LowQscore,
}

impl Filter {
    pub fn description(self) -> &'static str {
        match self {
            Filter::HighDepth => {
                "Sequencing depth is greater than the maximum depth in the normal sample"
            }
            Filter::IndelBcNoise => {
                "Average fraction of filtered basecalls within the flanking window exceeds the \
                 maximum in the normal or tumor sample"
            }
            Filter::QsiRef => {
                "Normal sample is not homozygous ref or sindel quality is below the lower bound"
            }
            Filter::Nonref => "Normal sample is not homozygous ref",
            Filter::LowQscore => "Calibrated score is below the model threshold",
        }
    }
}

/// Accumulated filters of one call. Filters can be set but never removed.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct FilterSet {
    filters: BTreeSet<Filter>,
}

impl FilterSet {
    pub fn set(&mut self, filter: Filter) {
        self.filters.insert(filter);
    }

    pub fn contains(&self, filter: Filter) -> bool {
        self.filters.contains(&filter)
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Filter> + '_ {
        self.filters.iter().cloned()
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filters.is_empty() {
            write!(f, "PASS")
        } else {
            write!(f, "{}", self.filters.iter().join(";"))
        }
    }
}

/// Filters, calibrated score and features of one call.
#[derive(Clone, Debug, PartialEq, Getters, CopyGetters)]
pub struct FilterOutcome {
    #[getset(get = "pub")]
    filters: FilterSet,
    /// Calibrated score, present if a scoring model is initialized.
    #[getset(get_copy = "pub")]
    qscore: Option<f64>,
    #[getset(get = "pub")]
    features: Features,
}

/// Derives the filters of somatic indel calls.
#[derive(Debug)]
pub struct QualityFilterEngine<M: ScoringModel> {
    config: Config,
    model: M,
}

impl<M: ScoringModel> QualityFilterEngine<M> {
    pub fn new(config: Config, model: M) -> Self {
        if !model.is_initialized() && config.scoring.is_empirical() {
            warn!("Empirical scoring requested without an initialized scoring model.");
        }
        QualityFilterEngine { config, model }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn evaluate(
        &self,
        info: &SomaticIndelCallInfo,
        window_normal: &WindowAverageSet,
        window_tumor: &WindowAverageSet,
    ) -> FilterOutcome {
        let result = info.result();
        let mut filters = FilterSet::default();

        if let Some(max_depth) = self.config.max_depth {
            if info.normal_tier(Tier::Tier1).depth() as f64 > max_depth {
                filters.set(Filter::HighDepth);
            }
        }

        let features = Features::compute(info, window_normal, window_tumor);
        // the model scores the opposite of what is reported
        let qscore = if self.model.is_initialized() {
            Some(1.0 - self.model.score(&features, VariantKind::Indel))
        } else {
            None
        };

        match self.config.scoring {
            ScoringMode::Legacy {
                max_window_filtered_basecall_frac,
                sindel_quality_lower_bound,
            } => {
                let normal_noise = stats::background_noise_fraction(window_normal);
                let tumor_noise = stats::background_noise_fraction(window_tumor);
                if normal_noise >= max_window_filtered_basecall_frac
                    || tumor_noise >= max_window_filtered_basecall_frac
                {
                    filters.set(Filter::IndelBcNoise);
                }

                if result.ntype() != NType::Ref
                    || result.sindel_from_ntype_qphred() < sindel_quality_lower_bound
                {
                    filters.set(Filter::QsiRef);
                }
            }
            ScoringMode::Empirical => {
                if result.ntype() != NType::Ref {
                    filters.set(Filter::Nonref);
                }
                if qscore.unwrap_or(0.0) < self.model.threshold(VariantKind::Indel) {
                    filters.set(Filter::LowQscore);
                }
            }
        }

        FilterOutcome {
            filters,
            qscore,
            features,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::config::ConfigBuilder;
    use crate::model::tests::call_info;
    use crate::model::{ResultSet, ResultSetBuilder};
    use crate::scoring::tests::FixedScoringModel;
    use crate::scoring::{DisabledScoringModel, LogisticScoringModel};

    fn legacy(max_depth: Option<f64>) -> Config {
        ConfigBuilder::default()
            .max_depth(max_depth)
            .scoring(ScoringMode::Legacy {
                max_window_filtered_basecall_frac: 0.3,
                sindel_quality_lower_bound: 30,
            })
            .build()
            .unwrap()
    }

    fn empirical() -> Config {
        ConfigBuilder::default()
            .scoring(ScoringMode::Empirical)
            .build()
            .unwrap()
    }

    fn ref_result(qsi_nt: i32) -> ResultSet {
        ResultSetBuilder::default()
            .ntype(NType::Ref)
            .sindel_from_ntype_qphred(qsi_nt)
            .build()
            .unwrap()
    }

    fn quiet() -> WindowAverageSet {
        WindowAverageSet::new(0.0, 30.0, 0.0, 0.0)
    }

    #[test]
    fn test_filter_set_display() {
        let mut filters = FilterSet::default();
        assert_eq!(filters.to_string(), "PASS");
        filters.set(Filter::QsiRef);
        filters.set(Filter::HighDepth);
        filters.set(Filter::QsiRef);
        assert_eq!(filters.to_string(), "HighDepth;QSI_ref");
    }

    #[test]
    fn test_high_depth() {
        let engine = QualityFilterEngine::new(legacy(Some(30.0)), DisabledScoringModel);
        let outcome = engine.evaluate(&call_info(40, ref_result(50)), &quiet(), &quiet());
        assert!(outcome.filters().contains(Filter::HighDepth));

        let outcome = engine.evaluate(&call_info(30, ref_result(50)), &quiet(), &quiet());
        assert!(outcome.filters().is_empty());

        let engine = QualityFilterEngine::new(legacy(None), DisabledScoringModel);
        let outcome = engine.evaluate(&call_info(4000, ref_result(50)), &quiet(), &quiet());
        assert!(!outcome.filters().contains(Filter::HighDepth));
    }

    #[test]
    fn test_qsi_ref() {
        let engine = QualityFilterEngine::new(legacy(None), DisabledScoringModel);
        let outcome = engine.evaluate(&call_info(20, ref_result(25)), &quiet(), &quiet());
        assert!(outcome.filters().contains(Filter::QsiRef));

        let het = ResultSetBuilder::default()
            .ntype(NType::Het)
            .sindel_from_ntype_qphred(60)
            .build()
            .unwrap();
        let outcome = engine.evaluate(&call_info(20, het), &quiet(), &quiet());
        assert!(outcome.filters().contains(Filter::QsiRef));
        assert!(!outcome.filters().contains(Filter::Nonref));
    }

    #[test]
    fn test_bc_noise() {
        let engine = QualityFilterEngine::new(legacy(None), DisabledScoringModel);
        let noisy = WindowAverageSet::new(3.0, 7.0, 0.0, 0.0);
        let outcome = engine.evaluate(&call_info(20, ref_result(50)), &quiet(), &noisy);
        assert!(outcome.filters().contains(Filter::IndelBcNoise));
        assert_eq!(outcome.filters().to_string(), "IndelBCNoise");
        assert_eq!(outcome.qscore(), None);
    }

    #[test]
    fn test_low_qscore() {
        // the model scores 0.8, which is reported as 0.2
        let model = FixedScoringModel {
            score: 0.8,
            threshold: 0.5,
        };
        let engine = QualityFilterEngine::new(empirical(), model);
        let outcome = engine.evaluate(&call_info(20, ref_result(10)), &quiet(), &quiet());
        assert_relative_eq!(outcome.qscore().unwrap(), 0.2);
        assert!(outcome.filters().contains(Filter::LowQscore));
        assert!(!outcome.filters().contains(Filter::QsiRef));
        assert!(!outcome.filters().contains(Filter::IndelBcNoise));
    }

    #[test]
    fn test_empirical_nonref() {
        let model = FixedScoringModel {
            score: 0.1,
            threshold: 0.5,
        };
        let engine = QualityFilterEngine::new(empirical(), &model);
        let result = ResultSetBuilder::default()
            .ntype(NType::Conflict)
            .build()
            .unwrap();
        let noisy = WindowAverageSet::new(9.0, 1.0, 0.0, 0.0);
        let outcome = engine.evaluate(&call_info(20, result), &noisy, &noisy);
        assert_eq!(outcome.filters().to_string(), "Nonref");
    }

    #[test]
    fn test_empirical_without_model() {
        let engine = QualityFilterEngine::new(empirical(), DisabledScoringModel);
        let outcome = engine.evaluate(&call_info(20, ref_result(0)), &quiet(), &quiet());
        assert_eq!(outcome.qscore(), None);
        assert!(outcome.filters().is_empty());
    }

    #[test]
    fn test_empirical_without_indel_params() {
        let model =
            LogisticScoringModel::from_json(r#"{"snv": {"intercept": 0.0, "threshold": 0.9}}"#)
                .unwrap();
        let engine = QualityFilterEngine::new(empirical(), model);
        let outcome = engine.evaluate(&call_info(20, ref_result(50)), &quiet(), &quiet());
        assert_eq!(outcome.qscore(), None);
        assert!(outcome.filters().is_empty());
    }

    #[test]
    fn test_modes_exclusive() {
        let model = FixedScoringModel {
            score: 0.9,
            threshold: 0.5,
        };
        let noisy = WindowAverageSet::new(9.0, 1.0, 0.0, 0.0);
        let nonref = ResultSetBuilder::default()
            .ntype(NType::Hom)
            .build()
            .unwrap();

        let legacy_engine = QualityFilterEngine::new(legacy(Some(1.0)), &model);
        let outcome = legacy_engine.evaluate(&call_info(20, nonref.clone()), &noisy, &noisy);
        assert_eq!(outcome.filters().to_string(), "HighDepth;IndelBCNoise;QSI_ref");

        let empirical_engine = QualityFilterEngine::new(empirical(), &model);
        let outcome = empirical_engine.evaluate(&call_info(20, nonref), &noisy, &noisy);
        assert_eq!(outcome.filters().to_string(), "Nonref;LowQscore");
    }
}
