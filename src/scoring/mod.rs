// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Calibration models turning a feature vector into a probability.

pub mod features;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::errors;

pub use self::features::{Features, SomaticIndelFeature};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VariantKind {
    Snv,
    Indel,
}

/// A calibration model. Its lifecycle is owned by the caller, which injects
/// it into the filter engine.
pub trait ScoringModel {
    /// Whether a model has been loaded. Uninitialized models disable scoring.
    fn is_initialized(&self) -> bool;

    /// Probability in [0, 1] for the given features.
    fn score(&self, features: &Features, kind: VariantKind) -> f64;

    /// Score threshold in [0, 1] below which calls are filtered.
    fn threshold(&self, kind: VariantKind) -> f64;
}

impl<'a, M: ScoringModel + ?Sized> ScoringModel for &'a M {
    fn is_initialized(&self) -> bool {
        (**self).is_initialized()
    }

    fn score(&self, features: &Features, kind: VariantKind) -> f64 {
        (**self).score(features, kind)
    }

    fn threshold(&self, kind: VariantKind) -> f64 {
        (**self).threshold(kind)
    }
}

impl<M: ScoringModel + ?Sized> ScoringModel for Box<M> {
    fn is_initialized(&self) -> bool {
        (**self).is_initialized()
    }

    fn score(&self, features: &Features, kind: VariantKind) -> f64 {
        (**self).score(features, kind)
    }

    fn threshold(&self, kind: VariantKind) -> f64 {
        (**self).threshold(kind)
    }
}

/// Model used when no calibration is available.
#[derive(Default, Clone, Copy, Debug)]
pub struct DisabledScoringModel;

impl ScoringModel for DisabledScoringModel {
    fn is_initialized(&self) -> bool {
        false
    }

    fn score(&self, _features: &Features, _kind: VariantKind) -> f64 {
        0.0
    }

    fn threshold(&self, _kind: VariantKind) -> f64 {
        0.0
    }
}

#[derive(Clone, Debug, Deserialize)]
struct RawLogisticParams {
    #[serde(default)]
    intercept: f64,
    #[serde(default)]
    weights: BTreeMap<String, f64>,
    threshold: f64,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawLogisticModel {
    #[serde(default)]
    snv: Option<RawLogisticParams>,
    #[serde(default)]
    indel: Option<RawLogisticParams>,
}

#[derive(Clone, Debug, PartialEq)]
struct LogisticParams {
    intercept: f64,
    weights: Vec<f64>,
    threshold: f64,
}

impl LogisticParams {
    fn from_raw(raw: RawLogisticParams) -> Result<Self, errors::Error> {
        let mut weights = vec![0.0; SomaticIndelFeature::count()];
        for (name, weight) in raw.weights {
            let feature = SomaticIndelFeature::from_str(&name)
                .map_err(|_| errors::Error::UnknownFeature { name: name.clone() })?;
            weights[feature.index()] = weight;
        }
        Ok(LogisticParams {
            intercept: raw.intercept,
            weights,
            threshold: raw.threshold,
        })
    }

    fn score(&self, features: &Features) -> f64 {
        let linear = self.intercept
            + self
                .weights
                .iter()
                .zip(features.values())
                .map(|(w, x)| w * x)
                .sum::<f64>();
        1.0 / (1.0 + (-linear).exp())
    }
}

/// Logistic regression over the call features, one parameter set per
/// variant kind, loaded from JSON:
///
/// ```json
/// {"indel": {"intercept": -2.0, "weights": {"QSI_NT": 0.1}, "threshold": 0.5}}
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogisticScoringModel {
    snv: Option<LogisticParams>,
    indel: Option<LogisticParams>,
}

impl LogisticScoringModel {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawLogisticModel = serde_json::from_str(json)?;
        let model = LogisticScoringModel {
            snv: raw.snv.map(LogisticParams::from_raw).transpose()?,
            indel: raw.indel.map(LogisticParams::from_raw).transpose()?,
        };
        for kind in &[VariantKind::Snv, VariantKind::Indel] {
            if let Some(params) = model.params(*kind) {
                if !(0.0..=1.0).contains(&params.threshold) {
                    return Err(errors::invalid_config(&format!(
                        "{} score threshold has to be within [0, 1]",
                        kind
                    ))
                    .into());
                }
            }
        }
        Ok(model)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("unable to read scoring model {}", path.display()))?;
        LogisticScoringModel::from_json(&json).map_err(|e| {
            errors::Error::InvalidScoringModel {
                path: path.to_owned(),
                msg: e.to_string(),
            }
            .into()
        })
    }

    fn params(&self, kind: VariantKind) -> Option<&LogisticParams> {
        match kind {
            VariantKind::Snv => self.snv.as_ref(),
            VariantKind::Indel => self.indel.as_ref(),
        }
    }
}

impl ScoringModel for LogisticScoringModel {
    fn is_initialized(&self) -> bool {
        // only indels are scored
        self.indel.is_some()
    }

    fn score(&self, features: &Features, kind: VariantKind) -> f64 {
        self.params(kind).map_or(0.0, |params| params.score(features))
    }

    fn threshold(&self, kind: VariantKind) -> f64 {
        self.params(kind).map_or(0.0, |params| params.threshold)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use approx::assert_relative_eq;

    /// Model returning fixed values.
    pub(crate) struct FixedScoringModel {
        pub(crate) score: f64,
        pub(crate) threshold: f64,
    }

    impl ScoringModel for FixedScoringModel {
        fn is_initialized(&self) -> bool {
            true
        }

        fn score(&self, _features: &Features, _kind: VariantKind) -> f64 {
            self.score
        }

        fn threshold(&self, _kind: VariantKind) -> f64 {
            self.threshold
        }
    }

    fn features(qsi_nt: f64) -> Features {
        let mut values = vec![0.0; SomaticIndelFeature::count()];
        values[SomaticIndelFeature::QsiNt.index()] = qsi_nt;
        Features::from_values(values)
    }

    #[test]
    fn test_disabled() {
        let model = DisabledScoringModel;
        assert!(!model.is_initialized());
        assert_eq!(model.score(&features(10.0), VariantKind::Indel), 0.0);
    }

    #[test]
    fn test_logistic() {
        let model = LogisticScoringModel::from_json(
            r#"{"indel": {"intercept": -2.0, "weights": {"QSI_NT": 0.1}, "threshold": 0.3}}"#,
        )
        .unwrap();
        assert!(model.is_initialized());
        assert_relative_eq!(model.score(&features(20.0), VariantKind::Indel), 0.5);
        assert_relative_eq!(model.threshold(VariantKind::Indel), 0.3);
        assert_eq!(model.score(&features(20.0), VariantKind::Snv), 0.0);
        assert_eq!(model.threshold(VariantKind::Snv), 0.0);
    }

    #[test]
    fn test_logistic_without_indel_params() {
        let model =
            LogisticScoringModel::from_json(r#"{"snv": {"intercept": 0.0, "threshold": 0.9}}"#)
                .unwrap();
        assert!(!model.is_initialized());
        assert_relative_eq!(model.threshold(VariantKind::Snv), 0.9);
        assert_eq!(model.score(&features(20.0), VariantKind::Indel), 0.0);
    }

    #[test]
    fn test_logistic_invalid() {
        assert!(LogisticScoringModel::from_json(
            r#"{"indel": {"weights": {"NOPE": 1.0}, "threshold": 0.3}}"#
        )
        .is_err());
        assert!(LogisticScoringModel::from_json(r#"{"indel": {"threshold": 1.3}}"#).is_err());
        assert!(!LogisticScoringModel::from_json("{}").unwrap().is_initialized());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "not json").unwrap();
        let err = LogisticScoringModel::from_path(&path).unwrap_err();
        assert!(err.to_string().starts_with("invalid scoring model"));
    }
}
