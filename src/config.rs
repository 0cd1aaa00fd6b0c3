// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::convert::TryFrom;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use derive_builder::Builder;

use crate::errors;

/// How filters beyond the depth filter are derived.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ScoringMode {
    /// Hand-tuned thresholds on window noise and null-type quality.
    Legacy {
        #[serde(default = "default_max_window_filtered_basecall_frac")]
        max_window_filtered_basecall_frac: f64,
        #[serde(default = "default_sindel_quality_lower_bound")]
        sindel_quality_lower_bound: i32,
    },
    /// Filters from the calibrated model score.
    Empirical,
}

impl Default for ScoringMode {
    fn default() -> Self {
        ScoringMode::Legacy {
            max_window_filtered_basecall_frac: default_max_window_filtered_basecall_frac(),
            sindel_quality_lower_bound: default_sindel_quality_lower_bound(),
        }
    }
}

impl ScoringMode {
    pub fn is_empirical(&self) -> bool {
        matches!(self, ScoringMode::Empirical)
    }
}

fn default_max_window_filtered_basecall_frac() -> f64 {
    0.3
}

fn default_sindel_quality_lower_bound() -> i32 {
    30
}

fn default_chrom() -> String {
    "chr1".to_owned()
}

fn default_indel_region_flank_size() -> u32 {
    50
}

/// Basecall filtration and error model of the pileup cleaner.
#[derive(Clone, Debug, PartialEq, Builder, Serialize, Deserialize)]
#[builder(default)]
#[serde(default)]
pub struct PileupConfig {
    pub min_qscore: u8,
    pub min_mapq: u8,
    /// Model errors of same-base, same-strand calls as dependent.
    pub dependent_eprob: bool,
    /// Degree of error dependency between calls of a group, in [0, 1].
    pub dependency: f64,
}

impl Default for PileupConfig {
    fn default() -> Self {
        PileupConfig {
            min_qscore: 17,
            min_mapq: 20,
            dependent_eprob: false,
            dependency: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Builder, Serialize, Deserialize)]
#[builder(default)]
#[serde(default)]
pub struct Config {
    /// Name of the chromosome written to the CHROM column.
    pub chrom: String,
    /// Maximum normal tier1 depth; depth filtering is disabled if absent.
    pub max_depth: Option<f64>,
    pub scoring: ScoringMode,
    /// Flank size of the window noise statistics, appended to the BCN
    /// FORMAT key.
    pub indel_region_flank_size: u32,
    pub pileup: PileupConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chrom: default_chrom(),
            max_depth: None,
            scoring: ScoringMode::default(),
            indel_region_flank_size: default_indel_region_flank_size(),
            pileup: PileupConfig::default(),
        }
    }
}

impl Config {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = fs::read_to_string(path.as_ref())
            .with_context(|| format!("unable to read config {}", path.as_ref().display()))?;
        let config = Config::try_from(yaml.as_str())
            .with_context(|| format!("unable to parse config {}", path.as_ref().display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let ScoringMode::Legacy {
            max_window_filtered_basecall_frac,
            ..
        } = self.scoring
        {
            if !(0.0..=1.0).contains(&max_window_filtered_basecall_frac) {
                return Err(errors::invalid_config(
                    "max_window_filtered_basecall_frac has to be within [0, 1]",
                )
                .into());
            }
        }
        if !(0.0..=1.0).contains(&self.pileup.dependency) {
            return Err(errors::invalid_config("pileup dependency has to be within [0, 1]").into());
        }
        if let Some(max_depth) = self.max_depth {
            if max_depth < 0.0 {
                return Err(errors::invalid_config("max_depth must not be negative").into());
            }
        }
        Ok(())
    }
}

impl<'a> TryFrom<&'a str> for Config {
    type Error = serde_yaml::Error;

    fn try_from(yaml: &str) -> Result<Self, Self::Error> {
        serde_yaml::from_str(yaml)
    }
}
