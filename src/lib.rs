// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! Post-hoc filtering, scoring and VCF serialization of somatic indel calls
//! from tumor/normal pileups, together with the pileup cleaning that feeds the
//! upstream genotyping engine.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate getset;
#[macro_use]
extern crate derive_new;
#[macro_use]
extern crate strum_macros;

pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod filter;
pub mod model;
pub mod pileup;
pub mod scoring;
pub mod stats;
pub(crate) mod utils;
pub mod vcf;

pub use crate::cache::IndelCallCache;
pub use crate::config::{Config, ScoringMode};
pub use crate::filter::{Filter, FilterSet, QualityFilterEngine};
pub use crate::model::SomaticIndelCallInfo;
pub use crate::pileup::cleaner::PileupCleaner;
pub use crate::pileup::CleanedPileup;
pub use crate::scoring::{DisabledScoringModel, LogisticScoringModel, ScoringModel, VariantKind};

/// Zero-based genomic coordinate.
pub type Pos = u64;
