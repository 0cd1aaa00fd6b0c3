// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use structopt::StructOpt;

use crate::cache::IndelCallCache;
use crate::config::Config;
use crate::errors;
use crate::filter::QualityFilterEngine;
use crate::model::{SomaticIndelCallInfo, WindowAverageSet};
use crate::pileup::cleaner::PileupCleaner;
use crate::pileup::{CleanedPileup, CleanedPileupSummary, RawPileup};
use crate::scoring::{DisabledScoringModel, LogisticScoringModel, ScoringModel};
use crate::Pos;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "sindel",
    about = "Filtering, scoring and VCF output of somatic indels from tumor/normal pileups."
)]
pub struct Sindel {
    #[structopt(long, short, help = "Print debug messages.")]
    pub verbose: bool,
    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(
        name = "call-indels",
        about = "Filter and write somatic indel calls given as JSON lines of indel and window \
                 events."
    )]
    CallIndels {
        #[structopt(long, parse(from_os_str), help = "YAML configuration (defaults if omitted).")]
        config: Option<PathBuf>,
        #[structopt(
            long,
            parse(from_os_str),
            help = "JSON calibration model. Scoring is disabled if omitted."
        )]
        scoring_model: Option<PathBuf>,
        #[structopt(long, help = "Chromosome name, overriding the configuration.")]
        chrom: Option<String>,
        #[structopt(
            long,
            parse(from_os_str),
            help = "JSON lines with indel and window events (if omitted, read from STDIN)."
        )]
        events: Option<PathBuf>,
        #[structopt(
            long,
            parse(from_os_str),
            help = "VCF file that shall contain the results (if omitted, write to STDOUT)."
        )]
        output: Option<PathBuf>,
    },
    #[structopt(
        name = "clean-pileup",
        about = "Clean raw pileups given as JSON lines and report error probabilities."
    )]
    CleanPileup {
        #[structopt(long, parse(from_os_str), help = "YAML configuration (defaults if omitted).")]
        config: Option<PathBuf>,
        #[structopt(long, help = "Include tier2 basecalls.")]
        tier2: bool,
        #[structopt(
            long,
            parse(from_os_str),
            help = "JSON lines with raw pileups (if omitted, read from STDIN)."
        )]
        pileups: Option<PathBuf>,
        #[structopt(
            long,
            parse(from_os_str),
            help = "JSON lines output (if omitted, write to STDOUT)."
        )]
        output: Option<PathBuf>,
    },
}

/// A line of the `call-indels` input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    /// Candidate indel at the zero-based position.
    Indel {
        pos: Pos,
        call: Box<SomaticIndelCallInfo>,
    },
    /// Window statistics for the zero-based position, resolving its indels.
    Window {
        pos: Pos,
        normal: WindowAverageSet,
        tumor: WindowAverageSet,
    },
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_path(path),
        None => Ok(Config::default()),
    }
}

fn reader(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("unable to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    })
}

fn writer(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("unable to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

pub fn run(opt: Sindel) -> Result<()> {
    match opt.command {
        Command::CallIndels {
            config,
            scoring_model,
            chrom,
            events,
            output,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(chrom) = chrom {
                config.chrom = chrom;
            }
            let model: Box<dyn ScoringModel> = match scoring_model {
                Some(path) => {
                    info!("Loading scoring model from {}.", path.display());
                    Box::new(LogisticScoringModel::from_path(&path)?)
                }
                None => Box::new(DisabledScoringModel),
            };
            call_indels(
                config,
                model,
                reader(events.as_deref())?,
                writer(output.as_deref())?,
            )
        }
        Command::CleanPileup {
            config,
            tier2,
            pileups,
            output,
        } => {
            let config = load_config(config.as_deref())?;
            clean_pileups(
                config,
                tier2,
                reader(pileups.as_deref())?,
                writer(output.as_deref())?,
            )
        }
    }
}

/// Drive an indel cache from a stream of events and write the resulting VCF.
pub fn call_indels<M, R, W>(config: Config, model: M, events: R, out: W) -> Result<()>
where
    M: ScoringModel,
    R: BufRead,
    W: Write,
{
    let mut cache = IndelCallCache::new(QualityFilterEngine::new(config, model), out);
    cache.write_header()?;

    let mut last_resolved: Option<Pos> = None;
    let mut n_indels = 0;
    for (i, line) in events.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: Event =
            serde_json::from_str(&line).map_err(|e| errors::invalid_event(i + 1, &e.to_string()))?;
        match event {
            Event::Indel { pos, call } => {
                cache.cache_indel(pos, *call);
                n_indels += 1;
            }
            Event::Window { pos, normal, tumor } => {
                if !cache.test_pos(pos) {
                    return Err(errors::Error::UncachedWindowData { pos }.into());
                }
                if last_resolved.map_or(false, |last| pos < last) {
                    warn!(
                        "Window data for position {} arrives after position {}, \
                         output will be unsorted.",
                        pos + 1,
                        last_resolved.map_or(0, |last| last + 1)
                    );
                }
                cache.add_indel_window_data(pos, &normal, &tumor)?;
                last_resolved = Some(pos);
            }
        }
    }
    cache.flush()?;
    info!("Processed {} candidate indels.", n_indels);

    Ok(())
}

/// Clean each raw pileup of the input and write a JSON summary per pileup.
pub fn clean_pileups<R, W>(
    config: Config,
    include_tier2: bool,
    pileups: R,
    mut out: W,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut cleaner = PileupCleaner::new(config.pileup);
    let mut cleaned = CleanedPileup::default();
    for (i, line) in pileups.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let raw: RawPileup =
            serde_json::from_str(&line).map_err(|e| errors::invalid_event(i + 1, &e.to_string()))?;
        cleaner.clean_pileup(&raw, include_tier2, &mut cleaned);
        serde_json::to_writer(&mut out, &CleanedPileupSummary::from(&cleaned))?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
