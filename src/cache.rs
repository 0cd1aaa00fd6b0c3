// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::collections::BTreeMap;
use std::io::{self, Write};

use itertools::Itertools;

use crate::filter::QualityFilterEngine;
use crate::model::{SomaticIndelCallInfo, WindowAverageSet};
use crate::scoring::ScoringModel;
use crate::vcf::{self, SomaticIndelRecord};
use crate::Pos;

/// Holds candidate somatic indels until the window noise statistics of their
/// position are known, then filters and writes them.
///
/// Positions have to be resolved by the caller in increasing order, and every
/// cached position has to be resolved eventually.
pub struct IndelCallCache<W: Write, M: ScoringModel> {
    engine: QualityFilterEngine<M>,
    out: W,
    data: BTreeMap<Pos, Vec<SomaticIndelCallInfo>>,
}

impl<W: Write, M: ScoringModel> IndelCallCache<W, M> {
    pub fn new(engine: QualityFilterEngine<M>, out: W) -> Self {
        IndelCallCache {
            engine,
            out,
            data: BTreeMap::new(),
        }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        vcf::write_header(self.engine.config(), &mut self.out)
    }

    /// Add a candidate at the given position. Multiple (also identical)
    /// candidates per position are allowed.
    pub fn cache_indel(&mut self, pos: Pos, info: SomaticIndelCallInfo) {
        self.data.entry(pos).or_insert_with(Vec::new).push(info);
    }

    /// Whether candidates are cached at the given position.
    pub fn test_pos(&self, pos: Pos) -> bool {
        self.data.contains_key(&pos)
    }

    /// Number of cached positions.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Forget the given position, then filter and write its candidates in
    /// the order they were cached. On a write error the position is forgotten
    /// all the same.
    ///
    /// # Panics
    ///
    /// If no candidate has been cached at the position.
    pub fn add_indel_window_data(
        &mut self,
        pos: Pos,
        window_normal: &WindowAverageSet,
        window_tumor: &WindowAverageSet,
    ) -> io::Result<()> {
        let calls = self.data.remove(&pos).unwrap_or_else(|| {
            panic!(
                "bug: window data for position {} without cached indel",
                pos
            )
        });

        debug!("Writing {} indel(s) at position {}.", calls.len(), pos + 1);
        for info in &calls {
            let outcome = self.engine.evaluate(info, window_normal, window_tumor);
            let record = SomaticIndelRecord::new(
                self.engine.config(),
                pos,
                info,
                &outcome,
                window_normal,
                window_tumor,
            );
            writeln!(self.out, "{}", record)?;
        }

        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write, M: ScoringModel> Drop for IndelCallCache<W, M> {
    fn drop(&mut self) {
        if !self.data.is_empty() {
            warn!(
                "{} cached indel position(s) never received window data: {}",
                self.data.len(),
                self.data.keys().map(|pos| pos + 1).join(", ")
            );
        }
    }
}
