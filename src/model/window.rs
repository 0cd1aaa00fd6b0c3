// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

/// Averages over a flanking window around the indel in one sample.
#[derive(Default, Clone, Copy, Debug, PartialEq, new, CopyGetters, Serialize, Deserialize)]
#[getset(get_copy = "pub")]
#[serde(default)]
pub struct WindowAverageSet {
    /// Average number of basecalls filtered per position.
    filtered_basecalls: f64,
    /// Average number of basecalls used per position.
    used_basecalls: f64,
    /// Average number of reads spanning a deletion per position.
    spanning_deletions: f64,
    /// Average number of submapped reads per position.
    submapped: f64,
}

impl WindowAverageSet {
    pub fn total_basecalls(&self) -> f64 {
        self.filtered_basecalls + self.used_basecalls
    }
}
