// Copyright 2016-2019 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("invalid scoring model ({path}): {msg}")]
    InvalidScoringModel { path: PathBuf, msg: String },
    #[error("scoring model weight refers to unknown feature {name}")]
    UnknownFeature { name: String },
    #[error("invalid event in line {line}: {msg}")]
    InvalidEvent { line: usize, msg: String },
    #[error("window data given for position {pos} without any cached indel")]
    UncachedWindowData { pos: u64 },
    #[error("invalid configuration: {msg}")]
    InvalidConfig { msg: String },
}

pub(crate) fn invalid_event(line: usize, msg: &str) -> Error {
    Error::InvalidEvent {
        line,
        msg: msg.to_owned(),
    }
}

pub(crate) fn invalid_config(msg: &str) -> Error {
    Error::InvalidConfig {
        msg: msg.to_owned(),
    }
}
