// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// `index` is the 0-based position of the observation in catalogue order.
    #[error("malformed observation #{index}: {reason}")]
    MalformedObservation { index: usize, reason: String },

    #[error("unknown register: {0}")]
    UnknownRegister(String),
}

impl Error {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedObservation { index, reason: reason.into() }
    }
}
