// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Loading observations from catalogue files.
//!
//! A catalogue lists environments, and for each environment the registers it
//! was able to read. Every register entry carries a `name` plus one key per
//! bit-field. Each register entry becomes one [`Observation`], in file order,
//! with its fields in the order they were written.
//!
//! Two formats are understood, picked by file extension:
//!
//! ```toml
//! [[environment]]
//! name = "Raspberry Pi 4, Ubuntu 22.04, QEMU 6.2/TCG, cpu max"
//!
//! [[environment.register]]
//! name = "MIDR_EL1"
//! bits = "0x000000000f0510"
//! revision = "0"
//! ```
//!
//! ```json
//! { "environments": [ { "env": "...", "registers": [ { "name": "MIDR_EL1", "bits": "0x0" } ] } ] }
//! ```

mod json;
mod toml;

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::observation::{Fields, Observation};

/// Snapshots of AArch64 system registers taken under QEMU, KVM, HVF and Hyper-V
/// on Raspberry Pi, Apple silicon and Windows Dev Kit hosts, some of them both
/// before and after UEFI ran.
pub const AARCH64: &str = include_str!("../../catalogue/aarch64.toml");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    /// Anything that isn't `.json` is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

pub fn load(path: &Path) -> Result<Vec<Observation>> {
    let src = std::fs::read_to_string(path)
        .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    parse(&path.display().to_string(), &src, Format::from_path(path))
}

/// `origin` only labels errors and log events.
pub fn parse(origin: &str, src: &str, format: Format) -> Result<Vec<Observation>> {
    let mut sink = Sink::default();
    match format {
        Format::Toml => toml::parse(origin, src, &mut sink)?,
        Format::Json => json::parse(origin, src, &mut sink)?,
    }
    debug!(
        origin,
        environments = sink.environments,
        observations = sink.observations.len(),
        "loaded catalogue"
    );
    Ok(sink.observations)
}

pub fn builtin() -> Result<Vec<Observation>> {
    parse("<builtin aarch64>", AARCH64, Format::Toml)
}

/// Flattens environments into observations, keeping track of the index that
/// errors need to report.
#[derive(Default)]
struct Sink {
    observations: Vec<Observation>,
    environments: usize,
}

impl Sink {
    fn next_index(&self) -> usize {
        self.observations.len()
    }

    fn malformed(&self, reason: impl Into<String>) -> Error {
        Error::malformed(self.next_index(), reason)
    }

    fn begin_environment(&mut self) {
        self.environments += 1;
    }

    fn push(&mut self, environment: &str, register: &str, fields: Fields) {
        self.observations.push(Observation::new(environment, register, fields));
    }
}
