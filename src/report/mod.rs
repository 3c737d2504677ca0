// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Turns a flat list of observations into one comparison table per register.
//!
//! Registers are listed in lexicographic order. Each table has one row per
//! field, in the order the register's first observation lists them, and one
//! column per environment that reported the register, in lexicographic order
//! of the environment labels. Columns are numbered from 0 per register and a
//! legend above the table maps the numbers back to the labels.
//!
//! The text layout lives in `markdown.rs`.

mod markdown;

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::group::{EnvironmentIndex, RegisterGroup, group_observations};
use crate::observation::Observation;

pub const DEFAULT_TITLE: &str = "Some system registers";

/// How the cells of a row are matched up with the table's columns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColumnPolicy {
    /// Cells are read out in column order, keyed by environment.
    /// A column whose environment lacks the field gets an empty cell.
    #[default]
    Aligned,
    /// Cells are appended in the order the observations were listed and
    /// observations lacking the field contribute nothing. This only lines up
    /// with the header when the source list is already sorted by environment,
    /// and exists to reproduce tables generated that way byte for byte.
    SourceOrder,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub field: String,
    pub cells: Vec<String>,
}

impl Row {
    fn is_uniform(&self) -> bool {
        self.cells.windows(2).all(|w| w[0] == w[1])
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterSection {
    /// Running index in the report, starting at 0.
    pub index: usize,
    pub register: String,
    /// Column `i` of the table belongs to `environments[i]`.
    pub environments: Vec<String>,
    pub rows: Vec<Row>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub sections: Vec<RegisterSection>,
}

impl Report {
    pub fn section(&self, register: &str) -> Option<&RegisterSection> {
        self.sections.iter().find(|s| s.register == register)
    }
}

#[derive(Clone, Debug)]
pub struct RegisterReportBuilder {
    title: String,
    policy: ColumnPolicy,
    differing_only: bool,
    registers: Option<Vec<String>>,
}

impl Default for RegisterReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterReportBuilder {
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            policy: ColumnPolicy::default(),
            differing_only: false,
            registers: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn column_policy(mut self, policy: ColumnPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Drop rows on which every environment agrees.
    /// Sections are kept even if all of their rows are dropped.
    pub fn differing_only(mut self, differing_only: bool) -> Self {
        self.differing_only = differing_only;
        self
    }

    /// Restrict the report to the given registers. Indices are assigned after filtering.
    pub fn only_registers<I, S>(mut self, registers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let registers: Vec<String> = registers.into_iter().map(Into::into).collect();
        self.registers = if registers.is_empty() { None } else { Some(registers) };
        self
    }

    pub fn build(&self, observations: &[Observation]) -> Result<Report> {
        validate(observations)?;

        let groups = group_observations(observations);
        let index = EnvironmentIndex::new(observations);
        debug!(
            observations = observations.len(),
            registers = groups.len(),
            environments = index.len(),
            "grouped observations"
        );

        if let Some(wanted) = &self.registers {
            if let Some(missing) = wanted.iter().find(|r| !groups.contains_key(r.as_str())) {
                return Err(Error::UnknownRegister(missing.clone()));
            }
        }

        let selected = groups.values().filter(|g| match &self.registers {
            Some(wanted) => wanted.iter().any(|r| r.as_str() == g.name),
            None => true,
        });

        let sections = selected
            .enumerate()
            .map(|(i, group)| self.build_section(i, group, &index))
            .collect();

        Ok(Report { title: self.title.clone(), sections })
    }

    fn build_section(
        &self,
        index: usize,
        group: &RegisterGroup<'_>,
        environments: &EnvironmentIndex<'_>,
    ) -> RegisterSection {
        check_field_sets(group);

        let columns = environments.restrict(group);
        let mut rows: Vec<Row> = group
            .field_order
            .iter()
            .map(|&field| Row {
                field: field.to_string(),
                cells: match self.policy {
                    ColumnPolicy::Aligned => aligned_cells(group, &columns, field),
                    ColumnPolicy::SourceOrder => source_order_cells(group, &columns, field),
                },
            })
            .collect();

        if self.differing_only {
            rows.retain(|row| !row.is_uniform());
        }

        RegisterSection {
            index,
            register: group.name.to_string(),
            environments: columns.iter().map(|e| e.to_string()).collect(),
            rows,
        }
    }
}

fn validate(observations: &[Observation]) -> Result<()> {
    for (i, obs) in observations.iter().enumerate() {
        if obs.environment().is_empty() {
            return Err(Error::malformed(i, "empty environment label"));
        }
        if obs.register_name().is_empty() {
            return Err(Error::malformed(i, "empty register name"));
        }
    }
    Ok(())
}

fn aligned_cells(group: &RegisterGroup<'_>, columns: &[&str], field: &str) -> Vec<String> {
    columns
        .iter()
        .map(|&env| {
            // If an environment reported the register twice, its first observation
            // that has the field wins.
            group
                .observations
                .iter()
                .filter(|o| o.environment() == env)
                .find_map(|o| o.fields().get(field))
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

fn source_order_cells(group: &RegisterGroup<'_>, columns: &[&str], field: &str) -> Vec<String> {
    group
        .observations
        .iter()
        .filter(|o| columns.iter().any(|&c| c == o.environment()))
        .filter_map(|o| o.fields().get(field))
        .map(str::to_string)
        .collect()
}

fn check_field_sets(group: &RegisterGroup<'_>) {
    let canonical: BTreeSet<&str> = group.field_order.iter().copied().collect();
    let mut seen = BTreeSet::new();

    for obs in &group.observations[1..] {
        let fields: BTreeSet<&str> = obs.fields().names().collect();
        let missing: Vec<_> = canonical.difference(&fields).collect();
        let extra: Vec<_> = fields.difference(&canonical).collect();
        if !missing.is_empty() || !extra.is_empty() {
            warn!(
                register = group.name,
                environment = obs.environment(),
                ?missing,
                ?extra,
                "field set differs from the first observation"
            );
        }
    }

    for obs in &group.observations {
        if !seen.insert(obs.environment()) {
            warn!(
                register = group.name,
                environment = obs.environment(),
                "environment reported the register more than once"
            );
        }
    }
}
