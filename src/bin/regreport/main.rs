// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::Context as _;
use argh::FromArgs;
use regreport::group::{EnvironmentIndex, group_observations};
use regreport::report::DEFAULT_TITLE;
use regreport::{ColumnPolicy, Observation, RegisterReportBuilder, catalogue};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(FromArgs, PartialEq, Debug)]
#[argh(description = "Compare AArch64 system register snapshots across environments")]
struct Command {
    #[argh(
        option,
        description = "catalogue file (.toml or .json); defaults to the built-in AArch64 catalogue"
    )]
    catalogue: Option<PathBuf>,
    #[argh(subcommand)]
    sub: Option<SubCommands>,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
enum SubCommands {
    Render(SubCommandRender),
    Environments(SubCommandEnvironments),
    Registers(SubCommandRegisters),
}

#[derive(FromArgs, PartialEq, Debug, Default)]
#[argh(subcommand, name = "render", description = "Render the markdown report (default)")]
struct SubCommandRender {
    #[argh(option, description = "write the report to this file instead of stdout")]
    output: Option<PathBuf>,
    #[argh(option, description = "title of the report")]
    title: Option<String>,
    #[argh(
        switch,
        description = "fill cells in catalogue order instead of column order, like older reports did"
    )]
    source_order: bool,
    #[argh(switch, description = "only show fields whose value differs between environments")]
    differing_only: bool,
    #[argh(option, description = "only include this register; may be repeated")]
    register: Vec<String>,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand, name = "environments", description = "List all environments")]
struct SubCommandEnvironments {}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "registers",
    description = "List all registers and how many environments reported each"
)]
struct SubCommandRegisters {}

pub fn main() {
    if let Err(e) = run() {
        eprintln!("{e:#}");
        exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    init_logging();

    let command: Command = argh::from_env();
    let observations = load_catalogue(command.catalogue.as_deref())?;

    match command.sub.unwrap_or(SubCommands::Render(SubCommandRender::default())) {
        SubCommands::Render(cmd) => run_render(&cmd, &observations)?,
        SubCommands::Environments(_) => {
            let index = EnvironmentIndex::new(&observations);
            let mut out = stdout().lock();
            for (i, label) in index.labels().iter().enumerate() {
                writeln!(out, "{i}. {label}")?;
            }
        }
        SubCommands::Registers(_) => {
            let groups = group_observations(&observations);
            let mut out = stdout().lock();
            for group in groups.values() {
                writeln!(out, "{} ({})", group.name, group.environments().len())?;
            }
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("REGREPORT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_catalogue(path: Option<&Path>) -> anyhow::Result<Vec<Observation>> {
    match path {
        Some(path) => catalogue::load(path)
            .with_context(|| format!("loading catalogue {}", path.display())),
        None => catalogue::builtin().context("loading the built-in catalogue"),
    }
}

fn run_render(cmd: &SubCommandRender, observations: &[Observation]) -> anyhow::Result<()> {
    let policy = if cmd.source_order { ColumnPolicy::SourceOrder } else { ColumnPolicy::Aligned };
    let report = RegisterReportBuilder::new()
        .title(cmd.title.as_deref().unwrap_or(DEFAULT_TITLE))
        .column_policy(policy)
        .differing_only(cmd.differing_only)
        .only_registers(cmd.register.iter().cloned())
        .build(observations)?;

    match &cmd.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            report.write_to(&mut BufWriter::new(file))?;
        }
        None => report.write_to(&mut stdout().lock())?,
    }

    Ok(())
}
