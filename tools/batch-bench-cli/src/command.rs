// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    cleanup::WorkspaceCleanup,
    config::BenchConfig,
    orchestrator::{OrchestratorCli, WorkspaceReset},
    output::{OutputContext, OutputOpts},
};
use batch_bench::{
    BenchSummary, ExecutionMode, MeasurementPoint, PointKind, ReportPrinter, ResultAggregator,
    Scenario, TopologyMutator, TrialRunner,
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use log::info;
use owo_colors::OwoColorize;
use std::{convert::TryFrom, io::Write};

/// Measure batched versus per-task builds in synthetic multi-package workspaces.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Args {
    #[clap(flatten)]
    output: OutputOpts,

    #[clap(subcommand)]
    command: Command,
}

impl Args {
    /// Executes this command.
    pub fn exec(self) -> Result<()> {
        let output = self.output.init();
        match self.command {
            Command::Run(opts) => opts.exec(output),
            Command::List => list(),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the benchmark for a scenario
    Run(RunOpts),
    /// List known scenarios
    List,
}

fn list() -> Result<()> {
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    for scenario in Scenario::all().values() {
        writeln!(stdout, "{}", scenario)?;
    }
    Ok(())
}

#[derive(Debug, Parser)]
struct RunOpts {
    /// Scenario to run the benchmark for (see `batch-bench list`)
    #[clap(long = "pkg-size", value_name = "SCENARIO")]
    pkg_size: String,

    /// Root of the fixture workspace [default: current directory]
    #[clap(long, value_name = "DIR")]
    workspace_root: Option<Utf8PathBuf>,

    /// Configuration file [default: <workspace-root>/.batch-bench.toml, if present]
    #[clap(long, value_name = "PATH")]
    config: Option<Utf8PathBuf>,

    /// Timed repetitions per measurement point, overriding the config
    #[clap(long)]
    repetitions: Option<usize>,

    /// Also print the summary to stdout as JSON
    #[clap(long)]
    json: bool,

    /// Leave package changes in place instead of restoring them at the end
    #[clap(long)]
    no_restore: bool,
}

impl RunOpts {
    fn exec(self, output: OutputContext) -> Result<()> {
        // Resolve everything up front so that configuration errors abort before any measurement.
        let scenario = Scenario::by_name(&self.pkg_size)?;
        let workspace_root = match self.workspace_root {
            Some(root) => root,
            None => current_dir()?,
        };
        let mut config = BenchConfig::load(&workspace_root, self.config.as_deref())?;
        if let Some(repetitions) = self.repetitions {
            config.repetitions = repetitions;
            config.validate()?;
        }

        info!(
            "benchmarking scenario {} in {}",
            scenario.name().style(output.styles.scenario),
            workspace_root.style(output.styles.path),
        );

        let mut cleanup = if self.no_restore {
            WorkspaceCleanup::none()
        } else {
            WorkspaceCleanup::new(&workspace_root, output.verbose)
        };

        let mut printer = ReportPrinter::new(&config.tool_label);
        if output.color.is_enabled_for_stdout() {
            printer.colorize();
        }

        let summary = run_plan(scenario, &workspace_root, &config, &printer, &output)?;

        let stdout = std::io::stdout();
        let mut stdout = stdout.lock();
        printer.write_summary(&summary, &mut stdout)?;
        if self.json {
            serde_json::to_writer_pretty(&mut stdout, &summary)?;
            writeln!(stdout)?;
        }

        cleanup.finish(true)
    }
}

fn run_plan(
    scenario: &'static Scenario,
    workspace_root: &Utf8Path,
    config: &BenchConfig,
    printer: &ReportPrinter<'_>,
    output: &OutputContext,
) -> Result<BenchSummary> {
    let layout = config.layout(workspace_root);
    let mutator = TopologyMutator::new(scenario, &layout);
    let cli = OrchestratorCli::new(workspace_root, config, output.clone());
    let mut reset = WorkspaceReset::new(&cli);
    let mut runner = TrialRunner::new(&mut reset);

    let plan = MeasurementPoint::standard_plan(scenario, &config.percentages, config.repetitions);
    let mut aggregator = ResultAggregator::new(scenario.name(), &plan);
    let root_package = scenario.root_package();

    for (index, point) in plan.iter().enumerate() {
        for mode in ExecutionMode::ALL {
            printer.write_title(&printer.title(point, mode), std::io::stdout().lock())?;

            let result = runner
                .run(
                    point.options(),
                    || cli.run_build(&root_package, mode),
                    || {
                        match point.kind() {
                            PointKind::Cold => {}
                            PointKind::Affected(target) => {
                                mutator.affect(target.count())?;
                            }
                            PointKind::LeafDependency { .. } => {
                                mutator.affect_leaf_dependency()?;
                            }
                        }
                        Ok(())
                    },
                )
                .wrap_err_with(|| format!("measuring {} ({})", point.kind().label(), mode))?;
            aggregator.record(index, mode, result);
        }
    }

    Ok(aggregator.finish())
}

fn current_dir() -> Result<Utf8PathBuf> {
    let dir = std::env::current_dir().wrap_err("error getting current directory")?;
    Utf8PathBuf::try_from(dir)
        .map_err(|err| eyre!("current directory {} is not valid UTF-8", err.into_path_buf().display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_app() {
        Args::command().debug_assert();
    }

    #[test]
    fn parse_run() {
        let args = Args::try_parse_from(["batch-bench", "run", "--pkg-size", "small", "--verbose"])
            .expect("arguments parsed");
        assert!(args.output.verbose);
        match args.command {
            Command::Run(opts) => {
                assert_eq!(opts.pkg_size, "small");
                assert!(!opts.json);
                assert_eq!(opts.repetitions, None);
            }
            Command::List => panic!("expected run"),
        }
    }

    #[test]
    fn pkg_size_is_required() {
        assert!(Args::try_parse_from(["batch-bench", "run"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["batch-bench", "run", "--pkg-size", "small", "-q", "-v"]).is_err());
    }
}
