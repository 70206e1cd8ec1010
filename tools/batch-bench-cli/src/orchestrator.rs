// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Build orchestrator CLI support.

use crate::{config::BenchConfig, helpers::remove_dir_all_if_exists, output::OutputContext};
use batch_bench::{ExecutionMode, TrialHooks};
use camino::{Utf8Path, Utf8PathBuf};
use cfg_if::cfg_if;
use color_eyre::{eyre::WrapErr, Report, Result};
use log::{debug, warn};
use owo_colors::OwoColorize;

#[derive(Clone, Debug)]
pub(crate) struct OrchestratorCli<'a> {
    program: Utf8PathBuf,
    workspace_root: &'a Utf8Path,
    config: &'a BenchConfig,
    output: OutputContext,
}

impl<'a> OrchestratorCli<'a> {
    pub(crate) fn new(
        workspace_root: &'a Utf8Path,
        config: &'a BenchConfig,
        output: OutputContext,
    ) -> Self {
        let program = workspace_root
            .join(&config.bin_dir)
            .join(executable_name(&config.orchestrator));
        Self {
            program,
            workspace_root,
            config,
            output,
        }
    }

    /// Returns the arguments for building `package`.
    pub(crate) fn build_args(&self, package: &str) -> Vec<String> {
        vec![
            "run".to_owned(),
            format!("{}:{}", package, self.config.target),
        ]
    }

    pub(crate) fn build_expression(&self, package: &str, mode: ExecutionMode) -> duct::Expression {
        let expression = self.expression(self.build_args(package));
        match mode {
            ExecutionMode::Normal => expression,
            ExecutionMode::Batch => expression.env(&self.config.batch_env, "true"),
        }
    }

    /// Builds `package` and waits for the orchestrator to exit.
    ///
    /// Failures are logged but otherwise ignored: only the time taken matters.
    pub(crate) fn run_build(&self, package: &str, mode: ExecutionMode) {
        match self.build_expression(package, mode).unchecked().run() {
            Ok(output) if output.status.success() => {}
            Ok(output) => warn!(
                "{} build of {} exited with {}",
                mode,
                package.style(self.output.styles.scenario),
                output.status
            ),
            Err(err) => warn!(
                "{} build of {} failed to run: {}",
                mode,
                package.style(self.output.styles.scenario),
                err
            ),
        }
    }

    /// Clears the orchestrator's cache.
    pub(crate) fn reset_cache(&self) -> Result<()> {
        let args = &self.config.cache_reset_args;
        debug!(
            "{} {} {}",
            "executing".style(self.output.styles.command),
            self.program,
            args.join(" ")
        );
        self.expression(args.iter().cloned())
            .run()
            .wrap_err_with(|| format!("`{} {}` failed", self.program, args.join(" ")))?;
        Ok(())
    }

    fn expression(&self, args: impl IntoIterator<Item = String>) -> duct::Expression {
        let expression = duct::cmd(self.program.as_std_path(), args).dir(self.workspace_root.as_std_path());
        if self.output.verbose {
            expression
        } else {
            expression.stdout_capture().stderr_capture()
        }
    }
}

// On Unix-like operating systems, binaries installed by package managers usually don't have a
// file extension, while on Windows they are usually wrapped in ".cmd" scripts.
fn executable_name(name: &str) -> String {
    cfg_if! {
        if #[cfg(target_os = "windows")] {
            format!("{}.cmd", name)
        } else {
            name.to_owned()
        }
    }
}

/// Clears build output and the orchestrator's cache between timed repetitions.
#[derive(Debug)]
pub(crate) struct WorkspaceReset<'a> {
    cli: &'a OrchestratorCli<'a>,
    output_dir: Utf8PathBuf,
}

impl<'a> WorkspaceReset<'a> {
    pub(crate) fn new(cli: &'a OrchestratorCli<'a>) -> Self {
        let output_dir = cli.workspace_root.join(&cli.config.output_dir);
        Self { cli, output_dir }
    }
}

impl<'a> TrialHooks for WorkspaceReset<'a> {
    type Error = Report;

    fn reset_output(&mut self) -> Result<()> {
        debug!(
            "removing {}",
            self.output_dir.style(self.cli.output.styles.path)
        );
        remove_dir_all_if_exists(&self.output_dir)
    }

    fn reset_cache(&mut self) -> Result<()> {
        self.cli.reset_cache()
    }
}
