// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for `batch-bench`.
//!
//! Set these options in `.batch-bench.toml` at the root of the fixture workspace, or pass a
//! different file with `--config`. Every option is optional.
//!
//! ```toml
//! ## The build orchestrator executable, looked up in `bin-dir`.
//! orchestrator = "nx"
//! bin-dir = "node_modules/.bin"
//! ## Builds run `<orchestrator> run <scenario>-pkg1:<target>`.
//! target = "build"
//! ## The label used for the build tool in titles and the summary.
//! tool-label = "@nx/js:tsc"
//! ## Set to "true" in the environment of batch-mode builds.
//! batch-env = "NX_BATCH_MODE"
//! ## Arguments passed to the orchestrator to clear its cache.
//! cache-reset-args = ["reset"]
//! ## Build output, removed before cold builds.
//! output-dir = "dist"
//!
//! ## Package source units live at `<packages-dir>/<package>/<source-file>`.
//! packages-dir = "packages"
//! source-file = "src/index.ts"
//! ## Appended to a source unit to affect its package.
//! marker = "//"
//!
//! ## Timed repetitions per measurement point.
//! repetitions = 3
//! ## Percentages of packages affected for incremental measurements.
//! percentages = [10, 20, 50]
//! ```

use crate::helpers::read_optional;
use batch_bench::{ReportPrinter, TrialOptions, WorkspaceLayout};
use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::{
    eyre::{bail, WrapErr},
    Result,
};
use serde::Deserialize;

/// The configuration file looked up at the workspace root.
pub(crate) const CONFIG_PATH: &str = ".batch-bench.toml";

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct BenchConfig {
    pub(crate) orchestrator: String,
    pub(crate) bin_dir: Utf8PathBuf,
    pub(crate) target: String,
    pub(crate) tool_label: String,
    pub(crate) batch_env: String,
    pub(crate) cache_reset_args: Vec<String>,
    pub(crate) output_dir: Utf8PathBuf,
    pub(crate) packages_dir: Utf8PathBuf,
    pub(crate) source_file: Utf8PathBuf,
    pub(crate) marker: String,
    pub(crate) repetitions: usize,
    pub(crate) percentages: Vec<u32>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            orchestrator: "nx".to_owned(),
            bin_dir: "node_modules/.bin".into(),
            target: "build".to_owned(),
            tool_label: ReportPrinter::DEFAULT_TOOL_LABEL.to_owned(),
            batch_env: "NX_BATCH_MODE".to_owned(),
            cache_reset_args: vec!["reset".to_owned()],
            output_dir: "dist".into(),
            packages_dir: WorkspaceLayout::DEFAULT_PACKAGES_DIR.into(),
            source_file: WorkspaceLayout::DEFAULT_SOURCE_FILE.into(),
            marker: WorkspaceLayout::DEFAULT_MARKER.to_owned(),
            repetitions: TrialOptions::DEFAULT_REPETITIONS,
            percentages: vec![10, 20, 50],
        }
    }
}

impl BenchConfig {
    /// Loads configuration from `explicit` if specified, otherwise from the default path under
    /// `workspace_root` if it exists, otherwise returns the defaults.
    pub(crate) fn load(workspace_root: &Utf8Path, explicit: Option<&Utf8Path>) -> Result<Self> {
        let (path, contents) = match explicit {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .wrap_err_with(|| format!("error reading config at {}", path))?;
                (path.to_owned(), contents)
            }
            None => {
                let path = workspace_root.join(CONFIG_PATH);
                match read_optional(&path)? {
                    Some(contents) => (path, contents),
                    None => return Ok(Self::default()),
                }
            }
        };

        let config = Self::parse(&contents)
            .wrap_err_with(|| format!("error parsing config at {}", path))?;
        log::debug!("loaded config from {}", path);
        Ok(config)
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.repetitions == 0 {
            bail!("repetitions must be at least 1");
        }
        if let Some(percentage) = self.percentages.iter().find(|&&p| p > 100) {
            bail!("percentage {} is greater than 100", percentage);
        }
        Ok(())
    }

    /// Returns the workspace layout described by this config.
    pub(crate) fn layout(&self, workspace_root: &Utf8Path) -> WorkspaceLayout {
        let mut layout = WorkspaceLayout::new(workspace_root);
        layout
            .set_packages_dir(&self.packages_dir)
            .set_source_file(&self.source_file)
            .set_marker(&self.marker);
        layout
    }
}
