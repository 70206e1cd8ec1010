// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Restoring the fixture workspace after a run.

use camino::Utf8Path;
use color_eyre::{eyre::WrapErr, Result};
use log::{error, info};

/// RAII guard to ensure mutated package sources are reverted after a run.
///
/// Call [`finish`](Self::finish) at the end of a successful run. If the guard is dropped without
/// that, for example because the run failed, one restore is attempted and its errors are ignored.
#[derive(Debug)]
pub(crate) struct WorkspaceCleanup<'a> {
    inner: Option<CleanupInner<'a>>,
}

impl<'a> WorkspaceCleanup<'a> {
    pub(crate) fn new(workspace_root: &'a Utf8Path, verbose: bool) -> Self {
        Self {
            inner: Some(CleanupInner {
                workspace_root,
                verbose,
            }),
        }
    }

    /// A guard that leaves the workspace as is.
    pub(crate) fn none() -> Self {
        Self { inner: None }
    }

    pub(crate) fn finish(&mut self, success: bool) -> Result<()> {
        match self.inner.take() {
            Some(inner) => inner.finish(success),
            None => {
                // Disabled, or `finish` was already called.
                Ok(())
            }
        }
    }
}

impl<'a> Drop for WorkspaceCleanup<'a> {
    fn drop(&mut self) {
        // Ignore errors in this impl.
        let _ = self.finish(false);
    }
}

#[derive(Debug)]
struct CleanupInner<'a> {
    workspace_root: &'a Utf8Path,
    verbose: bool,
}

impl<'a> CleanupInner<'a> {
    fn finish(self, success: bool) -> Result<()> {
        if success {
            info!("restoring package changes");
        } else {
            error!("run failed, restoring package changes");
        }

        let expression = duct::cmd!("git", "restore", ".").dir(self.workspace_root.as_std_path());
        let expression = if self.verbose {
            expression
        } else {
            expression.stdout_null()
        };
        expression
            .run()
            .wrap_err_with(|| format!("`git restore .` failed in {}", self.workspace_root))?;
        Ok(())
    }
}
