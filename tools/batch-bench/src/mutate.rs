// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Affecting packages on disk.
//!
//! A package is affected by appending a no-op marker to its single source unit. Mutations compound:
//! affecting the same package twice appends the marker twice, so the workspace must be restored
//! between runs for results to be reproducible.

use crate::{
    errors::MutateError,
    scenario::Scenario,
    topology::{leaf_dependency, MutationSet, PackagePath},
};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::{fs::OpenOptions, io::Write};

/// Where package source units live within a fixture workspace.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WorkspaceLayout {
    root: Utf8PathBuf,
    packages_dir: Utf8PathBuf,
    source_file: Utf8PathBuf,
    marker: String,
}

impl WorkspaceLayout {
    /// The default directory containing one directory per package.
    pub const DEFAULT_PACKAGES_DIR: &'static str = "packages";
    /// The default source unit, relative to a package directory.
    pub const DEFAULT_SOURCE_FILE: &'static str = "src/index.ts";
    /// The default marker appended to a source unit.
    pub const DEFAULT_MARKER: &'static str = "//";

    /// Creates a layout rooted at `root` with default paths and marker.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            packages_dir: Self::DEFAULT_PACKAGES_DIR.into(),
            source_file: Self::DEFAULT_SOURCE_FILE.into(),
            marker: Self::DEFAULT_MARKER.to_owned(),
        }
    }

    pub fn set_packages_dir(&mut self, packages_dir: impl Into<Utf8PathBuf>) -> &mut Self {
        self.packages_dir = packages_dir.into();
        self
    }

    pub fn set_source_file(&mut self, source_file: impl Into<Utf8PathBuf>) -> &mut Self {
        self.source_file = source_file.into();
        self
    }

    pub fn set_marker(&mut self, marker: impl Into<String>) -> &mut Self {
        self.marker = marker.into();
        self
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Returns the absolute path to a package's source unit.
    pub fn source_path(&self, package_name: &str) -> Utf8PathBuf {
        self.root
            .join(&self.packages_dir)
            .join(package_name)
            .join(&self.source_file)
    }
}

/// Affects packages of a scenario within a fixture workspace.
#[derive(Clone, Debug)]
pub struct TopologyMutator<'a> {
    scenario: &'a Scenario,
    layout: &'a WorkspaceLayout,
}

impl<'a> TopologyMutator<'a> {
    pub fn new(scenario: &'a Scenario, layout: &'a WorkspaceLayout) -> Self {
        Self { scenario, layout }
    }

    /// Affects up to `count` packages in breadth-first order, returning the packages affected.
    ///
    /// Fails on the first package whose source unit is missing. Packages before it stay mutated.
    pub fn affect(&self, count: usize) -> Result<MutationSet, MutateError> {
        let set = MutationSet::select(self.scenario, count);
        for path in set.packages() {
            self.update(path)?;
        }
        debug!("affected {} packages in {}", set.len(), self.scenario.name());
        Ok(set)
    }

    /// Affects the single leaf dependency at the end of the all-first-child path.
    pub fn affect_leaf_dependency(&self) -> Result<PackagePath, MutateError> {
        let leaf = leaf_dependency(self.scenario);
        self.update(&leaf)?;
        Ok(leaf)
    }

    fn update(&self, path: &PackagePath) -> Result<(), MutateError> {
        let package = path.package_name(self.scenario);
        let source = self.layout.source_path(&package);

        // Opening without `create` makes a missing source unit an error.
        let result = OpenOptions::new()
            .append(true)
            .open(&source)
            .and_then(|mut file| file.write_all(self.layout.marker.as_bytes()));
        match result {
            Ok(()) => Ok(()),
            Err(err) => Err(MutateError::new(package, source, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_paths() {
        let mut layout = WorkspaceLayout::new("/ws");
        assert_eq!(
            layout.source_path("small-pkg1-2"),
            Utf8PathBuf::from("/ws/packages/small-pkg1-2/src/index.ts")
        );
        layout.set_packages_dir("libs").set_source_file("lib.rs");
        assert_eq!(
            layout.source_path("small-pkg1"),
            Utf8PathBuf::from("/ws/libs/small-pkg1/lib.rs")
        );
    }
}
