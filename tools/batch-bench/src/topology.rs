// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Package positions within a scenario's dependency tree, and affected-package selection.
//!
//! Every package is identified by its index path from the root: the root is `[1]`, its children
//! are `[1, 1]`, `[1, 2]` and so on. Sibling indexes are 1-based to match the package names on
//! disk (`small-pkg1-2-1` is the first child of the second child of the root).

use crate::scenario::Scenario;
use std::fmt;

/// The position of a package in a scenario's tree.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PackagePath {
    indexes: Vec<usize>,
}

impl PackagePath {
    /// Returns the path to the root package.
    pub fn root() -> Self {
        Self { indexes: vec![1] }
    }

    /// Creates a path from 1-based sibling indexes, starting with the root.
    pub fn new(indexes: impl IntoIterator<Item = usize>) -> Self {
        let indexes: Vec<_> = indexes.into_iter().collect();
        assert_eq!(indexes.first(), Some(&1), "package paths start at the root");
        Self { indexes }
    }

    /// Returns the depth of this package. The root is at depth 0.
    pub fn depth(&self) -> usize {
        self.indexes.len() - 1
    }

    /// Returns the 1-based sibling indexes along this path.
    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    /// Returns the name of the package in the given scenario's workspace.
    pub fn package_name(&self, scenario: &Scenario) -> String {
        PackageName {
            scenario: scenario.name(),
            path: self,
        }
        .to_string()
    }
}

struct PackageName<'a> {
    scenario: &'a str,
    path: &'a PackagePath,
}

impl<'a> fmt::Display for PackageName<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-pkg", self.scenario)?;
        let mut first = true;
        for index in &self.path.indexes {
            if first {
                write!(f, "{}", index)?;
                first = false;
            } else {
                write!(f, "-{}", index)?;
            }
        }
        Ok(())
    }
}

/// Iterates over every package at one depth of a scenario's tree, grouped by parent and then by
/// sibling index.
#[derive(Clone, Debug)]
pub struct LevelIter<'a> {
    levels: &'a [usize],
    next: Option<Vec<usize>>,
}

impl<'a> LevelIter<'a> {
    /// Returns an iterator over packages at `depth`. Yields nothing if `depth` is out of range or
    /// some level has no packages.
    pub fn new(scenario: &'a Scenario, depth: usize) -> Self {
        let levels = scenario.levels();
        let next = if depth < levels.len() && levels[..=depth].iter().all(|&width| width > 0) {
            Some(vec![1; depth + 1])
        } else {
            None
        };
        Self {
            levels: &levels[..next.as_ref().map_or(0, |indexes| indexes.len())],
            next,
        }
    }
}

impl<'a> Iterator for LevelIter<'a> {
    type Item = PackagePath;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        // Advance like an odometer, with each position bounded by that level's fan-out.
        let mut following = current.clone();
        let mut pos = following.len();
        while pos > 0 {
            pos -= 1;
            if following[pos] < self.levels[pos] {
                following[pos] += 1;
                self.next = Some(following);
                break;
            }
            following[pos] = 1;
        }

        Some(PackagePath { indexes: current })
    }
}

/// The ordered set of packages chosen to be affected.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MutationSet {
    packages: Vec<PackagePath>,
}

impl MutationSet {
    /// Selects up to `count` packages breadth-first: the root, then every package at depth 1, then
    /// every package at depth 2, and so on.
    pub fn select(scenario: &Scenario, count: usize) -> Self {
        let packages = (0..=scenario.max_depth())
            .flat_map(|depth| LevelIter::new(scenario, depth))
            .take(count)
            .collect();
        Self { packages }
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn packages(&self) -> &[PackagePath] {
        &self.packages
    }

    /// Returns the names of the selected packages in selection order.
    pub fn package_names<'a>(
        &'a self,
        scenario: &'a Scenario,
    ) -> impl Iterator<Item = String> + 'a {
        self.packages
            .iter()
            .map(move |path| path.package_name(scenario))
    }
}

/// Returns the deepest package reachable by always picking the first child.
///
/// Changing this package invalidates a full dependency chain up to the root.
pub fn leaf_dependency(scenario: &Scenario) -> PackagePath {
    let depth = scenario
        .levels()
        .iter()
        .take_while(|&&width| width > 0)
        .count();
    PackagePath {
        indexes: vec![1; depth.max(1)],
    }
}
