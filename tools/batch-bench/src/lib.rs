// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `batch-bench` measures how much faster batched builds are than per-task builds, across
//! synthetic multi-package workspaces.
//!
//! A *scenario* is a fixed dependency-tree shape: a root package, some number of children per
//! root, some number of children per child, and so on. For each scenario, builds are timed at a
//! fixed set of *measurement points*:
//!
//! * a cold build, with build output and cache cleared before every run
//! * incremental builds with roughly 10%, 20% and 50% of packages affected
//! * an incremental build with only the deepest leaf dependency affected.
//!
//! Each point is measured once with the build orchestrator in normal mode and once in batch mode,
//! and the summary reports `normal / batch` for every point.
//!
//! # Example
//!
//! ```
//! use batch_bench::{MutationSet, Scenario};
//!
//! let small = Scenario::small();
//! let target = small.affected_target(50);
//! assert_eq!(target.count(), 5);
//!
//! let names: Vec<_> = MutationSet::select(small, target.count())
//!     .package_names(small)
//!     .collect();
//! assert_eq!(
//!     names,
//!     ["small-pkg1", "small-pkg1-1", "small-pkg1-2", "small-pkg1-3", "small-pkg1-1-1"],
//! );
//! ```
//!
//! This crate contains the measurement engine. The `batch-bench` command-line tool drives a real
//! build orchestrator with it.

pub mod errors;
mod mutate;
mod plan;
mod report;
mod results;
mod scenario;
mod topology;
mod trial;

pub use errors::{MutateError, MutateErrorKind, UnknownScenario};
pub use mutate::{TopologyMutator, WorkspaceLayout};
pub use plan::{ExecutionMode, MeasurementPoint, PointKind};
pub use report::ReportPrinter;
pub use results::{BenchSummary, Comparison, ResultAggregator};
pub use scenario::{AffectedTarget, Scenario};
pub use topology::{leaf_dependency, LevelIter, MutationSet, PackagePath};
pub use trial::{TrialHooks, TrialOptions, TrialResult, TrialRunner};
