// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `batch-bench` is a command-line application to measure how much faster a build orchestrator's
//! batch execution mode is than running one process per task.
//!
//! # Usage
//!
//! Run from the root of a fixture workspace containing one directory per package under
//! `packages/`, with the build orchestrator installed under `node_modules/.bin`:
//!
//! ```sh
//! batch-bench run --pkg-size medium
//! ```
//!
//! For each measurement point (a cold build, builds with about 10%, 20% and 50% of packages
//! affected, and a build with just the leaf dependency affected) the root package is built a few
//! times in normal mode and a few times with batch execution turned on. A summary of average
//! times and speedups is printed at the end, and all package changes are reverted with
//! `git restore .`.
//!
//! Pass `--verbose` to see the build orchestrator's own output.
//!
//! To list known scenarios:
//!
//! ```sh
//! batch-bench list
//! ```
//!
//! # Configuration
//!
//! Paths, the orchestrator command and the measurement plan can be changed through
//! `.batch-bench.toml` at the root of the workspace. For the available options, see the
//! [`config` module](config).
//!
//! # Caveats
//!
//! Measurements assume that nothing else touches the workspace while a run is in progress.

mod cleanup;
mod command;
pub mod config;
mod helpers;
mod orchestrator;
mod output;

pub use command::Args;
