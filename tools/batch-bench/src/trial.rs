// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The timed-trial protocol.
//!
//! A trial optionally runs its task once unmeasured (warmup), then for each repetition:
//! 1. resets build output and the build cache, if requested
//! 2. runs the preparation hook
//! 3. times one synchronous run of the task.
//!
//! Resets must come before preparation: incremental measurements disable the cache reset so that
//! the orchestrator's own cache is exercised, and only packages mutated by preparation rebuild.

use log::info;
use std::time::{Duration, Instant};

/// Options controlling a trial.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrialOptions {
    /// Run the task once, unmeasured, before any repetitions.
    pub warmup: bool,
    /// The number of timed repetitions.
    pub repetitions: usize,
    /// Clear build output before each repetition.
    pub reset_output: bool,
    /// Clear the build cache before each repetition.
    pub reset_cache: bool,
}

impl TrialOptions {
    /// The default number of repetitions.
    pub const DEFAULT_REPETITIONS: usize = 3;

    /// Options for an incremental measurement: warm up once and never reset.
    pub fn incremental(repetitions: usize) -> Self {
        Self {
            warmup: true,
            repetitions,
            reset_output: false,
            reset_cache: false,
        }
    }
}

impl Default for TrialOptions {
    fn default() -> Self {
        Self {
            warmup: false,
            repetitions: Self::DEFAULT_REPETITIONS,
            reset_output: true,
            reset_cache: true,
        }
    }
}

/// Resets applied to the workspace between repetitions.
pub trait TrialHooks {
    /// The error returned by a failed reset or preparation.
    type Error;

    /// Removes build output.
    fn reset_output(&mut self) -> Result<(), Self::Error>;

    /// Clears the build orchestrator's cache.
    fn reset_cache(&mut self) -> Result<(), Self::Error>;
}

/// Elapsed times for every timed repetition of a trial.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrialResult {
    samples: Vec<Duration>,
}

impl TrialResult {
    pub fn from_samples(samples: Vec<Duration>) -> Self {
        Self { samples }
    }

    /// Returns the elapsed time of each repetition, in order.
    pub fn samples(&self) -> &[Duration] {
        &self.samples
    }

    /// Returns the arithmetic mean of the samples in milliseconds.
    ///
    /// This is NaN if there are no samples.
    pub fn mean_ms(&self) -> f64 {
        let total: f64 = self
            .samples
            .iter()
            .map(|sample| sample.as_secs_f64() * 1000.0)
            .sum();
        total / self.samples.len() as f64
    }
}

/// Runs trials against a set of workspace hooks.
#[derive(Debug)]
pub struct TrialRunner<'a, H> {
    hooks: &'a mut H,
}

impl<'a, H: TrialHooks> TrialRunner<'a, H> {
    pub fn new(hooks: &'a mut H) -> Self {
        Self { hooks }
    }

    /// Runs one trial of `task`.
    ///
    /// The task's own success or failure is not observed: only its elapsed time is. Errors from
    /// resets or from `prepare` abort the trial.
    pub fn run<T, P>(
        &mut self,
        options: &TrialOptions,
        mut task: T,
        mut prepare: P,
    ) -> Result<TrialResult, H::Error>
    where
        T: FnMut(),
        P: FnMut() -> Result<(), H::Error>,
    {
        if options.warmup {
            info!("Running warmup...");
            task();
        }

        let mut samples = Vec::with_capacity(options.repetitions);
        for run in 1..=options.repetitions {
            if options.reset_output {
                self.hooks.reset_output()?;
            }
            if options.reset_cache {
                self.hooks.reset_cache()?;
            }
            prepare()?;

            info!("Run {}...", run);
            let start = Instant::now();
            task();
            let elapsed = start.elapsed();
            info!("Ran in {}ms", elapsed.as_millis());
            samples.push(elapsed);
        }

        Ok(TrialResult::from_samples(samples))
    }
}
