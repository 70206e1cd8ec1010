// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Folding trial results into normal-versus-batch comparisons.

use crate::{
    plan::{ExecutionMode, MeasurementPoint, PointKind},
    trial::TrialResult,
};
use log::warn;

/// Collects trial results for every measurement point of a scenario.
#[derive(Clone, Debug)]
pub struct ResultAggregator {
    scenario: &'static str,
    entries: Vec<Entry>,
}

#[derive(Clone, Debug)]
struct Entry {
    kind: PointKind,
    normal: Option<TrialResult>,
    batch: Option<TrialResult>,
}

impl ResultAggregator {
    /// Creates an aggregator with one slot per point in `plan`.
    pub fn new(scenario: &'static str, plan: &[MeasurementPoint]) -> Self {
        let entries = plan
            .iter()
            .map(|point| Entry {
                kind: point.kind().clone(),
                normal: None,
                batch: None,
            })
            .collect();
        Self { scenario, entries }
    }

    /// Records the result for the point at `index` in the plan.
    ///
    /// Panics if `index` is out of range, or if a result was already recorded for this point and
    /// mode.
    pub fn record(&mut self, index: usize, mode: ExecutionMode, result: TrialResult) {
        let entry = &mut self.entries[index];
        let slot = match mode {
            ExecutionMode::Normal => &mut entry.normal,
            ExecutionMode::Batch => &mut entry.batch,
        };
        assert!(
            slot.is_none(),
            "result for {} ({}) recorded twice",
            entry.kind.label(),
            mode
        );
        *slot = Some(result);
    }

    /// Computes comparisons for every point that has results for both modes.
    pub fn finish(self) -> BenchSummary {
        let comparisons = self
            .entries
            .into_iter()
            .filter_map(|entry| match (entry.normal, entry.batch) {
                (Some(normal), Some(batch)) => Some(Comparison {
                    point: entry.kind,
                    normal_mean_ms: normal.mean_ms(),
                    batch_mean_ms: batch.mean_ms(),
                }),
                _ => {
                    warn!("skipping {}: missing results", entry.kind.label());
                    None
                }
            })
            .collect();
        BenchSummary {
            scenario: self.scenario,
            comparisons,
        }
    }
}

/// The final results of a benchmark run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize))]
pub struct BenchSummary {
    pub scenario: &'static str,
    pub comparisons: Vec<Comparison>,
}

/// Mean build times in both modes for one measurement point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize))]
pub struct Comparison {
    pub point: PointKind,
    pub normal_mean_ms: f64,
    pub batch_mean_ms: f64,
}

impl Comparison {
    /// Returns `normal / batch`. Values above 1 mean batch execution is faster.
    ///
    /// A zero batch time produces an infinite or NaN ratio.
    pub fn speedup(&self) -> f64 {
        self.normal_mean_ms / self.batch_mean_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;
    use std::time::Duration;

    fn result(millis: &[u64]) -> TrialResult {
        TrialResult::from_samples(millis.iter().map(|&ms| Duration::from_millis(ms)).collect())
    }

    #[test]
    fn speedup_ratio() {
        let plan = MeasurementPoint::standard_plan(Scenario::medium(), &[10], 3);
        let mut aggregator = ResultAggregator::new("medium", &plan);
        aggregator.record(0, ExecutionMode::Normal, result(&[100, 200, 300]));
        aggregator.record(0, ExecutionMode::Batch, result(&[50, 100, 150]));
        // Only the normal mode was measured for the second point.
        aggregator.record(1, ExecutionMode::Normal, result(&[10, 10, 10]));

        let summary = aggregator.finish();
        assert_eq!(summary.scenario, "medium");
        assert_eq!(summary.comparisons.len(), 1);
        let cold = &summary.comparisons[0];
        assert_eq!(cold.point, PointKind::Cold);
        assert!((cold.normal_mean_ms - 200.0).abs() < 1e-9);
        assert!((cold.batch_mean_ms - 100.0).abs() < 1e-9);
        assert!((cold.speedup() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_batch_time_is_surfaced() {
        let comparison = Comparison {
            point: PointKind::Cold,
            normal_mean_ms: 5.0,
            batch_mean_ms: 0.0,
        };
        assert!(comparison.speedup().is_infinite());
    }

    #[test]
    #[should_panic(expected = "recorded twice")]
    fn double_record_panics() {
        let plan = vec![MeasurementPoint::cold(3)];
        let mut aggregator = ResultAggregator::new("small", &plan);
        aggregator.record(0, ExecutionMode::Batch, result(&[1]));
        aggregator.record(0, ExecutionMode::Batch, result(&[1]));
    }
}
