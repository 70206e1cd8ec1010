// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed set of measurement points run for every scenario.

use crate::{
    scenario::{AffectedTarget, Scenario},
    topology::leaf_dependency,
    trial::TrialOptions,
};
use std::fmt;

/// How the build orchestrator is asked to execute tasks.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "kebab-case"))]
pub enum ExecutionMode {
    /// One process per task.
    Normal,
    /// Independent tasks are combined into fewer process invocations.
    Batch,
}

impl ExecutionMode {
    /// Both modes, in the order they are measured.
    pub const ALL: [ExecutionMode; 2] = [ExecutionMode::Normal, ExecutionMode::Batch];

    pub fn is_batch(self) -> bool {
        self == ExecutionMode::Batch
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExecutionMode::Normal => write!(f, "normal"),
            ExecutionMode::Batch => write!(f, "batch"),
        }
    }
}

/// What state the workspace is in while a point is measured.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize))]
#[cfg_attr(feature = "serde1", serde(tag = "kind", rename_all = "kebab-case"))]
pub enum PointKind {
    /// Build output and cache are cleared before every repetition.
    Cold,
    /// A percentage of packages is affected before every repetition.
    Affected(AffectedTarget),
    /// The named leaf dependency is affected before every repetition.
    LeafDependency { package: String },
}

impl PointKind {
    /// A short identifier for this point, e.g. `affected10`.
    pub fn label(&self) -> String {
        match self {
            PointKind::Cold => "cold".to_owned(),
            PointKind::Affected(target) => format!("affected{}", target.requested_percentage()),
            PointKind::LeafDependency { .. } => "leaf".to_owned(),
        }
    }
}

/// One measurement point: a workspace state plus the trial protocol used to measure it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MeasurementPoint {
    kind: PointKind,
    options: TrialOptions,
}

impl MeasurementPoint {
    /// A cold build, with output and cache reset before each repetition.
    pub fn cold(repetitions: usize) -> Self {
        Self {
            kind: PointKind::Cold,
            options: TrialOptions {
                repetitions,
                ..TrialOptions::default()
            },
        }
    }

    /// An incremental build with some packages affected. The cache is kept so that only affected
    /// packages need rebuilding.
    pub fn affected(target: AffectedTarget, repetitions: usize) -> Self {
        Self {
            kind: PointKind::Affected(target),
            options: TrialOptions::incremental(repetitions),
        }
    }

    /// An incremental build with only the scenario's leaf dependency affected.
    pub fn leaf_dependency(scenario: &Scenario, repetitions: usize) -> Self {
        Self {
            kind: PointKind::LeafDependency {
                package: leaf_dependency(scenario).package_name(scenario),
            },
            options: TrialOptions::incremental(repetitions),
        }
    }

    /// Returns the standard plan: cold, then each percentage in order, then the leaf dependency.
    pub fn standard_plan(
        scenario: &Scenario,
        percentages: &[u32],
        repetitions: usize,
    ) -> Vec<MeasurementPoint> {
        let mut points = vec![Self::cold(repetitions)];
        points.extend(
            percentages
                .iter()
                .map(|&percentage| Self::affected(scenario.affected_target(percentage), repetitions)),
        );
        points.push(Self::leaf_dependency(scenario, repetitions));
        points
    }

    pub fn kind(&self) -> &PointKind {
        &self.kind
    }

    pub fn options(&self) -> &TrialOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_plan_shape() {
        let small = Scenario::small();
        let plan = MeasurementPoint::standard_plan(small, &[10, 20, 50], 3);
        let labels: Vec<_> = plan.iter().map(|point| point.kind().label()).collect();
        assert_eq!(
            labels,
            vec!["cold", "affected10", "affected20", "affected50", "leaf"]
        );

        let cold = plan[0].options();
        assert!(!cold.warmup && cold.reset_output && cold.reset_cache);
        for point in &plan[1..] {
            let options = point.options();
            assert!(options.warmup, "incremental points warm up");
            assert!(!options.reset_output && !options.reset_cache);
            assert_eq!(options.repetitions, 3);
        }

        assert_eq!(
            plan[4].kind(),
            &PointKind::LeafDependency {
                package: "small-pkg1-1-1".to_owned()
            }
        );
    }
}
