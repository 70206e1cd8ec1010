// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The catalog of synthetic workspace topologies.

use crate::errors::UnknownScenario;
use once_cell::sync::Lazy;
use std::{collections::BTreeMap, fmt};

/// A synthetic dependency-tree shape used as a benchmark fixture.
///
/// `levels[d]` is the fan-out of every package at depth `d - 1`, so `levels[0]` is always 1 (the
/// single root package). `count` is the number of packages materialized on disk for this shape.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize))]
pub struct Scenario {
    name: &'static str,
    levels: &'static [usize],
    count: usize,
}

macro_rules! define_scenarios {
    ($($name: ident => levels: $levels: expr, count: $count: expr,)*) => {
        impl Scenario {
            /// Returns every scenario in the catalog, keyed by name.
            pub fn all() -> &'static BTreeMap<&'static str, Scenario> {
                static ALL_SCENARIOS: Lazy<BTreeMap<&'static str, Scenario>> = Lazy::new(|| {
                    let mut map = BTreeMap::new();

                    $(map.insert(
                        stringify!($name),
                        Scenario::new(stringify!($name), &$levels, $count),
                    );)*

                    map
                });

                &*ALL_SCENARIOS
            }

            $(pub fn $name() -> &'static Self {
                &Scenario::all()[stringify!($name)]
            })*
        }
    };
}

define_scenarios! {
    small => levels: [1, 3, 2], count: 10,
    medium => levels: [1, 7, 6], count: 50,
    large => levels: [1, 12, 20], count: 253,
}

impl Scenario {
    /// Creates a new scenario. `levels` must start with 1.
    pub fn new(name: &'static str, levels: &'static [usize], count: usize) -> Self {
        assert_eq!(levels.first(), Some(&1), "level 0 must contain a single root package");
        Self {
            name,
            levels,
            count,
        }
    }

    /// Looks up a scenario by name.
    pub fn by_name(name: &str) -> Result<&'static Self, UnknownScenario> {
        Self::all()
            .get(name)
            .ok_or_else(|| UnknownScenario::new(name))
    }

    /// Returns the name of this scenario.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the fan-out at each depth of the tree.
    pub fn levels(&self) -> &'static [usize] {
        self.levels
    }

    /// Returns the maximum depth of the tree. The root is at depth 0.
    pub fn max_depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Returns the total number of packages in this scenario's workspace.
    pub fn total_package_count(&self) -> usize {
        self.count
    }

    /// Returns the name of the root package, which every build is run against.
    pub fn root_package(&self) -> String {
        format!("{}-pkg1", self.name)
    }

    /// Computes the number of packages to affect for a requested percentage.
    pub fn affected_target(&self, percentage: u32) -> AffectedTarget {
        AffectedTarget::new(self.count, percentage)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (levels: {:?}, packages: {})", self.name, self.levels, self.count)
    }
}

/// A requested percentage of packages to affect, resolved against a scenario's package count.
///
/// Rounding can make `actual_percentage` differ from `requested_percentage`, and can make two
/// nearby requested percentages resolve to the same `count` for small scenarios.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize))]
pub struct AffectedTarget {
    requested_percentage: u32,
    count: usize,
    actual_percentage: u32,
}

impl AffectedTarget {
    /// Resolves `percentage` against `total` packages, rounding halves up.
    pub fn new(total: usize, percentage: u32) -> Self {
        let count = round_div(total * percentage as usize, 100);
        let actual_percentage = if total == 0 {
            0
        } else {
            round_div(count * 100, total) as u32
        };
        Self {
            requested_percentage: percentage,
            count,
            actual_percentage,
        }
    }

    pub fn requested_percentage(&self) -> u32 {
        self.requested_percentage
    }

    /// The number of packages to affect.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The percentage of packages that `count` actually represents.
    pub fn actual_percentage(&self) -> u32 {
        self.actual_percentage
    }
}

fn round_div(numerator: usize, denominator: usize) -> usize {
    (2 * numerator + denominator) / (2 * denominator)
}
