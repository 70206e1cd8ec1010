// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console rendering for section banners and the final summary.
//!
//! The output here is meant for humans. It has no stable format.

use crate::{
    plan::{ExecutionMode, MeasurementPoint, PointKind},
    results::BenchSummary,
};
use owo_colors::{OwoColorize, Style};
use std::{fmt, io};

/// Renders banners and summaries for a benchmark run.
#[derive(Clone, Debug)]
pub struct ReportPrinter<'a> {
    tool_label: &'a str,
    styles: ReportStyles,
}

impl<'a> ReportPrinter<'a> {
    /// The label used for the build tool when none is configured.
    pub const DEFAULT_TOOL_LABEL: &'static str = "@nx/js:tsc";

    pub fn new(tool_label: &'a str) -> Self {
        Self {
            tool_label,
            styles: ReportStyles::default(),
        }
    }

    /// Enables colored output.
    pub fn colorize(&mut self) -> &mut Self {
        self.styles.colorize();
        self
    }

    /// Returns the title of the section measuring `point` in `mode`.
    pub fn title(&self, point: &MeasurementPoint, mode: ExecutionMode) -> String {
        let batch = if mode.is_batch() {
            " using batch execution"
        } else {
            ""
        };
        format!(
            "Running {} with {}{} {} times",
            Subject(point.kind()),
            self.tool_label,
            batch,
            point.options().repetitions,
        )
    }

    /// Writes `title` between two separator lines of the same length.
    pub fn write_title(&self, title: &str, mut out: impl io::Write) -> io::Result<()> {
        let separator = "-".repeat(title.chars().count());
        writeln!(out, "{}", separator)?;
        match self.styles.title {
            Some(style) => writeln!(out, "{}", title.style(style))?,
            None => writeln!(out, "{}", title)?,
        }
        writeln!(out, "{}", separator)
    }

    /// Writes the comparative summary for every measured point.
    pub fn write_summary(&self, summary: &BenchSummary, mut out: impl io::Write) -> io::Result<()> {
        writeln!(out)?;
        self.write_title("RESULTS", &mut out)?;
        writeln!(out)?;
        writeln!(out, "scenario: {}", summary.scenario)?;

        for comparison in &summary.comparisons {
            writeln!(out)?;
            let average = Average(&comparison.point);
            writeln!(
                out,
                "Average {} with {} is: {:.1}ms",
                average, self.tool_label, comparison.normal_mean_ms
            )?;
            writeln!(
                out,
                "Average {} with {} using batch execution is: {:.1}ms",
                average, self.tool_label, comparison.batch_mean_ms
            )?;

            let speedup = format!("{:.2}x", comparison.speedup());
            let speedup = match self.styles.speedup {
                Some(style) => speedup.style(style).to_string(),
                None => speedup,
            };
            writeln!(
                out,
                "{} with {} using batch execution was {} faster than non-batch execution",
                Plural(&comparison.point),
                self.tool_label,
                speedup,
            )?;
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
struct ReportStyles {
    title: Option<Style>,
    speedup: Option<Style>,
}

impl ReportStyles {
    fn colorize(&mut self) {
        self.title = Some(Style::new().bold());
        self.speedup = Some(Style::new().green().bold());
    }
}

/// "a cold build", "build for 5 affected packages (~10%)"
struct Subject<'a>(&'a PointKind);

impl<'a> fmt::Display for Subject<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            PointKind::Cold => write!(f, "a cold build"),
            PointKind::Affected(target) => write!(
                f,
                "build for {} affected packages (~{}%)",
                target.count(),
                target.actual_percentage()
            ),
            PointKind::LeafDependency { package } => {
                write!(f, "build for the leaf dependency {}", package)
            }
        }
    }
}

/// "cold build time", "build time for 5 affected packages (~10%)"
struct Average<'a>(&'a PointKind);

impl<'a> fmt::Display for Average<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            PointKind::Cold => write!(f, "cold build time"),
            PointKind::Affected(target) => write!(
                f,
                "build time for {} affected packages (~{}%)",
                target.count(),
                target.actual_percentage()
            ),
            PointKind::LeafDependency { package } => {
                write!(f, "build time for the leaf dependency {}", package)
            }
        }
    }
}

/// "Cold builds", "Builds for 5 affected packages (~10%)"
struct Plural<'a>(&'a PointKind);

impl<'a> fmt::Display for Plural<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            PointKind::Cold => write!(f, "Cold builds"),
            PointKind::Affected(target) => write!(
                f,
                "Builds for {} affected packages (~{}%)",
                target.count(),
                target.actual_percentage()
            ),
            PointKind::LeafDependency { package } => {
                write!(f, "Builds for the leaf dependency {}", package)
            }
        }
    }
}
