// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests that run `batch-bench` against a fake build orchestrator.

#![cfg(unix)]

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    process::{Command, Output},
};
use tempfile::TempDir;

const ORIGINAL: &str = "export const value = 1;\n";

// Records every invocation, along with whether batch mode was requested.
const FAKE_NX: &str = r#"#!/bin/sh
echo "$* batch=${NX_BATCH_MODE:-false}" >> invocations.log
"#;

// Builds print a line of their own and fail; cache resets succeed.
const FAILING_NX: &str = r#"#!/bin/sh
echo "$* batch=${NX_BATCH_MODE:-false}" >> invocations.log
if [ "$1" = "run" ]; then
    echo "nx build output"
    exit 3
fi
"#;

const SMALL_PACKAGES: &[&str] = &[
    "small-pkg1",
    "small-pkg1-1",
    "small-pkg1-2",
    "small-pkg1-3",
    "small-pkg1-1-1",
    "small-pkg1-1-2",
    "small-pkg1-2-1",
    "small-pkg1-2-2",
    "small-pkg1-3-1",
    "small-pkg1-3-2",
];

fn fixture_workspace() -> TempDir {
    fixture_workspace_with(FAKE_NX)
}

fn fixture_workspace_with(nx_script: &str) -> TempDir {
    let dir = TempDir::new().expect("temp dir created");
    for package in SMALL_PACKAGES {
        let src = dir.path().join("packages").join(package).join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("index.ts"), ORIGINAL).unwrap();
    }

    let bin_dir = dir.path().join("node_modules/.bin");
    fs::create_dir_all(&bin_dir).unwrap();
    let nx = bin_dir.join("nx");
    fs::write(&nx, nx_script).unwrap();
    fs::set_permissions(&nx, fs::Permissions::from_mode(0o755)).unwrap();

    fs::create_dir_all(dir.path().join("dist")).unwrap();
    dir
}

fn batch_bench(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_batch-bench"))
        .args(args)
        .arg("--workspace-root")
        .arg(root)
        .args(["--color", "never"])
        .output()
        .expect("batch-bench ran")
}

fn source(root: &Path, package: &str) -> PathBuf {
    root.join("packages").join(package).join("src/index.ts")
}

#[test]
fn run_small_scenario() {
    let dir = fixture_workspace();
    let root = dir.path();

    let output = batch_bench(
        root,
        &["run", "--pkg-size", "small", "--repetitions", "1", "--no-restore", "--json"],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "batch-bench succeeded: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let log = fs::read_to_string(root.join("invocations.log")).unwrap();
    let lines: Vec<_> = log.lines().collect();
    // Per mode: 1 cold build, 3 affected points and 1 leaf point with a warmup each.
    let builds = |batch: &str| {
        lines
            .iter()
            .filter(|line| **line == format!("run small-pkg1:build batch={}", batch))
            .count()
    };
    assert_eq!(builds("false"), 9);
    assert_eq!(builds("true"), 9);
    // The cache is only reset before cold builds.
    let resets = lines.iter().filter(|line| line.starts_with("reset ")).count();
    assert_eq!(resets, 2);
    assert!(!root.join("dist").exists(), "build output was removed");

    // The root is affected once per affected repetition in each mode.
    let root_source = fs::read_to_string(source(root, "small-pkg1")).unwrap();
    assert_eq!(root_source, format!("{}{}", ORIGINAL, "//".repeat(6)));
    // The leaf is affected by the 50% point and the leaf point in each mode.
    let leaf_source = fs::read_to_string(source(root, "small-pkg1-1-1")).unwrap();
    assert_eq!(leaf_source, format!("{}{}", ORIGINAL, "//".repeat(4)));
    let untouched = fs::read_to_string(source(root, "small-pkg1-3-2")).unwrap();
    assert_eq!(untouched, ORIGINAL);

    assert!(stdout.contains("Running a cold build with @nx/js:tsc 1 times"));
    assert!(stdout.contains(
        "Running build for 5 affected packages (~50%) with @nx/js:tsc using batch execution 1 times"
    ));
    assert!(stdout.contains("RESULTS"));
    assert!(stdout.contains("\"scenario\": \"small\""));
}

#[test]
fn failing_builds_are_timed() {
    for verbose in [false, true] {
        let dir = fixture_workspace_with(FAILING_NX);
        let root = dir.path();

        let mut args = vec!["run", "--pkg-size", "small", "--repetitions", "1", "--no-restore"];
        if verbose {
            args.push("--verbose");
        }
        let output = batch_bench(root, &args);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        assert!(output.status.success(), "failed builds don't abort the run: {}", stderr);
        assert!(stderr.contains("exited with"), "failed builds are logged: {}", stderr);
        assert!(stdout.contains("Average cold build time with @nx/js:tsc is: "));
        assert!(stdout.contains(
            "Average build time for the leaf dependency small-pkg1-1-1 with @nx/js:tsc using batch execution is: "
        ));

        // Orchestrator output is only shown with --verbose.
        assert_eq!(
            stdout.contains("nx build output"),
            verbose,
            "orchestrator output visibility with verbose = {}",
            verbose
        );

        // Every build still ran: 9 per mode.
        let log = fs::read_to_string(root.join("invocations.log")).unwrap();
        assert_eq!(log.lines().filter(|line| line.starts_with("run ")).count(), 18);
    }
}

#[test]
fn unknown_scenario_fails_before_measuring() {
    let dir = fixture_workspace();
    let root = dir.path();

    let output = batch_bench(root, &["run", "--pkg-size", "huge", "--no-restore"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown scenario 'huge'"));
    assert!(!root.join("invocations.log").exists(), "nothing was built");
}

#[test]
fn missing_package_aborts() {
    let dir = fixture_workspace();
    let root = dir.path();
    fs::remove_file(source(root, "small-pkg1-2")).unwrap();

    let output = batch_bench(
        root,
        &["run", "--pkg-size", "small", "--repetitions", "1", "--no-restore"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("small-pkg1-2"), "error names the package: {}", stderr);
}

#[test]
fn list_scenarios() {
    let output = Command::new(env!("CARGO_BIN_EXE_batch-bench"))
        .arg("list")
        .output()
        .expect("batch-bench ran");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "large (levels: [1, 12, 20], packages: 253)\n\
         medium (levels: [1, 7, 6], packages: 50)\n\
         small (levels: [1, 3, 2], packages: 10)\n"
    );
}

fn git(root: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .args(["-c", "user.name=batch-bench", "-c", "user.email=batch-bench@example.com"])
        .args(args)
        .current_dir(root)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[test]
fn run_restores_workspace() {
    let dir = fixture_workspace();
    let root = dir.path();
    if !git(root, &["init", "-q"]) {
        eprintln!("git not available, skipping");
        return;
    }
    assert!(git(root, &["add", "packages"]));
    assert!(git(root, &["commit", "-q", "-m", "fixtures"]));

    let output = batch_bench(root, &["run", "--pkg-size", "small", "--repetitions", "1"]);
    assert!(
        output.status.success(),
        "batch-bench succeeded: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    for package in SMALL_PACKAGES {
        let contents = fs::read_to_string(source(root, package)).unwrap();
        assert_eq!(contents, ORIGINAL, "{} restored", package);
    }
}
