// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use batch_bench_cli::Args;
use clap::Parser;
use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    // Attempt to turn on ANSI color support on Windows. This may or may not work.
    let _ = enable_ansi_support::enable_ansi_support();

    let args = Args::parse();
    args.exec()
}
