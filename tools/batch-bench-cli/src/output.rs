// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::Parser;
use env_logger::fmt::Formatter;
use log::{Level, LevelFilter, Record};
use owo_colors::{OwoColorize, Stream, Style};
use std::{io::Write, sync::Arc};

/// Options controlling logging, build orchestrator output and colors.
#[derive(Debug, Parser)]
#[must_use]
pub(crate) struct OutputOpts {
    /// Only log errors; progress lines are hidden
    #[clap(
        name = "outputquiet",
        global = true,
        long = "quiet",
        short = 'q',
        conflicts_with = "outputverbose"
    )]
    pub(crate) quiet: bool,
    /// Log debug details and show the build orchestrator's stdout and stderr
    #[clap(
        name = "outputverbose",
        global = true,
        long = "verbose",
        short = 'v',
        conflicts_with = "outputquiet"
    )]
    pub(crate) verbose: bool,

    /// Color logs and the results summary
    #[clap(
        long,
        global = true,
        default_value = "auto",
        possible_values = &["auto", "always", "never"],
    )]
    pub(crate) color: Color,
}

impl OutputOpts {
    pub(crate) fn init(self) -> OutputContext {
        let OutputOpts {
            quiet,
            verbose,
            color,
        } = self;
        let level = if quiet {
            LevelFilter::Error
        } else if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };

        color.init_colored();

        let mut styles = Styles::default();
        if supports_color_on(Stream::Stderr) {
            styles.colorize();
        }

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .format(format_fn)
            .init();

        OutputContext {
            verbose,
            color,
            styles: Arc::new(styles),
        }
    }
}

#[derive(Clone, Debug)]
#[must_use]
pub(crate) struct OutputContext {
    /// Whether the build orchestrator's own output is shown.
    pub(crate) verbose: bool,
    pub(crate) color: Color,
    pub(crate) styles: Arc<Styles>,
}

// Progress lines are `info:` records on stderr, so that stdout only carries banners and results.
fn format_fn(f: &mut Formatter, record: &Record<'_>) -> std::io::Result<()> {
    let (prefix, style) = match record.level() {
        Level::Error => ("error:", Style::new().bold().red()),
        Level::Warn => ("warning:", Style::new().bold().yellow()),
        Level::Info => ("info:", Style::new().bold()),
        Level::Debug => ("debug:", Style::new().dimmed()),
        Level::Trace => return Ok(()),
    };
    writeln!(
        f,
        "{} {}",
        prefix.if_supports_color(Stream::Stderr, |s| s.style(style)),
        record.args()
    )
}

fn supports_color_on(stream: Stream) -> bool {
    match supports_color::on_cached(stream) {
        Some(level) => level.has_basic,
        None => false,
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[must_use]
pub enum Color {
    Auto,
    Always,
    Never,
}

impl Color {
    fn init_colored(self) {
        match self {
            Color::Auto => owo_colors::unset_override(),
            Color::Always => owo_colors::set_override(true),
            Color::Never => owo_colors::set_override(false),
        }
    }

    /// Whether the report written to stdout should be colored.
    pub(crate) fn is_enabled_for_stdout(self) -> bool {
        match self {
            Color::Auto => supports_color_on(Stream::Stdout),
            Color::Always => true,
            Color::Never => false,
        }
    }
}

impl std::str::FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Color::Auto),
            "always" => Ok(Color::Always),
            "never" => Ok(Color::Never),
            s => Err(format!(
                "{} is not a valid option, expected `auto`, `always` or `never`",
                s
            )),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Styles {
    pub(crate) command: Style,
    pub(crate) scenario: Style,
    pub(crate) path: Style,
}

impl Styles {
    fn colorize(&mut self) {
        self.command = Style::new().bold();
        self.scenario = Style::new().magenta().bold();
        self.path = Style::new().blue().bold();
    }
}
