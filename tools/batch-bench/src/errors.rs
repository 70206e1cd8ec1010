// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types returned by batch-bench.

use camino::{Utf8Path, Utf8PathBuf};
use std::{error, fmt, io};

/// A scenario name that isn't present in the catalog.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownScenario {
    name: String,
}

impl UnknownScenario {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the name that was looked up.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for UnknownScenario {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown scenario '{}' (known scenarios: ", self.name)?;
        let mut first = true;
        for known in crate::scenario::Scenario::all().keys() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", known)?;
            first = false;
        }
        write!(f, ")")
    }
}

impl error::Error for UnknownScenario {}

/// An error that occurred while affecting a package on disk.
///
/// This usually means that the fixture workspace doesn't match the scenario's topology.
#[derive(Debug)]
pub struct MutateError {
    package: String,
    path: Utf8PathBuf,
    kind: MutateErrorKind,
}

impl MutateError {
    /// Returns the name of the package that couldn't be affected.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Returns the path to the source unit.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the kind of error that occurred.
    pub fn kind(&self) -> &MutateErrorKind {
        &self.kind
    }

    // ---
    // Internal constructors
    // ---

    pub(crate) fn new(package: String, path: Utf8PathBuf, err: io::Error) -> Self {
        let kind = if err.kind() == io::ErrorKind::NotFound {
            MutateErrorKind::MissingSource(err)
        } else {
            MutateErrorKind::Write(err)
        };
        Self {
            package,
            path,
            kind,
        }
    }
}

impl fmt::Display for MutateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "error affecting package {} at {}: {}",
            self.package, self.path, self.kind
        )
    }
}

impl error::Error for MutateError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            MutateErrorKind::MissingSource(err) | MutateErrorKind::Write(err) => Some(err),
        }
    }
}

/// The kind of error that occurred while affecting a package.
#[derive(Debug)]
#[non_exhaustive]
pub enum MutateErrorKind {
    /// The package's source unit doesn't exist.
    MissingSource(io::Error),

    /// The source unit couldn't be written to.
    Write(io::Error),
}

impl MutateErrorKind {
    /// Returns true if the source unit was missing.
    pub fn is_missing_source(&self) -> bool {
        matches!(self, MutateErrorKind::MissingSource(_))
    }
}

impl fmt::Display for MutateErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MutateErrorKind::MissingSource(_) => {
                write!(f, "source file not found (fixture doesn't match scenario)")
            }
            MutateErrorKind::Write(_) => write!(f, "failed to append marker"),
        }
    }
}
