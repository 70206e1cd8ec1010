// Copyright (c) The cargo-guppy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8Path;
use color_eyre::{eyre::WrapErr, Result};
use std::io;

/// Reads the contents of a file, returning `None` if it doesn't exist.
pub(crate) fn read_optional(path: &Utf8Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        // Don't fail if the file wasn't found.
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).wrap_err_with(|| format!("error reading contents at {}", path)),
    }
}

/// Removes a directory and everything under it. A missing directory is not an error.
pub(crate) fn remove_dir_all_if_exists(dir: &Utf8Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).wrap_err_with(|| format!("error removing {}", dir)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryInto;
    use tempfile::TempDir;

    #[test]
    fn test_read_optional() -> Result<()> {
        let dir = TempDir::new()?;
        let root: &Utf8Path = dir.path().try_into().expect("path is UTF-8");
        std::fs::write(root.join("foo"), "foo-contents")?;

        assert_eq!(read_optional(&root.join("foo"))?.as_deref(), Some("foo-contents"));
        assert_eq!(read_optional(&root.join("missing"))?, None);

        Ok(())
    }

    #[test]
    fn test_remove_dir_all_if_exists() -> Result<()> {
        let dir = TempDir::new()?;
        let root: &Utf8Path = dir.path().try_into().expect("path is UTF-8");
        let dist = root.join("dist");
        std::fs::create_dir_all(dist.join("nested"))?;
        std::fs::write(dist.join("nested/out.js"), "")?;

        remove_dir_all_if_exists(&dist)?;
        assert!(!dist.exists());
        // Removing again is fine.
        remove_dir_all_if_exists(&dist)?;

        Ok(())
    }
}
