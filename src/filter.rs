//! Path filtering for the tree walk.
//!
//! Decides which directories are descended into and which files are
//! handed to the converter.

use crate::error::{Error, Result};
use crate::format::ImageFormat;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};

/// Filters walked paths by directory exclusion globs and source format.
#[derive(Debug, Clone)]
pub(crate) struct PathFilter {
    source: ImageFormat,
    exclude_directories: GlobSet,
    excluded_roots: Vec<PathBuf>,
}

impl PathFilter {
    /// Creates a filter matching files of `source` format.
    ///
    /// `patterns` are matched against directory paths relative to the
    /// source root. `excluded_roots` are absolute directories that are
    /// always skipped.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any glob fails to compile.
    pub(crate) fn new(
        source: ImageFormat,
        patterns: &[String],
        excluded_roots: Vec<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            source,
            exclude_directories: build_globset(patterns)?,
            excluded_roots,
        })
    }

    /// Returns true if the walk should descend into `dir`.
    ///
    /// `relative` is the directory's path relative to the source root.
    pub(crate) fn should_descend(&self, dir: &Path, relative: &Path) -> bool {
        if self.excluded_roots.iter().any(|root| root == dir) {
            return false;
        }

        if relative.as_os_str().is_empty() {
            return true;
        }

        !self.exclude_directories.is_match(relative)
    }

    /// Returns true if `path` names a file of the source format.
    pub(crate) fn matches_file(&self, path: &Path) -> bool {
        ImageFormat::from_path(path) == Some(self.source)
    }
}

/// Compiles directory exclusion patterns.
///
/// # Errors
///
/// Returns a configuration error naming the first invalid pattern.
pub(crate) fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| Error::config(format!("Invalid glob pattern '{pattern}': {e}")))?;
        builder.add(glob);
    }

    builder
        .build()
        .map_err(|e| Error::config(format!("Failed to build glob set: {e}")))
}
