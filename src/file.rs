use crate::format::ImageFormat;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// An image discovered under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// Path as produced by the walk
    pub path: PathBuf,

    /// Path relative to the source root
    pub relative_path: PathBuf,
}

impl ImageFile {
    /// Creates a new image file entry.
    #[must_use]
    pub fn new(path: PathBuf, relative_path: PathBuf) -> Self {
        Self {
            path,
            relative_path,
        }
    }

    /// Returns the mirrored output path under `output_root`.
    ///
    /// The relative directory is preserved and the file stem gets the
    /// canonical extension of `to`.
    #[must_use]
    pub fn destination(&self, output_root: &Path, to: ImageFormat) -> PathBuf {
        let mut destination = output_root.join(&self.relative_path);
        destination.set_extension(to.extension());
        destination
    }
}

/// A completed conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertedFile {
    /// Input image
    pub source: PathBuf,

    /// Written (or, in dry run, planned) output image
    pub destination: PathBuf,
}
