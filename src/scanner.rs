use crate::{
    error::Result,
    file::ImageFile,
    filter::PathFilter,
};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Statistics collected during scanning.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ScanStats {
    /// Regular files visited
    pub files_visited: usize,

    /// Files matching the source format
    pub files_matched: usize,

    /// Directories not descended into
    pub directories_excluded: usize,
}

/// Walks the source tree and collects images of the source format.
pub(crate) struct Scanner {
    root_dir: PathBuf,
    filter: PathFilter,
}

impl Scanner {
    /// Creates a new scanner over `root_dir`.
    pub(crate) fn new(root_dir: impl Into<PathBuf>, filter: PathFilter) -> Self {
        Self {
            root_dir: root_dir.into(),
            filter,
        }
    }

    /// Scans the root directory and returns all matching files in
    /// file-name order.
    ///
    /// An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory entry cannot be read.
    pub(crate) fn scan(&self) -> Result<(Vec<ImageFile>, ScanStats)> {
        let mut stats = ScanStats::default();
        let mut files = Vec::new();
        let mut excluded = 0;

        debug!("Starting scan of {}", self.root_dir.display());

        let root = self.root_dir.as_path();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if !entry.file_type().is_dir() {
                    return true;
                }
                let relative = relative_to(entry.path(), root);
                let descend = self.filter.should_descend(entry.path(), &relative);
                if !descend {
                    debug!("Skipping excluded directory: {}", entry.path().display());
                    excluded += 1;
                }
                descend
            });

        for entry in walker {
            let entry = entry?;
            if !is_regular_file(&entry) {
                continue;
            }

            stats.files_visited += 1;

            if !self.filter.matches_file(entry.path()) {
                trace!("Ignoring {}", entry.path().display());
                continue;
            }

            debug!("Found {}", entry.path().display());
            let relative_path = relative_to(entry.path(), root);
            files.push(ImageFile::new(entry.into_path(), relative_path));
        }

        stats.files_matched = files.len();
        stats.directories_excluded = excluded;

        debug!(
            "Scan complete: {} visited, {} matched, {} directories excluded",
            stats.files_visited, stats.files_matched, stats.directories_excluded
        );

        Ok((files, stats))
    }
}

/// Returns true for regular files and for symlinks resolving to one.
///
/// Links are not followed for directories, so cycles cannot occur.
fn is_regular_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    if entry.path_is_symlink() {
        let target_is_file = entry.path().is_file();
        if !target_is_file {
            debug!("Skipping symlink {}", entry.path().display());
        }
        return target_is_file;
    }
    false
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf())
}
