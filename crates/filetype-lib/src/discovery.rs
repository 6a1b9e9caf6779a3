//! Discovery of input files under a directory

use crate::error::{ClassifierError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Depth that lists only the directory's own entries
pub const SHALLOW_DEPTH: usize = 1;

/// Depth with no limit
pub const UNBOUNDED_DEPTH: usize = usize::MAX;

/// Traversal depth for a recursive or shallow scan
pub fn scan_depth(recursive: bool) -> usize {
    if recursive {
        UNBOUNDED_DEPTH
    } else {
        SHALLOW_DEPTH
    }
}

/// List regular files under `root` up to `max_depth` levels below it
///
/// Symbolic links are not followed and are not reported.
pub fn find_regular_files(root: &Path, max_depth: usize) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
    {
        let entry = entry.map_err(|e| ClassifierError::Io(e.into()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
