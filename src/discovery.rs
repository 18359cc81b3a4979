/*!
 * Chapter discovery
 *
 * Lists the non-hidden files directly inside the input directory.
 * Subdirectories are not descended into.
 */

use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use glob_match::glob_match;
use strum::{Display, EnumString};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use crate::error::{CompileBookError, Result};

/// Order in which discovered chapters are aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ChapterOrder {
    /// Sort chapters by file name (byte order)
    #[default]
    Name,
    /// Keep whatever order the filesystem listing returns
    Listing,
}

/// Lists chapter files in a directory
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    order: ChapterOrder,
    include_patterns: Vec<String>,
    ignore_patterns: Vec<String>,
}

impl Discovery {
    /// Create a discovery pass with the given ordering
    pub fn new(order: ChapterOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    /// Only keep files whose name matches one of these glob patterns
    pub fn with_include_patterns(mut self, patterns: Vec<String>) -> Self {
        self.include_patterns = patterns;
        self
    }

    /// Drop files whose name matches one of these glob patterns
    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Return the chapter files inside `dir`
    pub fn discover(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(CompileBookError::DirectoryNotFound(dir.to_path_buf()));
        }

        let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1);
        if self.order == ChapterOrder::Name {
            walker = walker.sort_by_file_name();
        }

        let mut chapters = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| CompileBookError::DirectoryUnreadable {
                path: dir.to_path_buf(),
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "directory walk failed")),
            })?;

            if is_hidden(&entry) || !is_chapter_candidate(&entry) {
                trace!(path = %entry.path().display(), "skipping non-chapter entry");
                continue;
            }
            if self.should_ignore(entry.path()) || !self.should_include(entry.path()) {
                debug!(path = %entry.path().display(), "filtered out by pattern");
                continue;
            }

            chapters.push(entry.into_path());
        }

        debug!(count = chapters.len(), dir = %dir.display(), "discovered chapters");
        Ok(chapters)
    }

    /// Check if a file should be ignored based on patterns
    pub fn should_ignore(&self, path: &Path) -> bool {
        let file_name = path.file_name().unwrap_or_default().to_string_lossy();
        self.ignore_patterns
            .iter()
            .any(|pattern| glob_match(pattern, &file_name))
    }

    /// Check if a file should be included based on patterns
    pub fn should_include(&self, path: &Path) -> bool {
        // If no include patterns, include everything
        if self.include_patterns.is_empty() {
            return true;
        }

        let file_name = path.file_name().unwrap_or_default().to_string_lossy();
        self.include_patterns
            .iter()
            .any(|pattern| glob_match(pattern, &file_name))
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

// Regular files and symlinks that do not point at a directory. A dangling
// link is kept so the aggregator can report it as unreadable.
fn is_chapter_candidate(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir())
}
