/*!
 * Core types and data structures for compilebook
 */

use std::path::{Path, PathBuf};

use serde::Serialize;

/// A chapter file that could not be folded into the aggregate document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    /// Location of the chapter
    pub path: PathBuf,
    /// Human-readable reason the chapter was skipped
    pub reason: String,
}

/// A chapter that contributed to the aggregate document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludedFile {
    /// Location of the chapter
    pub path: PathBuf,
    /// Number of lines in the raw chapter
    pub lines: usize,
    /// Number of characters in the raw chapter
    pub chars: usize,
}

/// The combined markdown of every readable chapter, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateDocument {
    /// Concatenated (and possibly transformed) chapter contents
    pub content: String,
    /// Chapters that contributed to `content`, in order
    pub included: Vec<IncludedFile>,
    /// Chapters that were skipped
    pub skipped: Vec<SkippedFile>,
}

impl AggregateDocument {
    /// Whether no chapter contributed any text
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Paths of the chapters that contributed, in order
    pub fn included_paths(&self) -> impl Iterator<Item = &Path> {
        self.included.iter().map(|file| file.path.as_path())
    }
}
