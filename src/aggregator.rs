/*!
 * Chapter aggregation
 *
 * Reads chapters in order and folds their (optionally transformed) content
 * into a single markdown document.
 */

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use indicatif::ProgressBar;
use strum::{Display, EnumString};
use tracing::{debug, warn};

use crate::error::{CompileBookError, Result};
use crate::transform::Transform;
use crate::types::{AggregateDocument, IncludedFile, SkippedFile};

/// What to do when a chapter cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the chapter as skipped and keep going
    #[default]
    Skip,
    /// Stop at the first unreadable chapter
    Abort,
}

/// Folds chapter files into an [`AggregateDocument`]
pub struct Aggregator<'a> {
    transform: Option<&'a dyn Transform>,
    policy: FailurePolicy,
    progress: ProgressBar,
}

impl<'a> Aggregator<'a> {
    /// Create an aggregator with an optional per-chapter transform
    pub fn new(transform: Option<&'a dyn Transform>) -> Self {
        Self {
            transform,
            policy: FailurePolicy::default(),
            progress: ProgressBar::hidden(),
        }
    }

    /// Set the policy for unreadable chapters
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Report per-chapter progress on the given bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Read and concatenate `paths` in order
    ///
    /// Under [`FailurePolicy::Skip`] unreadable chapters end up in
    /// [`AggregateDocument::skipped`] and this never returns an error.
    pub fn aggregate<P: AsRef<Path>>(&self, paths: &[P]) -> Result<AggregateDocument> {
        let mut document = AggregateDocument::default();
        self.progress.set_length(paths.len() as u64);

        for path in paths {
            let path = path.as_ref();
            self.progress.set_message(format!("Current file: {}", display_name(path)));

            match read_chapter(path) {
                Ok(raw) => {
                    match self.transform {
                        Some(transform) => document.content.push_str(&transform.apply(path, &raw)),
                        None => document.content.push_str(&raw),
                    }
                    debug!(path = %path.display(), bytes = raw.len(), "appended chapter");
                    document.included.push(IncludedFile {
                        path: path.to_path_buf(),
                        lines: raw.lines().count(),
                        chars: raw.chars().count(),
                    });
                }
                Err(e) if self.policy == FailurePolicy::Skip => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable chapter");
                    document.skipped.push(SkippedFile {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }

            self.progress.inc(1);
        }

        Ok(document)
    }
}

/// Aggregate `paths` with the default skip policy and no progress reporting
pub fn aggregate<P: AsRef<Path>>(
    paths: &[P],
    transform: Option<&dyn Transform>,
) -> Result<AggregateDocument> {
    Aggregator::new(transform).aggregate(paths)
}

/// Read a chapter as UTF-8 text
pub fn read_chapter(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| CompileBookError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    String::from_utf8(bytes).map_err(|_| CompileBookError::Decode(path.to_path_buf()))
}

// Truncate long names so the progress line stays on one row
fn display_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let chars = file_name.chars().count();
    if chars > 40 {
        let tail: String = file_name.chars().skip(chars - 37).collect();
        format!("...{}", tail)
    } else {
        file_name
    }
}
