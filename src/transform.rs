//! Per-chapter content transforms applied during aggregation

use std::path::Path;

/// Extensions stripped from a file name when deriving a chapter title
pub const KNOWN_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// Adjusts a chapter's raw content before it is appended to the aggregate
pub trait Transform {
    /// Return the content to append for the chapter at `path`
    fn apply(&self, path: &Path, content: &str) -> String;
}

impl<F> Transform for F
where
    F: Fn(&Path, &str) -> String,
{
    fn apply(&self, path: &Path, content: &str) -> String {
        self(path, content)
    }
}

/// Prepends a markdown heading derived from the file name
///
/// `intro.md` containing `# Title` becomes `# intro\n# Title\n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleTransform {
    level: u8,
}

impl Default for TitleTransform {
    fn default() -> Self {
        Self { level: 1 }
    }
}

impl TitleTransform {
    /// Create a transform emitting headings of the given level, clamped to 1..=6
    pub fn with_level(level: u8) -> Self {
        Self {
            level: level.clamp(1, 6),
        }
    }

    /// Heading level used for inserted titles
    pub fn level(&self) -> u8 {
        self.level
    }
}

impl Transform for TitleTransform {
    fn apply(&self, path: &Path, content: &str) -> String {
        let hashes = "#".repeat(self.level as usize);
        format!("{} {}\n{}\n", hashes, derive_title(path), content)
    }
}

/// Derive a chapter title from a file name by removing a known extension
///
/// Only the last extension is considered, and only when it is one of
/// [`KNOWN_EXTENSIONS`].
pub fn derive_title(path: &Path) -> String {
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();

    match file_name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && KNOWN_EXTENSIONS
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext)) =>
        {
            stem.to_string()
        }
        _ => file_name.to_string(),
    }
}
