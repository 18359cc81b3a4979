/*!
 * compilebook - Concatenate markdown chapters into a single HTML document
 *
 * Discovers the chapter files in a directory, folds them into one markdown
 * document (optionally prefixing each with a title taken from its file name),
 * renders the result to HTML and writes it out.
 */

pub mod aggregator;
pub mod config;
pub mod discovery;
pub mod error;
pub mod pipeline;
pub mod renderer;
pub mod report;
pub mod transform;
pub mod types;
pub mod utils;
pub mod writer;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use aggregator::{aggregate, Aggregator, FailurePolicy};
pub use config::Config;
pub use discovery::{ChapterOrder, Discovery};
pub use error::{CompileBookError, Result};
pub use pipeline::Pipeline;
pub use renderer::{BuiltinRenderer, CommandRenderer, RenderError, Renderer, RendererKind};
pub use report::{ReportFormat, Reporter, RunReport};
pub use transform::{derive_title, TitleTransform, Transform};
pub use types::{AggregateDocument, IncludedFile, SkippedFile};
pub use writer::HtmlWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
