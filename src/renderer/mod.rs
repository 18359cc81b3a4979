//! Markdown to HTML rendering
//!
//! The rest of the crate only depends on the [`Renderer`] contract: UTF-8
//! markdown in, UTF-8 HTML out, or a [`RenderError`].

mod builtin;
mod command;
mod error;

pub use builtin::BuiltinRenderer;
pub use command::{CommandRenderer, DEFAULT_COMMAND, DEFAULT_TIMEOUT};
pub use error::{RenderError, RenderResult};

use std::time::Duration;

use clap::ValueEnum;
use strum::{Display, EnumString};

/// Trait defining the interface for markdown renderers
pub trait Renderer {
    /// Short name used in logs and reports
    fn name(&self) -> &str;

    /// Convert markdown into HTML
    fn render(&self, markdown: &str) -> RenderResult<String>;
}

/// Available rendering backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RendererKind {
    /// In-process pulldown-cmark
    #[default]
    Builtin,
    /// External program reading markdown on stdin
    Command,
}

/// Create the renderer selected by `kind`
///
/// `command_line` and `timeout` only apply to [`RendererKind::Command`].
pub fn create_renderer(
    kind: RendererKind,
    command_line: &str,
    timeout: Duration,
) -> RenderResult<Box<dyn Renderer>> {
    let renderer: Box<dyn Renderer> = match kind {
        RendererKind::Builtin => Box::new(BuiltinRenderer::new()),
        RendererKind::Command => {
            Box::new(CommandRenderer::from_command_line(command_line)?.with_timeout(timeout))
        }
    };
    Ok(renderer)
}
