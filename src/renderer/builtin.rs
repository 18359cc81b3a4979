//! In-process renderer backed by pulldown-cmark

use pulldown_cmark::{html, Options, Parser};

use super::Renderer;
use crate::renderer::error::RenderResult;

/// Converts markdown to HTML without leaving the process
#[derive(Debug, Clone, Copy)]
pub struct BuiltinRenderer {
    options: Options,
}

impl Default for BuiltinRenderer {
    fn default() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        Self { options }
    }
}

impl BuiltinRenderer {
    /// Create a renderer with the common CommonMark extensions enabled
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for BuiltinRenderer {
    fn name(&self) -> &str {
        "builtin"
    }

    fn render(&self, markdown: &str) -> RenderResult<String> {
        let parser = Parser::new_ext(markdown, self.options);
        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, parser);
        Ok(output)
    }
}
