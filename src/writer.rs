/*!
 * HTML writer implementation for compilebook
 */

use std::fs::{self, File};
use std::io::{BufWriter, Write};

use tracing::debug;

use crate::config::Config;
use crate::error::{CompileBookError, Result};

/// Writes rendered HTML to the configured output file
pub struct HtmlWriter {
    /// Writer configuration
    config: Config,
}

impl HtmlWriter {
    /// Create a new HTML writer
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Build the final document from a rendered fragment
    ///
    /// With `standalone` the fragment is wrapped in a minimal HTML5 page;
    /// otherwise it is returned unchanged.
    pub fn document(&self, html: &str) -> String {
        if !self.config.standalone {
            return html.to_string();
        }

        let title = html_escape::encode_text(&self.config.document_title);
        format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <meta name=\"generator\" content=\"compilebook {}\">\n\
             <title>{}</title>\n\
             </head>\n\
             <body>\n\
             {}\
             </body>\n\
             </html>\n",
            env!("CARGO_PKG_VERSION"),
            title,
            html
        )
    }

    /// Write the document to the output file, creating parent directories
    ///
    /// Returns the number of bytes written.
    pub fn write(&self, html: &str) -> Result<u64> {
        let path = &self.config.output_file;
        let document = self.document(html);
        let write_err = |source| CompileBookError::Write {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let file = File::create(path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(document.as_bytes()).map_err(write_err)?;
        writer.flush().map_err(write_err)?;

        debug!(path = %path.display(), bytes = document.len(), "wrote output");
        Ok(document.len() as u64)
    }
}
