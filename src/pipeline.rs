/*!
 * End-to-end run: discover, aggregate, render, write
 */

use std::time::Instant;

use indicatif::ProgressBar;
use tracing::{info, info_span, warn};

use crate::aggregator::Aggregator;
use crate::config::Config;
use crate::discovery::Discovery;
use crate::error::Result;
use crate::renderer::{create_renderer, Renderer};
use crate::report::RunReport;
use crate::transform::{TitleTransform, Transform};
use crate::writer::HtmlWriter;

/// Runs the four stages of a build in sequence
pub struct Pipeline {
    config: Config,
    progress: ProgressBar,
}

impl Pipeline {
    /// Create a pipeline for the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report per-chapter progress on the given bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Execute the run using the configured renderer
    pub fn run(&self) -> Result<RunReport> {
        let renderer = create_renderer(
            self.config.renderer,
            &self.config.renderer_command,
            self.config.render_timeout,
        )?;
        self.run_with(renderer.as_ref())
    }

    /// Execute the run with an explicit renderer
    ///
    /// Any failure other than an unreadable chapter under the skip policy
    /// aborts the run. A render failure leaves the output file untouched.
    pub fn run_with(&self, renderer: &dyn Renderer) -> Result<RunReport> {
        let start = Instant::now();
        let config = &self.config;

        let chapters = {
            let _span = info_span!("discover", dir = %config.input_dir.display()).entered();
            Discovery::new(config.order)
                .with_include_patterns(config.include_patterns.clone())
                .with_ignore_patterns(config.ignore_patterns.clone())
                .discover(&config.input_dir)?
        };
        info!(count = chapters.len(), "found chapters");

        let document = {
            let _span = info_span!("aggregate").entered();
            let titles = TitleTransform::with_level(config.title_level);
            let transform = config.titles.then_some(&titles as &dyn Transform);
            Aggregator::new(transform)
                .with_policy(config.failure_policy)
                .with_progress(self.progress.clone())
                .aggregate(&chapters)?
        };
        if document.is_empty() {
            info!("no chapter content, writing an empty book");
        }
        if !document.skipped.is_empty() {
            warn!(count = document.skipped.len(), "some chapters were skipped");
        }

        let html = {
            let _span = info_span!("render", renderer = renderer.name()).entered();
            renderer.render(&document.content)?
        };

        let html_bytes = {
            let _span = info_span!("write", path = %config.output_file.display()).entered();
            HtmlWriter::new(config.clone()).write(&html)?
        };
        info!(
            included = document.included.len(),
            skipped = document.skipped.len(),
            output = %config.output_file.display(),
            "book compiled"
        );

        Ok(RunReport {
            input_dir: config.input_dir.clone(),
            output_file: config.output_file.clone(),
            renderer: renderer.name().to_string(),
            duration: start.elapsed(),
            markdown_bytes: document.content.len() as u64,
            html_bytes,
            included: document.included,
            skipped: document.skipped,
        })
    }
}
