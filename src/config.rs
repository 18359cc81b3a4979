/*!
 * Configuration handling for compilebook
 */

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use clap_complete::Shell;

use crate::aggregator::FailurePolicy;
use crate::discovery::ChapterOrder;
use crate::ensure;
use crate::error::{CompileBookError, Result};
use crate::renderer::{RendererKind, DEFAULT_COMMAND};
use crate::report::ReportFormat;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Command-line arguments for compilebook
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "compilebook",
    version = env!("CARGO_PKG_VERSION"),
    about = "Concatenate a directory of markdown chapters into a single HTML document",
    long_about = "Reads every non-hidden file in the input directory, optionally prefixes each with a title derived from its file name, renders the combined markdown to HTML and writes it to the output file."
)]
pub struct Args {
    /// Directory containing the chapter files
    #[clap(long, default_value = "chapters")]
    pub input_dir: String,

    /// HTML file to write
    #[clap(long, default_value = "output/book.html")]
    pub output_file: String,

    /// Markdown renderer backend
    #[clap(long, value_enum, default_value_t = RendererKind::default())]
    pub renderer: RendererKind,

    /// Program and arguments used by the `command` renderer, split on whitespace
    /// (quotes are not interpreted; wrap a program whose path or arguments
    /// contain spaces in a script)
    #[clap(long, default_value = DEFAULT_COMMAND)]
    pub renderer_command: String,

    /// Seconds the `command` renderer may run before it is killed
    #[clap(long, value_name = "SECS", default_value = "30")]
    pub render_timeout: u64,

    /// Do not insert a title heading before each chapter
    #[clap(long)]
    pub no_titles: bool,

    /// Heading level of inserted chapter titles (1-6)
    #[clap(long, default_value = "1")]
    pub title_level: u8,

    /// Order in which chapters are concatenated
    #[clap(long, value_enum, default_value_t = ChapterOrder::default())]
    pub order: ChapterOrder,

    /// Comma-separated list of file name patterns to include (if specified, only matching files are used)
    #[clap(long = "include", value_delimiter = ',')]
    pub include_patterns: Vec<String>,

    /// Comma-separated list of file name patterns to ignore
    #[clap(long = "ignore", value_delimiter = ',')]
    pub ignore_patterns: Vec<String>,

    /// Abort on the first unreadable chapter instead of skipping it
    #[clap(long)]
    pub strict: bool,

    /// Wrap the rendered HTML in a complete document
    #[clap(long)]
    pub standalone: bool,

    /// Document title used with --standalone
    #[clap(long, default_value = "Book")]
    pub title: String,

    /// Format of the run report printed on completion
    #[clap(long, value_enum, default_value_t = ReportFormat::default())]
    pub report: ReportFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format
    #[clap(long, value_enum, default_value_t = LogFormat::default())]
    pub log_format: LogFormat,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory containing the chapter files
    pub input_dir: PathBuf,

    /// Output HTML file path
    pub output_file: PathBuf,

    /// Renderer backend
    pub renderer: RendererKind,

    /// Command line for the external renderer
    pub renderer_command: String,

    /// Time limit for the external renderer
    pub render_timeout: Duration,

    /// Whether to insert chapter titles
    pub titles: bool,

    /// Heading level for chapter titles
    pub title_level: u8,

    /// Chapter ordering
    pub order: ChapterOrder,

    /// Patterns to include (if empty, include all)
    pub include_patterns: Vec<String>,

    /// Patterns to ignore
    pub ignore_patterns: Vec<String>,

    /// Handling of unreadable chapters
    pub failure_policy: FailurePolicy,

    /// Wrap output in a full HTML document
    pub standalone: bool,

    /// Title of the standalone document
    pub document_title: String,

    /// Run report format
    pub report_format: ReportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("chapters"),
            output_file: PathBuf::from("output/book.html"),
            renderer: RendererKind::default(),
            renderer_command: DEFAULT_COMMAND.to_string(),
            render_timeout: Duration::from_secs(30),
            titles: true,
            title_level: 1,
            order: ChapterOrder::default(),
            include_patterns: Vec::new(),
            ignore_patterns: Vec::new(),
            failure_policy: FailurePolicy::default(),
            standalone: false,
            document_title: "Book".to_string(),
            report_format: ReportFormat::default(),
        }
    }
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            input_dir: PathBuf::from(args.input_dir),
            output_file: PathBuf::from(args.output_file),
            renderer: args.renderer,
            renderer_command: args.renderer_command,
            render_timeout: Duration::from_secs(args.render_timeout),
            titles: !args.no_titles,
            title_level: args.title_level,
            order: args.order,
            include_patterns: args.include_patterns,
            ignore_patterns: args.ignore_patterns,
            failure_policy: if args.strict {
                FailurePolicy::Abort
            } else {
                FailurePolicy::Skip
            },
            standalone: args.standalone,
            document_title: args.title,
            report_format: args.report,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.input_dir.is_dir() {
            return Err(CompileBookError::DirectoryNotFound(self.input_dir.clone()));
        }

        ensure!(
            !self.output_file.is_dir(),
            Config,
            "Output file is a directory: {}",
            self.output_file.display()
        );

        ensure!(
            (1..=6).contains(&self.title_level),
            Config,
            "Title level must be between 1 and 6, got {}",
            self.title_level
        );

        if self.renderer == RendererKind::Command {
            ensure!(
                !self.renderer_command.trim().is_empty(),
                Config,
                "The command renderer needs a --renderer-command"
            );
            ensure!(
                !self.render_timeout.is_zero(),
                Config,
                "Render timeout must be at least one second"
            );
        }

        Ok(())
    }
}
