/*!
 * Reporting functionality for compilebook
 *
 * Summarises a run: which chapters went into the book, which were skipped
 * and why, and where the output ended up. Console output uses the tabled
 * library; JSON output uses serde.
 */

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;
use strum::{Display, EnumString};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::error::Result;
use crate::types::{IncludedFile, SkippedFile};
use crate::utils::format_file_size;

/// Statistics for a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Directory the chapters were read from
    pub input_dir: PathBuf,
    /// Output file path
    pub output_file: PathBuf,
    /// Name of the renderer that produced the HTML
    pub renderer: String,
    /// Time taken for the whole run
    #[serde(serialize_with = "serialize_duration_ms", rename = "duration_ms")]
    pub duration: Duration,
    /// Chapters folded into the book, in order
    pub included: Vec<IncludedFile>,
    /// Chapters that could not be read
    pub skipped: Vec<SkippedFile>,
    /// Size of the aggregated markdown in bytes
    pub markdown_bytes: u64,
    /// Size of the written HTML in bytes
    pub html_bytes: u64,
}

fn serialize_duration_ms<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

impl RunReport {
    /// Total lines across included chapters
    pub fn total_lines(&self) -> usize {
        self.included.iter().map(|f| f.lines).sum()
    }
}

/// Format of the report output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    /// Console table output
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Print nothing
    #[value(name = "none")]
    #[strum(serialize = "none")]
    Off,
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string, or `None` when reporting is disabled
    pub fn generate_report(&self, report: &RunReport) -> Result<Option<String>> {
        match self.format {
            ReportFormat::Table => Ok(Some(self.generate_console_report(report))),
            ReportFormat::Json => Ok(Some(serde_json::to_string_pretty(report)?)),
            ReportFormat::Off => Ok(None),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &RunReport) -> Result<()> {
        if let Some(text) = self.generate_report(report)? {
            println!("\n{}", text);
        }
        Ok(())
    }

    fn create_summary_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let rows = vec![
            SummaryRow {
                key: "📂 Input Directory".to_string(),
                value: report.input_dir.display().to_string(),
            },
            SummaryRow {
                key: "📄 Output File".to_string(),
                value: report.output_file.display().to_string(),
            },
            SummaryRow {
                key: "🖨️ Renderer".to_string(),
                value: report.renderer.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📚 Chapters".to_string(),
                value: format!(
                    "{} included, {} skipped",
                    report.included.len(),
                    report.skipped.len()
                ),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: report.total_lines().to_string(),
            },
            SummaryRow {
                key: "📦 Output Size".to_string(),
                value: format!(
                    "{} markdown → {} HTML",
                    format_file_size(report.markdown_bytes),
                    format_file_size(report.html_bytes)
                ),
            },
        ];

        styled(Table::new(rows))
    }

    fn create_chapters_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct ChapterRow {
            #[tabled(rename = "#")]
            index: usize,

            #[tabled(rename = "Chapter")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: usize,

            #[tabled(rename = "Chars")]
            chars: usize,
        }

        let rows: Vec<ChapterRow> = report
            .included
            .iter()
            .enumerate()
            .map(|(i, file)| ChapterRow {
                index: i + 1,
                path: display_path(&file.path, &report.input_dir),
                lines: file.lines,
                chars: file.chars,
            })
            .collect();

        styled(Table::new(rows))
    }

    fn create_skipped_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SkippedRow {
            #[tabled(rename = "Chapter")]
            path: String,

            #[tabled(rename = "Reason")]
            reason: String,
        }

        let rows: Vec<SkippedRow> = report
            .skipped
            .iter()
            .map(|file| SkippedRow {
                path: display_path(&file.path, &report.input_dir),
                reason: file.reason.clone(),
            })
            .collect();

        styled(Table::new(rows))
    }

    fn generate_console_report(&self, report: &RunReport) -> String {
        let mut sections = vec![format!(
            "📋  CHAPTERS\n{}",
            self.create_chapters_table(report)
        )];

        if !report.skipped.is_empty() {
            sections.push(format!(
                "⚠️  SKIPPED CHAPTERS\n{}",
                self.create_skipped_table(report)
            ));
        }

        sections.push(format!(
            "✅  BOOK COMPILED\n{}",
            self.create_summary_table(report)
        ));

        sections.join("\n\n")
    }
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));
    table.to_string()
}

// Show chapters relative to the input directory when possible
fn display_path(path: &Path, input_dir: &Path) -> String {
    path.strip_prefix(input_dir)
        .unwrap_or(path)
        .display()
        .to_string()
}
