/*!
 * Command-line interface for compilebook
 */

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use compilebook::config::{Args, Config, LogFormat};
use compilebook::pipeline::Pipeline;
use compilebook::report::Reporter;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "compilebook", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    init_tracing(args.verbose, args.log_format);

    match run(Config::from_args(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> compilebook::Result<()> {
    config.validate()?;

    // Progress bar hides itself when stderr is not a terminal
    let progress = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ⏱️  {elapsed_precise}")
    {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📚 Compiling");
    progress.set_message(format!("📂 Reading {}", config.input_dir.display()));

    let reporter = Reporter::new(config.report_format);
    let result = Pipeline::new(config).with_progress(progress.clone()).run();

    // Clear the progress bar before anything else hits the terminal
    progress.finish_and_clear();

    let report = result?;
    reporter.print_report(&report)
}

/// Initialize tracing based on CLI flags; `RUST_LOG` takes precedence.
fn init_tracing(verbose: u8, format: LogFormat) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match verbose {
        0 => "compilebook=info",
        1 => "compilebook=debug",
        _ => "compilebook=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(io::stderr)
                .init();
        }
    }
}
