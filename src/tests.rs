/*!
 * Tests for compilebook functionality
 */

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use crate::aggregator::{aggregate, Aggregator, FailurePolicy};
use crate::config::Config;
use crate::discovery::{ChapterOrder, Discovery};
use crate::error::CompileBookError;
use crate::pipeline::Pipeline;
use crate::renderer::{BuiltinRenderer, RenderError, RenderResult, Renderer};
use crate::transform::{TitleTransform, Transform};

// Helper function to create a chapters directory
fn setup_chapters(chapters: &[(&str, &str)]) -> io::Result<tempfile::TempDir> {
    let temp_dir = tempdir()?;
    let chapters_dir = temp_dir.path().join("chapters");
    fs::create_dir(&chapters_dir)?;

    for (name, content) in chapters {
        let mut file = File::create(chapters_dir.join(name))?;
        file.write_all(content.as_bytes())?;
    }

    Ok(temp_dir)
}

fn config_for(root: &Path) -> Config {
    Config {
        input_dir: root.join("chapters"),
        output_file: root.join("output").join("book.html"),
        ..Config::default()
    }
}

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn name(&self) -> &str {
        "failing"
    }

    fn render(&self, _markdown: &str) -> RenderResult<String> {
        Err(RenderError::Decode("failing".to_string()))
    }
}

// Plain concatenation in listing order, with no separator
#[test]
fn test_plain_concatenation_preserves_order() -> io::Result<()> {
    let temp_dir = setup_chapters(&[("a.md", "alpha\n"), ("b.md", "beta"), ("c.md", "gamma\n")])?;
    let dir = temp_dir.path().join("chapters");

    let forward: Vec<PathBuf> = ["a.md", "b.md", "c.md"].iter().map(|n| dir.join(n)).collect();
    let reversed: Vec<PathBuf> = forward.iter().rev().cloned().collect();

    assert_eq!(aggregate(&forward, None)?.content, "alpha\nbetagamma\n");
    assert_eq!(aggregate(&reversed, None)?.content, "gamma\nbetaalpha\n");

    Ok(())
}

// Every chapter segment starts with its derived title heading
#[test]
fn test_title_transform_marks_each_segment() -> io::Result<()> {
    let temp_dir = setup_chapters(&[("01-intro.md", "Hello"), ("02-usage.txt", "Use it")])?;
    let chapters = Discovery::new(ChapterOrder::Name).discover(&temp_dir.path().join("chapters"))?;

    let titles = TitleTransform::default();
    let document = aggregate(&chapters, Some(&titles))?;

    assert_eq!(document.content, "# 01-intro\nHello\n# 02-usage\nUse it\n");
    let second = document.content.find("# 02-usage").unwrap();
    assert!(document.content[second..].starts_with("# 02-usage\nUse it"));

    Ok(())
}

// Aggregating the same files twice gives byte-identical output
#[test]
fn test_aggregation_is_idempotent() -> io::Result<()> {
    let temp_dir = setup_chapters(&[("x.md", "one"), ("y.md", "two"), ("z.md", "three")])?;
    let discovery = Discovery::new(ChapterOrder::Name);
    let titles = TitleTransform::default();

    let first = aggregate(&discovery.discover(&temp_dir.path().join("chapters"))?, Some(&titles))?;
    let second = aggregate(&discovery.discover(&temp_dir.path().join("chapters"))?, Some(&titles))?;

    assert_eq!(first, second);
    Ok(())
}

// A transform returning an empty string contributes nothing
#[test]
fn test_empty_transform_output_contributes_nothing() -> io::Result<()> {
    let temp_dir = setup_chapters(&[("a.md", "keep"), ("b.md", "drop")])?;
    let dir = temp_dir.path().join("chapters");

    let drop_b = |path: &Path, content: &str| {
        if path.ends_with("b.md") {
            String::new()
        } else {
            content.to_string()
        }
    };
    let document = aggregate(&[dir.join("a.md"), dir.join("b.md")], Some(&drop_b))?;

    assert_eq!(document.content, "keep");
    assert_eq!(document.included.len(), 2);
    Ok(())
}

// The worked example: intro.md containing "# Title"
#[test]
fn test_intro_round_trip() -> io::Result<()> {
    let temp_dir = setup_chapters(&[("intro.md", "# Title")])?;
    let chapters = Discovery::default().discover(&temp_dir.path().join("chapters"))?;

    let document = aggregate(&chapters, Some(&TitleTransform::default()))?;
    assert_eq!(document.content, "# intro\n# Title\n");

    let html = BuiltinRenderer::new().render(&document.content).map_err(CompileBookError::from)?;
    assert!(html.contains("<h1>intro</h1>"));
    assert!(html.contains("<h1>Title</h1>"));
    assert!(html.find("<h1>intro</h1>") < html.find("<h1>Title</h1>"));

    Ok(())
}

// One unreadable chapter out of three is skipped and reported
#[test]
fn test_unreadable_chapter_is_skipped() -> io::Result<()> {
    let temp_dir = setup_chapters(&[("1.md", "first\n"), ("3.md", "third\n")])?;
    let dir = temp_dir.path().join("chapters");
    fs::write(dir.join("2.md"), [0xff, 0xfe, 0x00])?;

    let chapters = Discovery::new(ChapterOrder::Name).discover(&dir)?;
    assert_eq!(chapters.len(), 3);

    let document = aggregate(&chapters, None)?;
    assert_eq!(document.content, "first\nthird\n");
    assert_eq!(document.skipped.len(), 1);
    assert_eq!(document.skipped[0].path, dir.join("2.md"));
    assert_eq!(
        document.included_paths().collect::<Vec<_>>(),
        vec![dir.join("1.md").as_path(), dir.join("3.md").as_path()]
    );

    Ok(())
}

// A chapter that cannot be opened is skipped while the rest are concatenated
#[cfg(unix)]
#[test]
fn test_unopenable_chapter_is_skipped() -> io::Result<()> {
    let temp_dir = setup_chapters(&[("1.md", "first\n"), ("3.md", "third\n")])?;
    let dir = temp_dir.path().join("chapters");
    std::os::unix::fs::symlink(dir.join("deleted.md"), dir.join("2.md"))?;

    let chapters = Discovery::new(ChapterOrder::Name).discover(&dir)?;
    assert_eq!(chapters.len(), 3);

    let document = aggregate(&chapters, None)?;
    assert_eq!(document.content, "first\nthird\n");
    assert_eq!(document.skipped.len(), 1);
    assert_eq!(document.skipped[0].path, dir.join("2.md"));
    assert!(document.skipped[0].reason.starts_with("Failed to read file"));

    let err = crate::aggregator::read_chapter(&dir.join("2.md")).unwrap_err();
    assert!(matches!(err, CompileBookError::FileRead { .. }));

    Ok(())
}

// Missing files are read failures, not decode failures
#[test]
fn test_missing_chapter_is_a_read_failure() -> io::Result<()> {
    let temp_dir = setup_chapters(&[("a.md", "a")])?;
    let dir = temp_dir.path().join("chapters");

    let err = Aggregator::new(None)
        .with_policy(FailurePolicy::Abort)
        .aggregate(&[dir.join("a.md"), dir.join("missing.md")])
        .unwrap_err();
    assert!(matches!(err, CompileBookError::FileRead { .. }));

    Ok(())
}

// Empty input directory renders to an empty document without failing
#[test]
fn test_empty_directory_builds_empty_book() -> io::Result<()> {
    let temp_dir = setup_chapters(&[])?;
    let config = config_for(temp_dir.path());

    let chapters = Discovery::default().discover(&config.input_dir)?;
    assert!(aggregate(&chapters, Some(&TitleTransform::default()))?.is_empty());

    let report = Pipeline::new(config.clone()).run()?;

    assert!(report.included.is_empty());
    assert_eq!(fs::read_to_string(&config.output_file)?, "");
    Ok(())
}

// Full pipeline with the builtin renderer
#[test]
fn test_pipeline_writes_html() -> io::Result<()> {
    let temp_dir = setup_chapters(&[
        ("01-intro.md", "Welcome to the book."),
        ("02-setup.md", "## Install\n\nRun it."),
        (".hidden.md", "secret"),
    ])?;
    let config = Config {
        standalone: true,
        document_title: "My Book".to_string(),
        ..config_for(temp_dir.path())
    };

    let report = Pipeline::new(config.clone()).run()?;
    let html = fs::read_to_string(&config.output_file)?;

    assert_eq!(report.included.len(), 2);
    assert!(report.skipped.is_empty());
    assert!(html.contains("<title>My Book</title>"));
    assert!(html.contains("<h1>01-intro</h1>"));
    assert!(html.contains("<h2>Install</h2>"));
    assert!(!html.contains("secret"));
    assert_eq!(report.html_bytes, html.len() as u64);

    Ok(())
}

// Without titles the chapters are concatenated verbatim
#[test]
fn test_pipeline_without_titles() -> io::Result<()> {
    let temp_dir = setup_chapters(&[("a.md", "# A\n"), ("b.md", "# B\n")])?;
    let config = Config {
        titles: false,
        ..config_for(temp_dir.path())
    };

    Pipeline::new(config.clone()).run()?;
    let html = fs::read_to_string(&config.output_file)?;

    assert_eq!(html, "<h1>A</h1>\n<h1>B</h1>\n");
    Ok(())
}

// A render failure aborts before anything is written
#[test]
fn test_render_failure_writes_nothing() -> io::Result<()> {
    let temp_dir = setup_chapters(&[("a.md", "content")])?;
    let config = config_for(temp_dir.path());

    let err = Pipeline::new(config.clone())
        .run_with(&FailingRenderer)
        .unwrap_err();

    assert!(matches!(err, CompileBookError::Render(_)));
    assert!(!config.output_file.exists());
    Ok(())
}

// Strict mode turns a skipped chapter into a fatal error
#[test]
fn test_strict_mode_aborts() -> io::Result<()> {
    let temp_dir = setup_chapters(&[("a.md", "ok")])?;
    fs::write(temp_dir.path().join("chapters").join("b.md"), [0xc3, 0x28])?;
    let config = Config {
        failure_policy: FailurePolicy::Abort,
        ..config_for(temp_dir.path())
    };

    let err = Pipeline::new(config.clone()).run().unwrap_err();

    assert!(matches!(err, CompileBookError::Decode(_)));
    assert!(!config.output_file.exists());
    Ok(())
}

// Skipped chapters still produce output and appear in the report
#[test]
fn test_skip_policy_reports_skipped_chapters() -> io::Result<()> {
    let temp_dir = setup_chapters(&[("a.md", "ok")])?;
    fs::write(temp_dir.path().join("chapters").join("b.md"), [0xc3, 0x28])?;
    let config = config_for(temp_dir.path());

    let report = Pipeline::new(config.clone()).run()?;

    assert_eq!(report.included.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert!(fs::read_to_string(&config.output_file)?.contains("<h1>a</h1>"));
    Ok(())
}

// Closures and the title transform share the same seam
#[test]
fn test_custom_transform_sees_path_and_content() -> io::Result<()> {
    let temp_dir = setup_chapters(&[("only.md", "body")])?;
    let dir = temp_dir.path().join("chapters");

    let tag = |path: &Path, content: &str| {
        format!("<!-- {} -->{}", path.file_name().unwrap().to_string_lossy(), content)
    };
    let transform: &dyn Transform = &tag;
    let document = Aggregator::new(Some(transform)).aggregate(&[dir.join("only.md")])?;

    assert_eq!(document.content, "<!-- only.md -->body");
    Ok(())
}
