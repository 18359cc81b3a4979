/*!
 * Integration tests driving the compilebook binary
 */

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn compilebook(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_compilebook"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_chapters(root: &Path, chapters: &[(&str, &str)]) {
    let dir = root.join("chapters");
    fs::create_dir_all(&dir).unwrap();
    for (name, content) in chapters {
        fs::write(dir.join(name), content).unwrap();
    }
}

#[test]
fn default_paths_build_the_book() {
    let temp_dir = tempdir().unwrap();
    write_chapters(temp_dir.path(), &[("intro.md", "# Title")]);

    let output = compilebook(&["--report", "none"], temp_dir.path());
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let html = fs::read_to_string(temp_dir.path().join("output").join("book.html")).unwrap();
    assert!(html.contains("<h1>intro</h1>"));
    assert!(html.contains("<h1>Title</h1>"));
}

#[test]
fn missing_input_dir_exits_non_zero() {
    let temp_dir = tempdir().unwrap();

    let output = compilebook(&["--input-dir", "nowhere"], temp_dir.path());

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Input directory not found"));
}

#[test]
fn json_report_lists_skipped_chapters() {
    let temp_dir = tempdir().unwrap();
    write_chapters(temp_dir.path(), &[("a.md", "one"), ("c.md", "three")]);
    fs::write(temp_dir.path().join("chapters").join("b.md"), [0xffu8, 0xfe]).unwrap();

    let output = compilebook(&["--report", "json"], temp_dir.path());
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["included"].as_array().unwrap().len(), 2);
    assert_eq!(report["skipped"].as_array().unwrap().len(), 1);
    assert!(report["skipped"][0]["path"]
        .as_str()
        .unwrap()
        .ends_with("b.md"));
}

#[cfg(unix)]
#[test]
fn failing_command_renderer_writes_no_output() {
    let temp_dir = tempdir().unwrap();
    write_chapters(temp_dir.path(), &[("a.md", "text")]);

    let output = compilebook(
        &["--renderer", "command", "--renderer-command", "false", "--output-file", "out.html"],
        temp_dir.path(),
    );

    assert!(!output.status.success());
    assert!(!temp_dir.path().join("out.html").exists());
}

#[cfg(unix)]
#[test]
fn command_renderer_output_is_written() {
    let temp_dir = tempdir().unwrap();
    write_chapters(temp_dir.path(), &[("a.md", "raw text")]);

    let output = compilebook(
        &[
            "--renderer",
            "command",
            "--renderer-command",
            "cat",
            "--no-titles",
            "--report",
            "none",
            "--output-file",
            "out.html",
        ],
        temp_dir.path(),
    );

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(fs::read_to_string(temp_dir.path().join("out.html")).unwrap(), "raw text");
}

#[test]
fn generates_shell_completions() {
    let temp_dir = tempdir().unwrap();

    let output = compilebook(&["--generate", "bash"], temp_dir.path());

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("compilebook"));
}
