//! Command-line behavior: exit codes and console output of the binary.
//!
//! Run with: `cargo test --test cli`

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn pdf_assembler(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pdf-assembler"))
        .arg("--dir")
        .arg(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn tutorial(renderer: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let images = tmp.path().join("01-intro/images");
    fs::create_dir_all(&images).unwrap();
    fs::write(images.join("a.png"), "fake image").unwrap();
    fs::write(tmp.path().join("pdf.adoc"), "= Tutorial\n").unwrap();
    fs::write(
        tmp.path().join("pdf-assembler.toml"),
        format!("[renderer]\ncommand = \"{renderer}\"\n"),
    )
    .unwrap();
    tmp
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[cfg(unix)]
#[test]
fn build_prints_progress_and_succeeds() {
    let tmp = tutorial("true");
    let out = pdf_assembler(tmp.path(), &["build"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "Copying images...\nGenerating PDF\nDone.\n");
    assert!(!tmp.path().join("pdf-images").exists());
}

#[cfg(unix)]
#[test]
fn build_is_the_default_command() {
    let tmp = tutorial("true");
    let out = pdf_assembler(tmp.path(), &[]);

    assert!(out.status.success());
    assert!(stdout(&out).ends_with("Done.\n"));
}

#[cfg(unix)]
#[test]
fn renderer_exit_status_is_shown_but_not_propagated() {
    let tmp = tutorial("false");
    let out = pdf_assembler(tmp.path(), &["build"]);

    assert!(out.status.success());
    assert!(stdout(&out).contains("false exited with status 1"));
}

#[test]
fn existing_staging_dir_exits_nonzero() {
    let tmp = tutorial("true");
    fs::create_dir(tmp.path().join("pdf-images")).unwrap();

    let out = pdf_assembler(tmp.path(), &["build"]);

    assert!(!out.status.success());
    assert_eq!(stdout(&out), "Copying images...\n");
    assert!(stderr(&out).starts_with("Failed."));
    assert!(!tmp.path().join("pdf-images").exists());
}

#[test]
fn missing_renderer_exits_nonzero() {
    let tmp = tutorial("pdf-assembler-test-no-such-renderer");
    let out = pdf_assembler(tmp.path(), &["build"]);

    assert!(!out.status.success());
    assert!(stderr(&out).contains("pdf-assembler-test-no-such-renderer"));
    assert!(!tmp.path().join("pdf-images").exists());
}

#[test]
fn invalid_config_exits_nonzero() {
    let tmp = tutorial("true");
    fs::write(tmp.path().join("pdf-assembler.toml"), "staging_dir = \"../out\"\n").unwrap();

    let out = pdf_assembler(tmp.path(), &["build"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("staging_dir"));
}

#[test]
fn check_lists_plan_without_staging() {
    let tmp = tutorial("true");
    let out = pdf_assembler(tmp.path(), &["check"]);

    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("01 intro (1 image)"));
    assert!(text.contains("1 image from 1 chapter"));
    assert!(!tmp.path().join("pdf-images").exists());
}

#[test]
fn check_json_is_machine_readable() {
    let tmp = tutorial("true");
    let out = pdf_assembler(tmp.path(), &["check", "--json"]);

    assert!(out.status.success());
    let plan: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(plan["chapters"][0]["name"], "01-intro");
    assert_eq!(plan["chapters"][0]["images"][0]["file_name"], "a.png");
}

#[test]
fn clean_removes_stale_staging_dir() {
    let tmp = tutorial("true");
    fs::create_dir_all(tmp.path().join("pdf-images/sub")).unwrap();

    let out = pdf_assembler(tmp.path(), &["clean"]);
    assert!(out.status.success());
    assert!(!tmp.path().join("pdf-images").exists());

    let out = pdf_assembler(tmp.path(), &["clean"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out), "Nothing to clean\n");
}

#[test]
fn gen_config_prints_stock_config() {
    let tmp = TempDir::new().unwrap();
    let out = pdf_assembler(tmp.path(), &["gen-config"]);

    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("staging_dir = \"pdf-images\""));
    assert!(text.contains("command = \"asciidoctor-pdf\""));
}
