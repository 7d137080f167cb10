//! Integration tests for the `zhihu-md` command-line interface.
//!
//! Covers the exit-code contract (0 on success, 1 on any failure), the
//! distinct "file not found" message, default output naming and the
//! detect-only / JSON modes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn zhihu_md() -> Command {
    let mut cmd = Command::cargo_bin("zhihu-md").expect("binary builds");
    cmd.env_remove("ZHIHU_MD_BASE_URL")
        .env_remove("ZHIHU_MD_ENCODING")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn version_flag() {
    zhihu_md()
        .arg("--version")
        .assert()
        .success()
        .stdout(format!("zhihu-md {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn input_is_required() {
    zhihu_md().arg("--json").assert().failure();
}

#[test]
fn converts_to_default_output() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("img")).unwrap();
    fs::write(dir.path().join("img/cat.png"), b"png").unwrap();
    let input = dir.path().join("notes.md");
    fs::write(&input, "![cat](img/cat.png)\n$x+y$\n").unwrap();
    let expected = dir.path().join("notes_for_zhihu.md");

    zhihu_md()
        .args(["--base-url", "https://host/assets/", "-i"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("notes_for_zhihu.md"))
        .stderr(predicate::str::contains("Converted URL: https://host/assets/img/cat.png"));

    assert_eq!(
        fs::read_to_string(expected).unwrap(),
        "![cat](https://host/assets/img/cat.png)\n $$x+y$$ \n"
    );
}

#[test]
fn missing_image_warns_but_succeeds() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("p.md");
    fs::write(&input, "![x](img/missing.png)\n").unwrap();

    zhihu_md()
        .arg("-i")
        .arg(&input)
        .assert()
        .success()
        .stderr(predicate::str::contains("Image file not found"))
        .stderr(predicate::str::contains("missing.png"));
}

#[test]
fn missing_input_exits_one() {
    let dir = TempDir::new().unwrap();
    zhihu_md()
        .arg("-i")
        .arg(dir.path().join("ghost.md"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: File not found:"))
        .stderr(predicate::str::contains("ghost.md"));
}

#[test]
fn decode_error_exits_one() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.md");
    fs::write(&input, b"\xd6\xd0\xff").unwrap();

    zhihu_md()
        .args(["-e", "utf-8", "-i"])
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Cannot decode"));
    assert!(!dir.path().join("bad_for_zhihu.md").exists());
}

#[test]
fn explicit_output_path() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("p.md");
    let output = dir.path().join("out.md");
    fs::write(&input, "$a$").unwrap();

    zhihu_md()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--quiet")
        .assert()
        .success();
    assert_eq!(fs::read_to_string(output).unwrap(), " $$a$$ ");
}

#[test]
fn output_path_is_not_read_from_environment() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("p.md");
    let stray = dir.path().join("stray.md");
    fs::write(&input, "$a$").unwrap();

    zhihu_md()
        .env("ZHIHU_MD_OUTPUT", &stray)
        .args(["--quiet", "-i"])
        .arg(&input)
        .assert()
        .success();
    assert!(!stray.exists());
    assert!(dir.path().join("p_for_zhihu.md").exists());
}

#[test]
fn detect_only_reports_encoding() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("p.md");
    fs::write(&input, "hello").unwrap();

    zhihu_md()
        .arg("--detect-only")
        .arg("-i")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Encoding:    UTF-8"));
    assert!(!dir.path().join("p_for_zhihu.md").exists());
}

#[test]
fn json_report() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("p.md");
    fs::write(&input, "![a](a.png) $b$").unwrap();

    let assert = zhihu_md()
        .args(["--json", "--quiet", "-i"])
        .arg(&input)
        .assert()
        .success();
    let report: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("stdout is JSON");
    assert_eq!(report["encoding"], "UTF-8");
    assert_eq!(report["stats"]["images_missing"], 1);
    assert_eq!(report["stats"]["formulas_rewritten"], 1);
}

#[test]
fn legacy_formula_flag() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("p.md");
    fs::write(&input, "$x$").unwrap();

    zhihu_md()
        .args(["--legacy-formula", "--quiet", "-i"])
        .arg(&input)
        .assert()
        .success();
    let written = fs::read_to_string(dir.path().join("p_for_zhihu.md")).unwrap();
    assert!(written.contains("https://www.zhihu.com/equation?tex=x"));
}
