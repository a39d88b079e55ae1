//! Integration tests for the Pyshape CLI
//!
//! These tests drive the binary end to end against submissions and check
//! suites written to temporary directories.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

/// Test helper to get the CLI binary
fn pyshape_cmd() -> Command {
    Command::cargo_bin("pyshape").unwrap()
}

const SUBMISSION: &str = r#"LIMIT = 10
name = input()

def classify(n):
    if n > 0:
        return "positive"
    elif n < 0:
        return "negative"
    else:
        return "zero"
"#;

const PASSING_SUITE: &str = r#"
name: conditionals
checks:
  - kind: has_function
    name: classify
  - kind: variable_equals
    name: LIMIT
    value: 10
  - kind: variable_is_call
    name: name
    function: input
  - id: branches
    kind: conditions
    scope:
      function: classify
      index: [0]
    expected: ["n > 0", "n < 0", null]
"#;

const FAILING_SUITE: &str = r#"
name: conditionals
checks:
  - kind: has_function
    name: classify
  - id: main-defined
    kind: has_function
    name: main
"#;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_cli_help() {
    pyshape_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("equivalent"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_cli_version() {
    pyshape_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_check_passing_suite() {
    let dir = tempdir().unwrap();
    let file = write_file(&dir, "solution.py", SUBMISSION);
    let suite = write_file(&dir, "suite.yml", PASSING_SUITE);

    pyshape_cmd()
        .arg("check")
        .arg(&file)
        .arg("--suite")
        .arg(&suite)
        .assert()
        .success()
        .stdout(predicate::str::contains("branches: all 3 branch(es) match"))
        .stdout(predicate::str::contains("4 passed, 0 failed, 0 skipped"));
}

#[test]
fn test_check_failing_suite_exits_one() {
    let dir = tempdir().unwrap();
    let file = write_file(&dir, "solution.py", SUBMISSION);
    let suite = write_file(&dir, "suite.yml", FAILING_SUITE);

    pyshape_cmd()
        .arg("check")
        .arg(&file)
        .arg("--suite")
        .arg(&suite)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "main-defined: function `main` is not defined",
        ));
}

#[test]
fn test_check_json_report() {
    let dir = tempdir().unwrap();
    let file = write_file(&dir, "solution.py", SUBMISSION);
    let suite = write_file(&dir, "suite.yml", FAILING_SUITE);

    let output = pyshape_cmd()
        .args(["check", "--format", "json", "--suite"])
        .arg(&suite)
        .arg(&file)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["suite"], "conditionals");
    assert_eq!(report["passed"], 1);
    assert_eq!(report["failed"], 1);
    assert_eq!(report["outcomes"][1]["id"], "main-defined");
    assert_eq!(report["outcomes"][1]["passed"], false);
}

#[test]
fn test_check_json_suite_file() {
    let dir = tempdir().unwrap();
    let file = write_file(&dir, "solution.py", SUBMISSION);
    let suite = write_file(
        &dir,
        "suite.json",
        r#"{"name": "json-suite", "checks": [{"kind": "if_count", "count": 0}]}"#,
    );

    pyshape_cmd()
        .arg("check")
        .arg(&file)
        .arg("--suite")
        .arg(&suite)
        .assert()
        .success();
}

#[test]
fn test_check_unparseable_submission_exits_two() {
    let dir = tempdir().unwrap();
    let file = write_file(&dir, "broken.py", "def classify(n)\n    return n\n");
    let suite = write_file(&dir, "suite.yml", PASSING_SUITE);

    pyshape_cmd()
        .arg("check")
        .arg(&file)
        .arg("--suite")
        .arg(&suite)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Parse error in python"));
}

#[test]
fn test_check_invalid_suite_fails() {
    let dir = tempdir().unwrap();
    let file = write_file(&dir, "solution.py", SUBMISSION);
    let suite = write_file(&dir, "suite.yml", "name: empty\nchecks: []\n");

    pyshape_cmd()
        .arg("check")
        .arg(&file)
        .arg("--suite")
        .arg(&suite)
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one check"));
}

#[test]
fn test_check_missing_submission_fails() {
    let dir = tempdir().unwrap();
    let suite = write_file(&dir, "suite.yml", PASSING_SUITE);

    pyshape_cmd()
        .arg("check")
        .arg(dir.path().join("missing.py"))
        .arg("--suite")
        .arg(&suite)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read submission"));
}

#[test]
fn test_unparse_canonicalizes() {
    let dir = tempdir().unwrap();
    let file = write_file(&dir, "messy.py", "x=(1+2)*3  # note\nif x:  y = 0x10\n");

    pyshape_cmd()
        .arg("unparse")
        .arg(&file)
        .assert()
        .success()
        .stdout("x = (1 + 2) * 3\nif x:\n    y = 16\n");
}

#[test]
fn test_dump_text_and_json() {
    let dir = tempdir().unwrap();
    let file = write_file(&dir, "solution.py", SUBMISSION);

    pyshape_cmd()
        .arg("dump")
        .arg(&file)
        .args(["--index", "0"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Handle:\nexpression_statement"))
        .stdout(predicate::str::contains("\"LIMIT\""));

    let output = pyshape_cmd()
        .arg("dump")
        .arg(&file)
        .args(["--index", "2", "--index", "0", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let tree: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tree["kind"], "if_statement");
    assert_eq!(tree["span"]["start_line"], 5);
}

#[test]
fn test_dump_index_out_of_range() {
    let dir = tempdir().unwrap();
    let file = write_file(&dir, "solution.py", SUBMISSION);

    pyshape_cmd()
        .arg("dump")
        .arg(&file)
        .args(["--index", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Index 9 out of range"));
}

#[test]
fn test_equivalent_true_and_false() {
    let dir = tempdir().unwrap();
    let file = write_file(&dir, "solution.py", SUBMISSION);

    pyshape_cmd()
        .arg("equivalent")
        .arg(&file)
        .arg("LIMIT = 0xA")
        .args(["--index", "0"])
        .assert()
        .success()
        .stdout("true\n");

    pyshape_cmd()
        .arg("equivalent")
        .arg(&file)
        .arg("LIMIT = 11")
        .args(["--index", "0"])
        .assert()
        .code(1)
        .stdout("false\n");
}

#[test]
fn test_equivalent_invalid_snippet_fails() {
    let dir = tempdir().unwrap();
    let file = write_file(&dir, "solution.py", SUBMISSION);

    pyshape_cmd()
        .arg("equivalent")
        .arg(&file)
        .arg("def (")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected snippet is not valid Python"));
}
