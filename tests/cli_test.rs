use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn run_jsoutline(args: &[&str], stdin: Option<&str>) -> Output {
    let bin = env!("CARGO_BIN_EXE_jsoutline");
    let mut child = Command::new(bin)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run jsoutline");
    if let Some(input) = stdin {
        child.stdin.take().unwrap().write_all(input.as_bytes()).unwrap();
    }
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn outlines_a_source_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("math.test.js");
    fs::write(&path, "describe('math', () => {\n  it('adds', () => {});\n});\n").unwrap();

    let output = run_jsoutline(&[path.to_str().unwrap()], None);
    assert!(output.status.success());
    assert!(stdout(&output).ends_with("  describe math [1:3]\n    it adds [2:2]\n"));
}

#[test]
fn reads_ast_from_stdin() {
    let ast = fs::read_to_string("tests/fixtures/types.json").unwrap();
    let output = run_jsoutline(&["-", "--json"], Some(&ast));
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["files"][0]["path"], "<stdin>");
    assert_eq!(json["files"][0]["outline"][1]["representativeName"], "Bar");
}

#[test]
fn comma_separated_ext_filter() {
    let output = run_jsoutline(&["tests/fixtures", "--ext", "json,ts", "--stats"], None);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("files: 7  "));
}

#[test]
fn errors_exit_nonzero() {
    let output = run_jsoutline(&["/nonexistent/file.js"], None);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Error: Path not found"));
}

#[test]
fn ignore_case_requires_grep() {
    let output = run_jsoutline(&["tests/fixtures", "-i"], None);
    assert!(!output.status.success());
}

#[test]
fn watch_conflicts_with_stats() {
    let output = run_jsoutline(&["tests/fixtures", "--watch", "--stats"], None);
    assert!(!output.status.success());
}
