use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("snapshot"))
}

fn repo_root() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root")
        .to_path_buf()
}

fn capture(name: &str) -> std::path::PathBuf {
    repo_root()
        .join("tests")
        .join("golden")
        .join(name)
        .join("input.hex")
}

fn sample_capture() -> std::path::PathBuf {
    capture("colour_session")
}

#[test]
fn help_supports_analyse_and_analyze() {
    cmd().arg("analyse").arg("--help").assert().success();
    cmd().arg("analyze").arg("--help").assert().success();
}

#[test]
fn decode_prints_colour_json() {
    let assert = cmd()
        .arg("decode")
        .arg("7E 20 40 00 42 54 EB 85 42 A0 38 52 42 86 70 A4")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["kind"], "response");
    assert_eq!(value["command"]["name"], "CMD_GET_DATA_COLOUR");
    assert_eq!(value["value"]["type"], "colour");
    assert_eq!(value["value"]["value"], "#FE0000");
}

#[test]
fn decode_device_error_is_not_a_failure() {
    let assert = cmd().arg("decode").arg("7E200205").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["kind"], "device_error");
    assert_eq!(value["code"], 5);
    assert_eq!(value["frame"], "7E200205");
}

#[test]
fn decode_unknown_command_shows_error_and_hint() {
    cmd()
        .arg("decode")
        .arg("7E20FA00")
        .assert()
        .failure()
        .stderr(contains("unknown command identifier: 250").and(contains("hint:")));
}

#[test]
fn decode_rejects_invalid_hex() {
    cmd()
        .arg("decode")
        .arg("7E2")
        .assert()
        .failure()
        .stderr(contains("invalid packet bytes"));
}

#[test]
fn commands_lists_table() {
    cmd()
        .arg("commands")
        .assert()
        .success()
        .stdout(contains("CMD_GET_DATA_COLOUR").and(contains("CMD_PING")));
}

#[test]
fn commands_json_has_every_entry() {
    let assert = cmd().arg("commands").arg("--json").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value.as_array().map(Vec::len), Some(26));
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.hex");
    let report = temp.path().join("report.json");

    cmd()
        .arg("analyze")
        .arg(missing)
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn stdout_outputs_json() {
    let input = sample_capture();
    let assert = cmd()
        .arg("analyze")
        .arg(input)
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["last_colour"], "#7F7F7F");
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture();
    let report = temp.path().join("report.json");

    cmd()
        .arg("analyze")
        .arg(input)
        .arg("--stdout")
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn pretty_and_compact_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture();
    let report = temp.path().join("report.json");

    cmd()
        .arg("analyze")
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn report_is_written_to_file() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture();
    let report = temp.path().join("nested").join("report.json");

    cmd()
        .arg("analyse")
        .arg(input)
        .arg("-o")
        .arg(&report)
        .assert()
        .success()
        .stderr(contains("OK: report written"));
    let json = std::fs::read_to_string(&report).expect("report written");
    let value: Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["capture_summary"]["frames_total"], 9);
}

#[test]
fn report_creates_missing_directories() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("a").join("b").join("c").join("report.json");

    cmd()
        .arg("analyze")
        .arg(sample_capture())
        .arg("-o")
        .arg(&report)
        .arg("--quiet")
        .assert()
        .success();
    assert!(report.is_file());
}

#[test]
fn report_matching_input_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("session.hex");
    std::fs::copy(sample_capture(), &input).expect("copy capture");

    cmd()
        .arg("analyze")
        .arg(&input)
        .arg("-o")
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("report path must differ from input"));
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture();
    let report = temp.path().join("report.json");

    cmd()
        .arg("analyze")
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(predicates::str::contains("OK:").not());
}

#[test]
fn unsupported_extension_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("capture.bin");
    std::fs::write(&input, "7E000200\n").expect("write input");

    cmd()
        .arg("analyze")
        .arg(input)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("unsupported input format"));
}

#[test]
fn list_violations_outputs_ids() {
    let temp = TempDir::new().expect("tempdir");
    let input = capture("malformed");
    let report = temp.path().join("report.json");

    cmd()
        .arg("analyze")
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--list-violations")
        .assert()
        .success()
        .stderr(contains("Protocol violations:").and(contains("SNAP-UNKNOWN-COMMAND")));
}

#[test]
fn strict_fails_when_violations_present() {
    let temp = TempDir::new().expect("tempdir");
    let input = capture("malformed");
    let report = temp.path().join("report.json");

    cmd()
        .arg("analyze")
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("protocol violations detected"));
}

#[test]
fn strict_passes_clean_capture() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("analyze")
        .arg(sample_capture())
        .arg("-o")
        .arg(report)
        .arg("--strict")
        .assert()
        .success();
}
