//! Rewrites `expected_report.json` for golden cases under `tests/golden`.
//!
//! Run from the repository root. With no arguments every case directory that
//! holds an `input.hex` is refreshed; otherwise only the named cases are.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use snapshot_core::analyze_capture_file;

const GOLDEN_ROOT: &str = "tests/golden";
const INPUT_FILE: &str = "input.hex";
const EXPECTED_FILE: &str = "expected_report.json";

struct GoldenCase {
    name: String,
    dir: PathBuf,
}

fn main() -> ExitCode {
    let only: Vec<String> = env::args().skip(1).collect();
    let cases = match discover_cases(&only) {
        Ok(cases) => cases,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(1);
        }
    };
    if cases.is_empty() {
        eprintln!("error: no golden cases found under {GOLDEN_ROOT}");
        return ExitCode::from(1);
    }

    let mut failed = false;
    for case in &cases {
        match regenerate(case) {
            Ok(violations) => println!("{}: ok ({violations} violations)", case.name),
            Err(err) => {
                eprintln!("{}: {err}", case.name);
                failed = true;
            }
        }
    }
    if failed { ExitCode::from(1) } else { ExitCode::SUCCESS }
}

fn discover_cases(only: &[String]) -> Result<Vec<GoldenCase>, String> {
    let root = PathBuf::from(GOLDEN_ROOT);
    let entries =
        fs::read_dir(&root).map_err(|err| format!("cannot list {}: {err}", root.display()))?;

    let mut cases = Vec::new();
    for entry in entries {
        let dir = entry.map_err(|err| format!("cannot read entry: {err}"))?.path();
        if !dir.join(INPUT_FILE).is_file() {
            continue;
        }
        let Some(name) = dir.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        if only.is_empty() || only.contains(&name) {
            cases.push(GoldenCase { name, dir });
        }
    }
    cases.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(cases)
}

fn regenerate(case: &GoldenCase) -> Result<usize, String> {
    let input = case.dir.join(INPUT_FILE);
    let report = analyze_capture_file(&input).map_err(|err| format!("analysis failed: {err}"))?;
    let json = serde_json::to_string(&report).map_err(|err| format!("serialize: {err}"))?;
    let output = case.dir.join(EXPECTED_FILE);
    fs::write(&output, json).map_err(|err| format!("write {}: {err}", output.display()))?;
    Ok(report.violations.len())
}
