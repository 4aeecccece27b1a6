use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";
const SHORT_COMMIT_LEN: usize = 7;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SNAPSHOT_COMMIT");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");

    let commit = ["SNAPSHOT_COMMIT", "GITHUB_SHA"]
        .iter()
        .find_map(|key| env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .or_else(|| git(&["rev-parse", "HEAD"]))
        .map(|full| full.chars().take(SHORT_COMMIT_LEN).collect::<String>())
        .unwrap_or_else(|| UNKNOWN.to_string());
    let date = git(&["log", "-1", "--format=%cs"]).unwrap_or_else(|| UNKNOWN.to_string());

    println!("cargo:rustc-env=SNAPSHOT_BUILD_COMMIT={commit}");
    println!("cargo:rustc-env=SNAPSHOT_BUILD_DATE={date}");
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!value.is_empty()).then_some(value)
}
