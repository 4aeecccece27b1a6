use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use serde::Serialize;
use snapshot_core::{
    DecodeError, DecodeOutcome, FrameEvent, HexFileSource, InputInfo, SessionReport,
    all_commands, analyze_source_with, decode, parse_hex_frame,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SNAPSHOT_BUILD_COMMIT"),
    " ",
    env!("SNAPSHOT_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "snapshot")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for Snapshot colorimeter packets and captured sessions.",
    long_about = None,
    after_help = "Examples:\n  snapshot decode 7E200200\n  snapshot analyse session.hex -o report.json\n  snapshot analyze session.hex --stdout --pretty\n  snapshot commands"
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a single packet given as hex bytes.
    Decode {
        /// Packet bytes, e.g. "7E 20 02 00" or 0x7e200200
        hex: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Analyse a hex capture and generate a versioned JSON session report.
    #[command(alias = "analyze")]
    #[command(
        after_help = "Examples:\n  snapshot analyse session.hex -o report.json\n  snapshot analyze session.hex --stdout --pretty"
    )]
    Analyse {
        /// Path to a .hex or .txt capture (one packet per line)
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if protocol violations are present
        #[arg(long)]
        strict: bool,

        /// List protocol violations after analysis
        #[arg(long)]
        list_violations: bool,
    },
    /// List the known device commands.
    Commands {
        /// Print the table as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Decode { hex, pretty } => cmd_decode(&hex, pretty),
        Commands::Analyse {
            input,
            report,
            stdout,
            pretty,
            compact,
            quiet,
            strict,
            list_violations,
        } => cmd_analyse(
            input,
            report,
            stdout,
            pretty,
            compact,
            quiet,
            strict,
            list_violations,
        ),
        Commands::Commands { json } => cmd_commands(json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "snapshot=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

#[derive(Serialize)]
struct DecodeOutput<'a> {
    frame: String,
    #[serde(flatten)]
    outcome: &'a DecodeOutcome,
}

fn cmd_decode(hex: &str, pretty: bool) -> Result<(), CliError> {
    let bytes = parse_hex_frame(hex).map_err(|err| {
        CliError::new(
            format!("invalid packet bytes: {err}"),
            Some("pass hex digits, e.g. \"7E 20 02 00\"".to_string()),
        )
    })?;
    let outcome = decode(&bytes).map_err(|err| {
        let hint = decode_error_hint(&err);
        CliError::new(format!("decode failed: {err}"), Some(hint.to_string()))
    })?;
    debug!(command = %outcome.command(), "decoded packet");

    let output = DecodeOutput {
        frame: format_hex(&bytes),
        outcome: &outcome,
    };
    println!("{}", to_json(&output, pretty)?);
    Ok(())
}

fn decode_error_hint(err: &DecodeError) -> &'static str {
    match err {
        DecodeError::InvalidHeader { .. } => "packets start with the 0x7E marker byte",
        DecodeError::Truncated { .. } => {
            "a packet needs marker, flags, command and error code bytes"
        }
        DecodeError::UnknownCommand(_) => "run `snapshot commands` to list known identifiers",
        DecodeError::PayloadDecode { .. } => "the colour response carries three big-endian f32",
    }
}

fn cmd_commands(json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", to_json(&all_commands(), true)?);
        return Ok(());
    }
    println!("{:>3}  {:<32}  {}", "ID", "NAME", "RESPONSE_LEN");
    for descriptor in all_commands() {
        println!(
            "{:>3}  {:<32}  {}",
            descriptor.identifier, descriptor.name, descriptor.expected_response_len
        );
    }
    Ok(())
}

fn cmd_analyse(
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
    list_violations: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;
    let report = if stdout {
        None
    } else {
        Some(report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };

    if let Some(report_path) = report.as_ref() {
        // A directory that does not exist yet cannot hold the input.
        let report_abs = report_path
            .parent()
            .map(|parent| {
                if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                }
            })
            .filter(|parent| parent.exists())
            .map(fs::canonicalize)
            .transpose()
            .with_context(|| format!("Failed to resolve output path: {}", report_path.display()))?;
        if let Some(report_dir) = report_abs {
            let report_target = report_dir.join(
                report_path
                    .file_name()
                    .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?,
            );
            if report_target == input_abs {
                return Err(CliError::new(
                    format!(
                        "report path must differ from input: {}",
                        report_path.display()
                    ),
                    Some("choose a different output path".to_string()),
                ));
            }
        }
    }

    let meta = fs::metadata(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;

    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .hex or .txt capture".to_string()),
        ));
    }

    info!(input = %resolved_input.display(), bytes = meta.len(), "analysing capture");
    let source = HexFileSource::open(&resolved_input)
        .with_context(|| format!("Failed to open capture: {}", resolved_input.display()))?;
    let input_info = InputInfo {
        path: resolved_input.display().to_string(),
        bytes: meta.len(),
    };
    let rep = analyze_source_with(input_info, source, log_frame)
        .context("capture analysis failed")?;
    log_summary(&rep);
    let json = serialize_report(&rep, pretty, compact)?;

    if stdout {
        println!("{}", json);
        if list_violations && !quiet {
            print_violations(&rep);
        }
        if strict && has_violations(&rep) {
            return Err(CliError::new(
                "protocol violations detected",
                Some("use --list-violations to inspect".to_string()),
            ));
        }
        return Ok(());
    }

    let report = report.ok_or_else(|| CliError::new("missing output path", None))?;
    if let Some(parent) = report.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    fs::write(&report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;

    if list_violations && !quiet {
        print_violations(&rep);
    }
    if !quiet {
        eprintln!("OK: report written -> {}", report.display());
    }
    if strict && has_violations(&rep) {
        return Err(CliError::new(
            "protocol violations detected",
            Some("use --list-violations to inspect".to_string()),
        ));
    }
    Ok(())
}

fn log_frame(index: u64, event: &FrameEvent, result: &Result<DecodeOutcome, DecodeError>) {
    match result {
        Ok(DecodeOutcome::Notification(command)) => {
            debug!(frame = index, command = %command, "notification");
        }
        Ok(DecodeOutcome::DeviceError { command, code }) => {
            debug!(frame = index, command = %command, code = *code, "device error");
        }
        Ok(DecodeOutcome::Response { command, value }) => {
            debug!(frame = index, command = %command, value = ?value, "response");
        }
        Err(err) => {
            debug!(frame = index, kind = err.kind(), bytes = %format_hex(&event.data), "{err}");
        }
    }
}

fn log_summary(rep: &SessionReport) {
    if let Some(summary) = rep.capture_summary.as_ref() {
        info!(
            frames = summary.frames_total,
            decoded = summary.frames_decoded,
            colours = rep.colours.len(),
            "analysis complete"
        );
    }
    for violation in &rep.violations {
        warn!(id = %violation.id, count = violation.count, "{}", violation.message);
    }
}

fn serialize_report(rep: &SessionReport, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    to_json(rep, pretty)
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(value)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn format_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

fn has_violations(rep: &SessionReport) -> bool {
    !rep.violations.is_empty()
}

fn print_violations(rep: &SessionReport) {
    let mut violations: Vec<_> = rep.violations.iter().collect();
    violations.sort_by(|a, b| a.id.cmp(&b.id));
    eprintln!("Protocol violations:");
    for violation in violations {
        eprintln!(
            "  {} {} ({})",
            violation.severity, violation.id, violation.count
        );
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .hex or .txt capture".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "hex" && ext != "txt" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .hex or .txt capture".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected .hex or .txt".to_string()),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single capture file, or run once per file".to_string();
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches.iter().take(3).collect::<Vec<_>>();
        if !listed.is_empty() {
            let mut details = String::new();
            details.push_str("; matches: ");
            details.push_str(
                &listed
                    .into_iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            if matches.len() > 3 {
                details.push_str(", ...");
            }
            message.push_str(&details);
        }
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
