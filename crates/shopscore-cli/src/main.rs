// shopscore-cli/src/main.rs
// ============================================================================
// Module: Shopscore CLI Entry Point
// Description: Command dispatcher for the offline evaluation bench.
// Purpose: List, validate, evaluate, and report on case-study fixtures.
// Dependencies: clap, jsonschema, serde_json, shopscore-core, thiserror, toml.
// ============================================================================

//! ## Overview
//! The `shopscore` binary drives the bench end to end: it discovers fixture
//! files, validates them against the shipped v0 JSON schema, evaluates each
//! case, and renders per-case or aggregate reports as text or JSON. Fixture
//! and config inputs are untrusted and size-capped before parsing.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod config;
#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use jsonschema::Draft;
use jsonschema::Validator;
use serde::Serialize;
use serde_json::Value;
use shopscore_core::BenchReport;
use shopscore_core::CaseReport;
use shopscore_core::CaseStudy;
use shopscore_core::DEFAULT_FIXTURES_DIR;
use shopscore_core::DigestError;
use shopscore_core::EvaluatorPolicy;
use shopscore_core::LoadError;
use shopscore_core::MAX_FIXTURE_BYTES;
use shopscore_core::Verdict;
use shopscore_core::case_study_files;
use shopscore_core::evaluate_case;
use shopscore_core::load_case_studies;
use shopscore_core::load_case_study;
use thiserror::Error;

use crate::config::BenchConfig;
use crate::config::CONFIG_ENV_VAR;
use crate::config::ConfigError;
use crate::config::DEFAULT_CONFIG_NAME;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable overriding the fixture directory.
const FIXTURES_DIR_ENV: &str = "SHOPSCORE_FIXTURES_DIR";
/// Default schema file relative to the repository root.
const DEFAULT_SCHEMA_PATH: &str = "data/fixtures/schema_v0.json";
/// Maximum size of the schema file in bytes.
const MAX_SCHEMA_BYTES: u64 = MAX_FIXTURE_BYTES;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "shopscore", version, about = "Offline evaluation bench for shopping-agent runs")]
struct Cli {
    /// Case-study fixture directory (overrides config and environment).
    #[arg(long, value_name = "DIR", global = true)]
    fixtures_dir: Option<PathBuf>,
    /// Schema file used by `validate` (overrides config).
    #[arg(long, value_name = "FILE", global = true)]
    schema: Option<PathBuf>,
    /// Config file path (defaults to `shopscore.toml` when present).
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Output format for command results.
    #[arg(long, value_enum, value_name = "FORMAT", default_value = "text", global = true)]
    format: OutputFormat,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Bench subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List fixture files and case identifiers in evaluation order.
    List,
    /// Validate fixtures against the v0 schema and structural invariants.
    Validate,
    /// Evaluate one case study.
    Evaluate(EvaluateArgs),
    /// Evaluate every fixture and print the aggregate bench report.
    Report,
}

/// Case selector for `evaluate`.
#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Case identifier to evaluate from the fixture directory.
    #[arg(long, value_name = "ID", conflicts_with = "file")]
    case: Option<String>,
    /// Fixture file to evaluate directly.
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI-level errors mapped to a failure exit code.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration loading failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Fixture loading failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Fixture digest computation failed.
    #[error(transparent)]
    Digest(#[from] DigestError),
    /// Schema loading or compilation failed.
    #[error("schema '{path}' unusable: {reason}")]
    Schema {
        /// Schema path that failed.
        path: PathBuf,
        /// Failure detail.
        reason: String,
    },
    /// The requested case id is not present in the fixture directory.
    #[error("unknown case id '{0}'")]
    UnknownCase(String),
    /// Neither `--case` nor `--file` was given to `evaluate`.
    #[error("evaluate requires exactly one of --case or --file")]
    MissingSelector,
    /// Writing output failed.
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
    /// Serializing JSON output failed.
    #[error("failed to serialize output: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Result alias for CLI operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Process entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            let _ = write_stderr_line(&format!("error: {err}"));
            ExitCode::FAILURE
        }
    }
}

/// Resolves settings and dispatches the selected subcommand.
fn run(cli: Cli) -> CliResult<ExitCode> {
    let settings = Settings::resolve(&cli)?;
    match &cli.command {
        Commands::List => command_list(&settings, cli.format),
        Commands::Validate => command_validate(&settings, cli.format),
        Commands::Evaluate(args) => command_evaluate(&settings, cli.format, args),
        Commands::Report => command_report(&settings, cli.format),
    }
}

// ============================================================================
// SECTION: Settings Resolution
// ============================================================================

/// Effective settings after merging flags, environment, and config.
struct Settings {
    /// Resolved fixture directory.
    fixtures_dir: PathBuf,
    /// Resolved schema file path.
    schema_path: PathBuf,
    /// Resolved evaluator policy.
    policy: EvaluatorPolicy,
}

impl Settings {
    /// Resolves settings with precedence: flag, environment, config, default.
    fn resolve(cli: &Cli) -> CliResult<Self> {
        let config = load_config(cli.config.as_deref())?;

        let fixtures_dir = cli
            .fixtures_dir
            .clone()
            .or_else(|| env::var_os(FIXTURES_DIR_ENV).map(PathBuf::from))
            .or_else(|| config.fixtures.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FIXTURES_DIR));

        let schema_path = cli
            .schema
            .clone()
            .or_else(|| config.fixtures.schema.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_PATH));

        Ok(Self {
            fixtures_dir,
            schema_path,
            policy: config.evaluator_policy(),
        })
    }
}

/// Loads config from the explicit path, environment, or default file.
///
/// An explicitly named file must load; the default file is only loaded when
/// it exists.
fn load_config(explicit: Option<&Path>) -> CliResult<BenchConfig> {
    if let Some(path) = explicit {
        return Ok(BenchConfig::load(path)?);
    }
    if let Some(path) = env::var_os(CONFIG_ENV_VAR).map(PathBuf::from) {
        return Ok(BenchConfig::load(&path)?);
    }
    let default = Path::new(DEFAULT_CONFIG_NAME);
    if default.is_file() {
        return Ok(BenchConfig::load(default)?);
    }
    Ok(BenchConfig::default())
}

// ============================================================================
// SECTION: List Command
// ============================================================================

/// One row of `list` output.
#[derive(Debug, Serialize)]
struct ListRow {
    /// Fixture file path.
    path: PathBuf,
    /// Case identifier.
    id: String,
    /// Case title.
    title: String,
}

/// Lists fixture files and case identifiers in evaluation order.
fn command_list(settings: &Settings, format: OutputFormat) -> CliResult<ExitCode> {
    let mut rows = Vec::new();
    for path in case_study_files(&settings.fixtures_dir)? {
        let case = load_case_study(&path)?;
        rows.push(ListRow {
            path,
            id: case.id.to_string(),
            title: case.title,
        });
    }

    match format {
        OutputFormat::Json => write_json(&rows)?,
        OutputFormat::Text => {
            for row in &rows {
                write_stdout_line(&format!("{}  {}  {}", row.path.display(), row.id, row.title))?;
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Validate Command
// ============================================================================

/// One fixture failure recorded by `validate`.
#[derive(Debug, Serialize)]
struct ValidationFailure {
    /// Fixture file path.
    path: PathBuf,
    /// Failure description.
    error: String,
}

/// Summary of a `validate` run.
#[derive(Debug, Serialize)]
struct ValidationSummary {
    /// Number of fixture files checked.
    checked: usize,
    /// Failures in evaluation order.
    failures: Vec<ValidationFailure>,
}

/// Validates fixtures against the schema and structural invariants.
fn command_validate(settings: &Settings, format: OutputFormat) -> CliResult<ExitCode> {
    let validator = compile_schema(&settings.schema_path)?;
    let files = case_study_files(&settings.fixtures_dir)?;

    let mut summary = ValidationSummary {
        checked: files.len(),
        failures: Vec::new(),
    };

    for path in files {
        match validate_fixture(&validator, &path) {
            Ok(()) => {}
            Err(reason) => summary.failures.push(ValidationFailure {
                path,
                error: reason,
            }),
        }
    }

    match format {
        OutputFormat::Json => write_json(&summary)?,
        OutputFormat::Text => {
            if summary.failures.is_empty() {
                write_stdout_line(&format!("ok: {} fixture(s) valid", summary.checked))?;
            } else {
                for failure in &summary.failures {
                    write_stdout_line(&format!(
                        "fail: {}: {}",
                        failure.path.display(),
                        failure.error
                    ))?;
                }
                write_stdout_line(&format!(
                    "{} of {} fixture(s) invalid",
                    summary.failures.len(),
                    summary.checked
                ))?;
            }
        }
    }

    if summary.failures.is_empty() { Ok(ExitCode::SUCCESS) } else { Ok(ExitCode::FAILURE) }
}

/// Validates one fixture file, returning a failure description on error.
fn validate_fixture(validator: &Validator, path: &Path) -> Result<(), String> {
    let bytes = fs::read(path).map_err(|err| format!("read failed: {err}"))?;
    let instance: Value =
        serde_json::from_slice(&bytes).map_err(|err| format!("invalid json: {err}"))?;

    let mut schema_errors = validator.iter_errors(&instance);
    if let Some(first) = schema_errors.next() {
        return Err(format!("schema violation at '{}': {first}", first.instance_path()));
    }

    // Structural pass: decode, normalize, and validate invariants the schema
    // cannot express (timestamp parsing, trimmed-empty strings).
    load_case_study(path).map(|_| ()).map_err(|err| err.to_string())
}

/// Loads and compiles the v0 schema.
fn compile_schema(path: &Path) -> CliResult<Validator> {
    let metadata = fs::metadata(path).map_err(|err| CliError::Schema {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    if metadata.len() > MAX_SCHEMA_BYTES {
        return Err(CliError::Schema {
            path: path.to_path_buf(),
            reason: format!("{} bytes exceeds limit {MAX_SCHEMA_BYTES}", metadata.len()),
        });
    }

    let bytes = fs::read(path).map_err(|err| CliError::Schema {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    let schema: Value = serde_json::from_slice(&bytes).map_err(|err| CliError::Schema {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;

    jsonschema::options().with_draft(Draft::Draft202012).build(&schema).map_err(|err| {
        CliError::Schema {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    })
}

// ============================================================================
// SECTION: Evaluate Command
// ============================================================================

/// Evaluates one case selected by id or by file.
fn command_evaluate(
    settings: &Settings,
    format: OutputFormat,
    args: &EvaluateArgs,
) -> CliResult<ExitCode> {
    let case = match (&args.case, &args.file) {
        (Some(id), None) => find_case(&settings.fixtures_dir, id)?,
        (None, Some(path)) => load_case_study(path)?,
        _ => return Err(CliError::MissingSelector),
    };

    let evaluation = evaluate_case(&case, &settings.policy);
    let report = CaseReport::from_case(&case, evaluation)?;

    match format {
        OutputFormat::Json => write_json(&report)?,
        OutputFormat::Text => write_stdout_line(&render_case_text(&report))?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Finds a case by id in the fixture directory.
fn find_case(fixtures_dir: &Path, id: &str) -> CliResult<CaseStudy> {
    load_case_studies(fixtures_dir)?
        .into_iter()
        .find(|case| case.id.as_str() == id)
        .ok_or_else(|| CliError::UnknownCase(id.to_string()))
}

// ============================================================================
// SECTION: Report Command
// ============================================================================

/// Evaluates every fixture and prints the aggregate bench report.
fn command_report(settings: &Settings, format: OutputFormat) -> CliResult<ExitCode> {
    let mut rows = Vec::new();
    for case in load_case_studies(&settings.fixtures_dir)? {
        let evaluation = evaluate_case(&case, &settings.policy);
        rows.push(CaseReport::from_case(&case, evaluation)?);
    }
    let report = BenchReport::build(rows);

    match format {
        OutputFormat::Json => write_json(&report)?,
        OutputFormat::Text => write_stdout_line(&render_bench_text(&report))?,
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Text Rendering
// ============================================================================

/// Renders one case report as aligned text.
fn render_case_text(report: &CaseReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "case {}: {}", report.case_id, report.title);
    let _ = writeln!(out, "  fixture:          {}", report.fixture_digest);
    let eval = &report.evaluation;
    let _ = writeln!(
        out,
        "  best price:       {}",
        money_with_retailer(eval.best_price_usd, eval.best_price_retailer.as_ref())
    );
    let _ = writeln!(
        out,
        "  chosen price:     {}",
        money_with_retailer(eval.chosen_price_usd, eval.chosen_retailer.as_ref())
    );
    let _ = writeln!(out, "  choice qualified: {}", eval.choice_qualified);
    let _ = writeln!(out, "  found best price: {}", eval.found_best_price);
    let _ = writeln!(
        out,
        "  within budget:    {} (agent claimed: {})",
        eval.within_budget, eval.claimed_within_budget
    );
    let _ = write!(out, "  overpay:          {}", money(eval.overpay_usd));
    out
}

/// Renders the aggregate bench report as text.
fn render_bench_text(report: &BenchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "cases evaluated:   {}", report.case_count);
    let _ = writeln!(out, "found best price:  {}", tally(&report.found_best_price));
    let _ = writeln!(out, "within budget:     {}", tally(&report.within_budget));
    let _ = writeln!(out, "matched choices:   {}", report.matched_choices);
    let _ = writeln!(out, "total overpay:     {}", money(report.total_overpay_usd));
    let _ = writeln!(out, "mean overpay:      {}", money(report.mean_overpay_usd));
    for case in &report.cases {
        let _ = writeln!(
            out,
            "  {}: found_best={} within_budget={} overpay={}",
            case.case_id,
            case.evaluation.found_best_price,
            case.evaluation.within_budget,
            money(case.evaluation.overpay_usd)
        );
    }
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out
}

/// Formats a verdict tally as `pass/fail/not evaluated` counts.
fn tally(tally: &shopscore_core::VerdictTally) -> String {
    format!("{} pass, {} fail, {} not evaluated", tally.pass, tally.fail, tally.not_evaluated)
}

/// Formats an optional USD amount, honoring the null convention.
fn money(value: Option<f64>) -> String {
    value.map_or_else(|| Verdict::NotEvaluated.to_string(), |amount| format!("${amount:.2}"))
}

/// Formats an optional amount with its retailer when both are known.
fn money_with_retailer(value: Option<f64>, retailer: Option<&shopscore_core::Retailer>) -> String {
    match (value, retailer) {
        (Some(amount), Some(retailer)) => format!("${amount:.2} ({retailer})"),
        (Some(amount), None) => format!("${amount:.2}"),
        _ => Verdict::NotEvaluated.to_string(),
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}").map_err(CliError::Output)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> CliResult<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}").map_err(CliError::Output)
}

/// Writes a value as pretty JSON to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(CliError::Serialize)?;
    write_stdout_line(&rendered)
}
