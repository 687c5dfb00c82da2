// shopscore-cli/src/main_tests.rs
// ============================================================================
// Module: Shopscore CLI Tests
// Description: Tests for argument parsing, settings resolution, and rendering.
// ============================================================================
//! ## Overview
//! Validates CLI argument wiring, config override merging, and text output
//! formatting without touching the filesystem.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use clap::CommandFactory;
use clap::Parser;
use shopscore_core::Verdict;
use shopscore_core::VerdictTally;

use crate::Cli;
use crate::Commands;
use crate::OutputFormat;
use crate::config::BenchConfig;
use crate::money;
use crate::money_with_retailer;
use crate::tally;

// ============================================================================
// SECTION: Argument Parsing
// ============================================================================

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_defaults() {
    let cli = Cli::parse_from(["shopscore", "report"]);
    assert!(matches!(cli.command, Commands::Report));
    assert_eq!(cli.format, OutputFormat::Text);
    assert!(cli.fixtures_dir.is_none());
    assert!(cli.config.is_none());
}

#[test]
fn test_parse_evaluate_by_case_id() {
    let cli = Cli::parse_from(["shopscore", "evaluate", "--case", "cs-001"]);
    match cli.command {
        Commands::Evaluate(args) => {
            assert_eq!(args.case.as_deref(), Some("cs-001"));
            assert!(args.file.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_rejects_case_and_file_together() {
    let result =
        Cli::try_parse_from(["shopscore", "evaluate", "--case", "cs-001", "--file", "x.json"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::parse_from(["shopscore", "list", "--format", "json", "--fixtures-dir", "/tmp/f"]);
    assert!(matches!(cli.command, Commands::List));
    assert_eq!(cli.format, OutputFormat::Json);
    assert_eq!(cli.fixtures_dir.as_deref(), Some(std::path::Path::new("/tmp/f")));
}

// ============================================================================
// SECTION: Config Overrides
// ============================================================================

#[test]
fn test_policy_defaults_without_config() {
    let policy = BenchConfig::default().evaluator_policy();
    assert!((policy.price_tolerance_usd - 0.01).abs() < f64::EPSILON);
    assert_eq!(policy.first_party_sellers.get("amazon").map(String::as_str), Some("amazon.com"));
    assert!(policy.refurbished_markers.iter().any(|marker| marker == "renewed"));
}

#[test]
fn test_policy_overrides_from_toml() {
    let config: BenchConfig = toml::from_str(
        r#"
        [evaluation]
        price_tolerance_usd = 0.05

        [evaluation.first_party_sellers]
        "Target" = "Target Inc"
        "#,
    )
    .unwrap();

    let policy = config.evaluator_policy();
    assert!((policy.price_tolerance_usd - 0.05).abs() < f64::EPSILON);
    // Override replaces the table and normalizes keys and values.
    assert_eq!(policy.first_party_sellers.get("target").map(String::as_str), Some("target inc"));
    assert!(!policy.first_party_sellers.contains_key("amazon"));
}

#[test]
fn test_config_rejects_unknown_keys() {
    let result = toml::from_str::<BenchConfig>("[evaluation]\nprice_tolerance = 1.0\n");
    assert!(result.is_err());
}

#[test]
fn test_config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shopscore.toml");
    std::fs::write(&path, "[fixtures]\ndir = \"fx\"\nschema = \"schema.json\"\n").unwrap();

    let config = BenchConfig::load(&path).unwrap();
    assert_eq!(config.fixtures.dir.as_deref(), Some(std::path::Path::new("fx")));
    assert_eq!(config.fixtures.schema.as_deref(), Some(std::path::Path::new("schema.json")));
}

#[test]
fn test_config_rejects_oversized_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shopscore.toml");
    let padding = format!("# {}\n", "x".repeat(70 * 1024));
    std::fs::write(&path, padding).unwrap();

    let err = BenchConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("limit"));
}

// ============================================================================
// SECTION: Text Rendering
// ============================================================================

#[test]
fn test_money_formatting_honors_null_convention() {
    assert_eq!(money(Some(12.5)), "$12.50");
    assert_eq!(money(None), "not evaluated");
}

#[test]
fn test_money_with_retailer_formatting() {
    let retailer = shopscore_core::Retailer::new("Best Buy");
    assert_eq!(money_with_retailer(Some(399.99), Some(&retailer)), "$399.99 (Best Buy)");
    assert_eq!(money_with_retailer(None, Some(&retailer)), "not evaluated");
}

#[test]
fn test_tally_formatting() {
    let mut counts = VerdictTally::default();
    counts.record(Verdict::Pass);
    counts.record(Verdict::Pass);
    counts.record(Verdict::NotEvaluated);
    assert_eq!(tally(&counts), "2 pass, 0 fail, 1 not evaluated");
}
