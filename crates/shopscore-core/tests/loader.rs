// shopscore-core/tests/loader.rs
// ============================================================================
// Module: Fixture Loader Tests
// Description: Tests for discovery ordering and size-capped loading.
// ============================================================================
//! ## Overview
//! Drives the fixture loader against temporary directories: deterministic
//! discovery order, the missing-directory case, size caps, and error paths
//! that carry the offending file.

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

use std::fs;
use std::path::Path;

use serde_json::json;
use shopscore_core::LoadError;
use shopscore_core::case_study_files;
use shopscore_core::load_case_studies;
use shopscore_core::load_case_study;

// ============================================================================
// SECTION: Fixture Helpers
// ============================================================================

/// Writes a minimal valid fixture with the given id into the directory.
fn write_fixture(dir: &Path, file_name: &str, id: &str) {
    let fixture = json!({
        "version": "v0",
        "id": id,
        "title": "Sample case",
        "created_at": "2025-11-02T18:30:00Z",
        "agent": { "name": "cartwheel" },
        "task": {
            "product_name": "Apple AirPods Pro 2",
            "currency": "USD",
            "allowed_retailers": ["Amazon"],
            "rules": {
                "allow_third_party": false,
                "allow_refurbished": false,
                "require_full_set": false
            }
        },
        "agent_output": {
            "raw_text": "Amazon price: $229.00\n",
            "captured_at": "2025-11-02T18:05:12Z"
        },
        "evidence": []
    });
    fs::write(dir.join(file_name), serde_json::to_vec_pretty(&fixture).unwrap()).unwrap();
}

// ============================================================================
// SECTION: Discovery
// ============================================================================

#[test]
fn test_discovery_orders_by_filename() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "cs-010.json", "cs-010");
    write_fixture(dir.path(), "cs-002.json", "cs-002");
    write_fixture(dir.path(), "cs-001.json", "cs-001");

    let files = case_study_files(dir.path()).unwrap();
    let names: Vec<_> =
        files.iter().map(|path| path.file_name().unwrap().to_string_lossy().to_string()).collect();
    assert_eq!(names, ["cs-001.json", "cs-002.json", "cs-010.json"]);
}

#[test]
fn test_discovery_skips_non_json_entries() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "cs-001.json", "cs-001");
    fs::write(dir.path().join("README.md"), "notes\n").unwrap();
    fs::write(dir.path().join("cs-002.json.bak"), "{}\n").unwrap();
    fs::create_dir(dir.path().join("nested.json")).unwrap();

    let files = case_study_files(dir.path()).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("cs-001.json"));
}

#[test]
fn test_missing_directory_is_an_empty_bench() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    assert!(case_study_files(&missing).unwrap().is_empty());
    assert!(load_case_studies(&missing).unwrap().is_empty());
}

// ============================================================================
// SECTION: Loading
// ============================================================================

#[test]
fn test_load_all_fixtures_in_order() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "b.json", "cs-b");
    write_fixture(dir.path(), "a.json", "cs-a");

    let cases = load_case_studies(dir.path()).unwrap();
    let ids: Vec<_> = cases.iter().map(|case| case.id.as_str().to_string()).collect();
    assert_eq!(ids, ["cs-a", "cs-b"]);
}

#[test]
fn test_oversized_fixture_is_rejected_before_decode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.json");
    fs::write(&path, vec![b' '; 1024 * 1024 + 1]).unwrap();

    let err = load_case_study(&path).unwrap_err();
    assert!(matches!(err, LoadError::Oversized { .. }));
    assert!(err.to_string().contains("huge.json"));
}

#[test]
fn test_malformed_json_error_carries_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let err = load_case_study(&path).unwrap_err();
    assert!(matches!(err, LoadError::Json { .. }));
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn test_structurally_invalid_fixture_error_carries_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty-title.json");
    let mut fixture = json!({
        "version": "v0",
        "id": "cs-001",
        "title": "placeholder",
        "created_at": "2025-11-02T18:30:00Z",
        "agent": { "name": "cartwheel" },
        "task": {
            "product_name": "Apple AirPods Pro 2",
            "currency": "USD",
            "allowed_retailers": ["Amazon"],
            "rules": {
                "allow_third_party": false,
                "allow_refurbished": false,
                "require_full_set": false
            }
        },
        "agent_output": {
            "raw_text": "Amazon price: $229.00\n",
            "captured_at": "2025-11-02T18:05:12Z"
        },
        "evidence": []
    });
    fixture["title"] = json!("   ");
    fs::write(&path, serde_json::to_vec(&fixture).unwrap()).unwrap();

    let err = load_case_study(&path).unwrap_err();
    assert!(matches!(err, LoadError::Case { .. }));
    assert!(err.to_string().contains("empty-title.json"));
}

#[test]
fn test_first_invalid_fixture_fails_the_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "a.json", "cs-a");
    fs::write(dir.path().join("b.json"), "[]").unwrap();
    write_fixture(dir.path(), "c.json", "cs-c");

    let err = load_case_studies(dir.path()).unwrap_err();
    assert!(err.to_string().contains("b.json"));
}
