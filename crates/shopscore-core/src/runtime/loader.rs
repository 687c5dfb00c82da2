// shopscore-core/src/runtime/loader.rs
// ============================================================================
// Module: Shopscore Fixture Loader
// Description: Discovery and size-capped loading of case-study fixtures.
// Purpose: Turn a fixture directory into validated case studies.
// Dependencies: crate::core::case, serde_json
// ============================================================================

//! ## Overview
//! Fixtures live one-per-file under the case-study directory. Discovery is
//! non-recursive, takes `*.json` regular files only, and orders them by
//! filename so evaluation order is stable across machines. Every load is
//! size-capped before decode, then normalized and validated; errors carry
//! the offending path. A missing fixture directory is an empty bench, not a
//! failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::case::CaseError;
use crate::core::case::CaseStudy;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default fixture directory relative to the repository root.
pub const DEFAULT_FIXTURES_DIR: &str = "data/fixtures/case_studies";

/// Maximum size of a single fixture file in bytes.
pub const MAX_FIXTURE_BYTES: u64 = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading fixtures.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Filesystem access failed.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A fixture file exceeds the size cap.
    #[error("fixture '{path}' is {actual} bytes, limit is {limit}")]
    Oversized {
        /// Path that failed.
        path: PathBuf,
        /// Size limit in bytes.
        limit: u64,
        /// Actual size in bytes.
        actual: u64,
    },
    /// A fixture file is not valid JSON for the case-study model.
    #[error("invalid json in '{path}': {source}")]
    Json {
        /// Path that failed.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// A fixture decoded but failed structural validation.
    #[error("invalid case study in '{path}': {source}")]
    Case {
        /// Path that failed.
        path: PathBuf,
        /// Underlying validation error.
        #[source]
        source: CaseError,
    },
}

// ============================================================================
// SECTION: Discovery
// ============================================================================

/// Lists fixture files in evaluation order.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the directory exists but cannot be read.
pub fn case_study_files(fixtures_dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !fixtures_dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(fixtures_dir).map_err(|source| LoadError::Io {
        path: fixtures_dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Io {
            path: fixtures_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads, normalizes, and validates one fixture file.
///
/// # Errors
///
/// Returns a [`LoadError`] carrying the fixture path when reading, decoding,
/// or validation fails.
pub fn load_case_study(path: &Path) -> Result<CaseStudy, LoadError> {
    let metadata = fs::metadata(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.len() > MAX_FIXTURE_BYTES {
        return Err(LoadError::Oversized {
            path: path.to_path_buf(),
            limit: MAX_FIXTURE_BYTES,
            actual: metadata.len(),
        });
    }

    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut case: CaseStudy = serde_json::from_slice(&bytes).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    case.normalize();
    case.validate().map_err(|source| LoadError::Case {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(case)
}

/// Loads every fixture in the directory, in evaluation order.
///
/// # Errors
///
/// Fails on the first unreadable or invalid fixture, carrying its path.
pub fn load_case_studies(fixtures_dir: &Path) -> Result<Vec<CaseStudy>, LoadError> {
    let mut cases = Vec::new();
    for path in case_study_files(fixtures_dir)? {
        cases.push(load_case_study(&path)?);
    }
    Ok(cases)
}
