// shopscore-core/src/core/digest.rs
// ============================================================================
// Module: Shopscore Fixture Digests
// Description: RFC 8785 canonical JSON fingerprints for fixtures.
// Purpose: Tie every scored report row to the exact fixture revision used.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! A fixture digest is the SHA-256 hash of the case study's RFC 8785 (JCS)
//! canonical JSON, rendered as `sha256:<lowercase hex>`. Reports embed the
//! digest per case so a row can be traced to the fixture bytes that produced
//! it even after the fixture file is edited.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when computing fixture digests.
#[derive(Debug, Error)]
pub enum DigestError {
    /// JSON canonicalization failed.
    #[error("failed to canonicalize fixture json: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Fixture Digest
// ============================================================================

/// Canonical fingerprint of a case-study fixture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixtureDigest(String);

impl FixtureDigest {
    /// Returns the digest in its `sha256:<hex>` string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FixtureDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Digest Computation
// ============================================================================

/// Computes the canonical digest of a serializable fixture value.
///
/// # Errors
///
/// Returns [`DigestError::Canonicalization`] when the value cannot be
/// serialized as canonical JSON.
pub fn fixture_digest<T: Serialize + ?Sized>(value: &T) -> Result<FixtureDigest, DigestError> {
    let bytes =
        serde_jcs::to_vec(value).map_err(|err| DigestError::Canonicalization(err.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hasher.finalize();
    Ok(FixtureDigest(format!("sha256:{}", hex_encode(&digest))))
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}
