// shopscore-core/src/core/time.rs
// ============================================================================
// Module: Shopscore Time Model
// Description: RFC 3339 timestamp wrapper for fixture records.
// Purpose: Keep captured timestamps verbatim while validating at boundaries.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Fixtures carry timestamps as RFC 3339 strings captured when the agent ran
//! or when evidence was gathered. The wrapper preserves the authored string
//! form so canonical hashing stays byte-stable; validation parses on demand.
//! The core never reads wall-clock time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when parsing fixture timestamps.
#[derive(Debug, Error)]
pub enum TimestampError {
    /// The value is not a valid RFC 3339 timestamp.
    #[error("invalid rfc 3339 timestamp '{value}': {reason}")]
    InvalidFormat {
        /// Offending timestamp string.
        value: String,
        /// Parser failure detail.
        reason: String,
    },
}

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// RFC 3339 timestamp stored in its authored string form.
///
/// # Invariants
/// - The string form is preserved verbatim for canonical hashing.
/// - Validity is enforced at the load boundary via [`Timestamp::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Creates a timestamp from an authored string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the authored string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the timestamp, accepting `Z` and numeric UTC offsets.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::InvalidFormat`] when the string is not
    /// valid RFC 3339.
    pub fn parse(&self) -> Result<OffsetDateTime, TimestampError> {
        OffsetDateTime::parse(&self.0, &Rfc3339).map_err(|err| TimestampError::InvalidFormat {
            value: self.0.clone(),
            reason: err.to_string(),
        })
    }

    /// Trims surrounding whitespace in place.
    pub(crate) fn trim_in_place(&mut self) {
        let trimmed = self.0.trim();
        if trimmed.len() != self.0.len() {
            self.0 = trimmed.to_string();
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Timestamp {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
