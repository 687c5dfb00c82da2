// shopscore-core/src/core/verdict.rs
// ============================================================================
// Module: Shopscore Verdicts
// Description: Tri-state metric outcomes honoring the null convention.
// Purpose: Distinguish measured pass/fail from fields that were never scored.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every boolean metric in an evaluation is tri-state: a measured pass, a
//! measured fail, or `NotEvaluated` when the inputs were absent. Fixtures and
//! reports serialize `NotEvaluated` as JSON `null`, matching the authoring
//! convention that an unknown field is omitted or null and never invented.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Tri-state outcome for a single evaluated metric.
///
/// # Invariants
/// - Represents a closed set: pass, fail, or not evaluated.
/// - `NotEvaluated` means the inputs were missing, never that the agent failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verdict {
    /// The metric was measured and the agent satisfied it.
    Pass,
    /// The metric was measured and the agent did not satisfy it.
    Fail,
    /// The metric could not be measured from the available fixture data.
    #[default]
    NotEvaluated,
}

impl Verdict {
    /// Returns true if the verdict is `Pass`.
    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns true if the verdict is `Fail`.
    #[must_use]
    pub const fn is_fail(self) -> bool {
        matches!(self, Self::Fail)
    }

    /// Returns true if the verdict is `NotEvaluated`.
    #[must_use]
    pub const fn is_not_evaluated(self) -> bool {
        matches!(self, Self::NotEvaluated)
    }

    /// Converts an optional measurement into a verdict.
    #[must_use]
    pub const fn from_measurement(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Pass,
            Some(false) => Self::Fail,
            None => Self::NotEvaluated,
        }
    }

    /// Returns the measured value, or `None` when not evaluated.
    #[must_use]
    pub const fn as_measurement(self) -> Option<bool> {
        match self {
            Self::Pass => Some(true),
            Self::Fail => Some(false),
            Self::NotEvaluated => None,
        }
    }
}

impl From<bool> for Verdict {
    fn from(value: bool) -> Self {
        if value { Self::Pass } else { Self::Fail }
    }
}

impl From<Option<bool>> for Verdict {
    fn from(value: Option<bool>) -> Self {
        Self::from_measurement(value)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::NotEvaluated => "not evaluated",
        };
        f.write_str(label)
    }
}

// ============================================================================
// SECTION: Serde Support
// ============================================================================

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_measurement() {
            Some(value) => serializer.serialize_bool(value),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<bool>::deserialize(deserializer)?;
        Ok(Self::from_measurement(value))
    }
}
