// shopscore-core/src/core/case.rs
// ============================================================================
// Module: Shopscore Case-Study Schema
// Description: Case-study fixture model with normalization and validation.
// Purpose: Define the canonical v0 fixture structure enforced at load time.
// Dependencies: crate::core::{identifiers, time}, serde
// ============================================================================

//! ## Overview
//! A case study captures one real agent run: the task specification, the raw
//! transcript as captured, and independently gathered market evidence.
//! Fixtures are validated at the load boundary: required strings must be
//! non-empty, timestamps must parse as RFC 3339, and prices must be finite
//! and non-negative. Optional fields stay `None` and are reported as
//! *Not Evaluated* downstream; unknown JSON fields are rejected so fixture
//! drift fails loudly against the shipped schema.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::CaseId;
use crate::core::identifiers::Retailer;
use crate::core::identifiers::SchemaVersion;
use crate::core::time::Timestamp;
use crate::core::time::TimestampError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when a fixture fails structural validation.
#[derive(Debug, Error)]
pub enum CaseError {
    /// A required string field is empty or whitespace-only.
    #[error("field '{field}': expected a non-empty string")]
    EmptyField {
        /// Dotted path of the offending field.
        field: String,
    },
    /// A timestamp field failed RFC 3339 parsing.
    #[error("field '{field}': {source}")]
    Timestamp {
        /// Dotted path of the offending field.
        field: String,
        /// Underlying parse failure.
        #[source]
        source: TimestampError,
    },
    /// A monetary field is negative, NaN, or infinite.
    #[error("field '{field}': expected a non-negative finite amount, got {value}")]
    InvalidAmount {
        /// Dotted path of the offending field.
        field: String,
        /// Offending value.
        value: f64,
    },
    /// The task allows no retailers at all.
    #[error("field 'task.allowed_retailers': expected at least one retailer")]
    NoAllowedRetailers,
}

// ============================================================================
// SECTION: Agent Profile
// ============================================================================

/// Identity of the agent whose run was captured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentProfile {
    /// Agent name.
    pub name: String,
    /// Optional agent version string.
    #[serde(default)]
    pub version: Option<String>,
    /// Optional run mode (`autonomous`, `supervised`, etc.).
    #[serde(default)]
    pub run_mode: Option<String>,
}

// ============================================================================
// SECTION: Task Specification
// ============================================================================

/// Purchase rules the agent was instructed to honor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskRules {
    /// Whether third-party marketplace sellers are acceptable.
    pub allow_third_party: bool,
    /// Whether refurbished or open-box listings are acceptable.
    pub allow_refurbished: bool,
    /// Whether the listing must match the full product set or variant.
    pub require_full_set: bool,
}

/// Reference to a known-good listing for the task's product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListingRef {
    /// Retailer carrying the listing.
    pub retailer: Retailer,
    /// Listing URL.
    pub url: String,
    /// Optional retailer-native listing identifier.
    #[serde(default)]
    pub listing_id: Option<String>,
    /// Optional identifier scheme (`asin`, `sku`, etc.).
    #[serde(default)]
    pub listing_id_type: Option<String>,
}

/// The shopping task the agent was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSpec {
    /// Product the agent was asked to buy.
    pub product_name: String,
    /// Optional exact variant (color, size, bundle).
    #[serde(default)]
    pub product_variant: Option<String>,
    /// Optional hard budget cap in USD.
    #[serde(default)]
    pub budget_usd: Option<f64>,
    /// Task currency code (`USD` for v0 fixtures).
    pub currency: String,
    /// Retailers the agent was allowed to buy from.
    pub allowed_retailers: Vec<Retailer>,
    /// Purchase rules in force for the task.
    pub rules: TaskRules,
    /// Known-good listings for the product, when curated.
    #[serde(default)]
    pub canonical_listings: Vec<ListingRef>,
}

// ============================================================================
// SECTION: Agent Transcript
// ============================================================================

/// Raw agent output captured at run time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentTranscript {
    /// Verbatim transcript text.
    pub raw_text: String,
    /// When the transcript was captured (RFC 3339).
    pub captured_at: Timestamp,
    /// Optional capture source (`cli`, `browser-session`, etc.).
    #[serde(default)]
    pub source: Option<String>,
}

// ============================================================================
// SECTION: Evidence
// ============================================================================

/// One independently gathered market observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvidenceItem {
    /// Retailer the observation was made at.
    pub retailer: Retailer,
    /// Listing URL observed.
    pub url: String,
    /// Observed price in USD, when captured.
    #[serde(default)]
    pub price_usd: Option<f64>,
    /// Observed availability text, when captured.
    #[serde(default)]
    pub availability: Option<String>,
    /// Observed seller name, when captured.
    #[serde(default)]
    pub seller: Option<String>,
    /// When the observation was made (RFC 3339).
    pub timestamp: Timestamp,
    /// Whether the listing matched the requested variant, when checked.
    #[serde(default)]
    pub variant_match: Option<bool>,
    /// Optional retailer-native listing identifier.
    #[serde(default)]
    pub listing_id: Option<String>,
    /// Optional identifier scheme (`asin`, `sku`, etc.).
    #[serde(default)]
    pub listing_id_type: Option<String>,
    /// Free-form observation notes.
    #[serde(default)]
    pub notes: Option<String>,
}

// ============================================================================
// SECTION: Case Study
// ============================================================================

/// Canonical v0 case-study fixture.
///
/// # Invariants
/// - Required strings are non-empty after [`CaseStudy::normalize`].
/// - Timestamps parse as RFC 3339.
/// - Prices and budgets are finite and non-negative when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseStudy {
    /// Fixture schema version marker.
    pub version: SchemaVersion,
    /// Case identifier, unique within the fixture directory.
    pub id: CaseId,
    /// Human-readable case title.
    pub title: String,
    /// When the case study was authored (RFC 3339).
    pub created_at: Timestamp,
    /// Agent identity for the captured run.
    pub agent: AgentProfile,
    /// Task the agent was given.
    pub task: TaskSpec,
    /// Captured agent transcript.
    pub agent_output: AgentTranscript,
    /// Independently gathered evidence set.
    pub evidence: Vec<EvidenceItem>,
    /// Free-form case notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl CaseStudy {
    /// Trims surrounding whitespace from every string field in place.
    ///
    /// Loading normalizes before validation so whitespace-padded fixtures
    /// compare and hash the same as their tidy equivalents.
    pub fn normalize(&mut self) {
        trim_string(&mut self.title);
        trim_opt(&mut self.notes);
        self.created_at.trim_in_place();

        trim_string(&mut self.agent.name);
        trim_opt(&mut self.agent.version);
        trim_opt(&mut self.agent.run_mode);

        trim_string(&mut self.task.product_name);
        trim_opt(&mut self.task.product_variant);
        trim_string(&mut self.task.currency);
        for retailer in &mut self.task.allowed_retailers {
            retailer.trim_in_place();
        }
        for listing in &mut self.task.canonical_listings {
            listing.retailer.trim_in_place();
            trim_string(&mut listing.url);
            trim_opt(&mut listing.listing_id);
            trim_opt(&mut listing.listing_id_type);
        }

        self.agent_output.captured_at.trim_in_place();
        trim_opt(&mut self.agent_output.source);

        for item in &mut self.evidence {
            item.retailer.trim_in_place();
            trim_string(&mut item.url);
            trim_opt(&mut item.availability);
            trim_opt(&mut item.seller);
            item.timestamp.trim_in_place();
            trim_opt(&mut item.listing_id);
            trim_opt(&mut item.listing_id_type);
            trim_opt(&mut item.notes);
        }
    }

    /// Validates the fixture against the v0 structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`CaseError`] encountered, carrying the dotted path
    /// of the offending field.
    pub fn validate(&self) -> Result<(), CaseError> {
        require_non_empty("version", self.version.as_str())?;
        require_non_empty("id", self.id.as_str())?;
        require_non_empty("title", &self.title)?;
        require_timestamp("created_at", &self.created_at)?;

        require_non_empty("agent.name", &self.agent.name)?;

        require_non_empty("task.product_name", &self.task.product_name)?;
        require_non_empty("task.currency", &self.task.currency)?;
        require_amount("task.budget_usd", self.task.budget_usd)?;
        if self.task.allowed_retailers.is_empty() {
            return Err(CaseError::NoAllowedRetailers);
        }
        for (index, retailer) in self.task.allowed_retailers.iter().enumerate() {
            require_non_empty(&format!("task.allowed_retailers[{index}]"), retailer.as_str())?;
        }
        for (index, listing) in self.task.canonical_listings.iter().enumerate() {
            let prefix = format!("task.canonical_listings[{index}]");
            require_non_empty(&format!("{prefix}.retailer"), listing.retailer.as_str())?;
            require_non_empty(&format!("{prefix}.url"), &listing.url)?;
        }

        require_non_empty("agent_output.raw_text", &self.agent_output.raw_text)?;
        require_timestamp("agent_output.captured_at", &self.agent_output.captured_at)?;

        for (index, item) in self.evidence.iter().enumerate() {
            let prefix = format!("evidence[{index}]");
            require_non_empty(&format!("{prefix}.retailer"), item.retailer.as_str())?;
            require_non_empty(&format!("{prefix}.url"), &item.url)?;
            require_timestamp(&format!("{prefix}.timestamp"), &item.timestamp)?;
            require_amount(&format!("{prefix}.price_usd"), item.price_usd)?;
        }

        Ok(())
    }
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Requires a non-empty string value at the given field path.
fn require_non_empty(field: &str, value: &str) -> Result<(), CaseError> {
    if value.trim().is_empty() {
        return Err(CaseError::EmptyField {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Requires a parseable RFC 3339 timestamp at the given field path.
fn require_timestamp(field: &str, value: &Timestamp) -> Result<(), CaseError> {
    value.parse().map(|_| ()).map_err(|source| CaseError::Timestamp {
        field: field.to_string(),
        source,
    })
}

/// Requires an optional amount to be finite and non-negative.
fn require_amount(field: &str, value: Option<f64>) -> Result<(), CaseError> {
    match value {
        Some(amount) if !amount.is_finite() || amount < 0.0 => Err(CaseError::InvalidAmount {
            field: field.to_string(),
            value: amount,
        }),
        _ => Ok(()),
    }
}

/// Trims a required string field in place.
fn trim_string(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Trims an optional string field in place.
fn trim_opt(value: &mut Option<String>) {
    if let Some(inner) = value {
        trim_string(inner);
    }
}
