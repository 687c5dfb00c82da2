// shopscore-core/src/core/mod.rs
// ============================================================================
// Module: Shopscore Core Types
// Description: Canonical case-study schema and supporting value types.
// Purpose: Provide stable, serializable types for case-study fixtures.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types define the case-study fixture schema: the agent profile, the
//! task specification, the captured transcript, and the evidence set. These
//! types are the canonical source of truth for the shipped JSON schema and
//! for every derived report surface.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod case;
pub mod digest;
pub mod identifiers;
pub mod time;
pub mod verdict;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use case::AgentProfile;
pub use case::AgentTranscript;
pub use case::CaseError;
pub use case::CaseStudy;
pub use case::EvidenceItem;
pub use case::ListingRef;
pub use case::TaskRules;
pub use case::TaskSpec;
pub use digest::DigestError;
pub use digest::FixtureDigest;
pub use digest::fixture_digest;
pub use identifiers::CaseId;
pub use identifiers::Retailer;
pub use identifiers::SchemaVersion;
pub use self::time::Timestamp;
pub use self::time::TimestampError;
pub use verdict::Verdict;
