// shopscore-core/src/lib.rs
// ============================================================================
// Module: Shopscore Core Library
// Description: Public API surface for the Shopscore evaluation core.
// Purpose: Expose the case-study model, fixture loading, and evaluation.
// Dependencies: crate::{core, runtime}
// ============================================================================

//! ## Overview
//! Shopscore core scores shopping-agent runs offline. A case study pairs the
//! task an agent was given with the agent's raw transcript and independently
//! gathered market evidence. The runtime parses the transcript, qualifies
//! evidence against the task rules, and derives metrics. Anything that could
//! not be observed stays `NotEvaluated` rather than being fabricated.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::*;

pub use runtime::BenchReport;
pub use runtime::CaseReport;
pub use runtime::Evaluation;
pub use runtime::EvaluatorPolicy;
pub use runtime::LoadError;
pub use runtime::ParsedOffer;
pub use runtime::Transcript;
pub use runtime::VerdictTally;
pub use runtime::evaluate_case;
pub use runtime::loader::DEFAULT_FIXTURES_DIR;
pub use runtime::loader::MAX_FIXTURE_BYTES;
pub use runtime::loader::case_study_files;
pub use runtime::loader::load_case_studies;
pub use runtime::loader::load_case_study;
pub use runtime::transcript::parse_transcript;
