// shopscore-core/src/runtime/mod.rs
// ============================================================================
// Module: Shopscore Runtime
// Description: Fixture loading, transcript parsing, evaluation, reporting.
// Purpose: Turn fixture directories into scored bench reports.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The runtime is the pipeline around the core model: load fixtures from
//! disk, parse each agent transcript, evaluate against evidence under a
//! policy, and aggregate the results into a report.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod evaluator;
pub mod loader;
pub mod report;
pub mod transcript;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use evaluator::Evaluation;
pub use evaluator::EvaluatorPolicy;
pub use evaluator::evaluate_case;
pub use loader::LoadError;
pub use report::BenchReport;
pub use report::CaseReport;
pub use report::VerdictTally;
pub use transcript::ParsedOffer;
pub use transcript::Transcript;
pub use transcript::parse_transcript;
