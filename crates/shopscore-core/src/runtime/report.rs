// shopscore-core/src/runtime/report.rs
// ============================================================================
// Module: Shopscore Bench Reports
// Description: Per-case rows and aggregate tallies over a fixture set.
// Purpose: Summarize evaluations without leaking the Not Evaluated convention.
// Dependencies: crate::core, crate::runtime::evaluator, serde
// ============================================================================

//! ## Overview
//! A bench report pairs every evaluated case with its fixture digest and
//! aggregates verdict tallies across the set. Aggregates only count what was
//! actually measured: a metric that was `NotEvaluated` in a case lands in
//! the not-evaluated tally and is excluded from means.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::case::CaseStudy;
use crate::core::digest::DigestError;
use crate::core::digest::FixtureDigest;
use crate::core::digest::fixture_digest;
use crate::core::identifiers::CaseId;
use crate::core::verdict::Verdict;
use crate::runtime::evaluator::Evaluation;

// ============================================================================
// SECTION: Case Report
// ============================================================================

/// One scored case with its fixture provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Case identifier.
    pub case_id: CaseId,
    /// Human-readable case title.
    pub title: String,
    /// Canonical digest of the fixture that produced this row.
    pub fixture_digest: FixtureDigest,
    /// Derived metrics for the case.
    pub evaluation: Evaluation,
}

impl CaseReport {
    /// Builds a report row for a case and its evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError`] when the fixture cannot be canonicalized.
    pub fn from_case(case: &CaseStudy, evaluation: Evaluation) -> Result<Self, DigestError> {
        Ok(Self {
            case_id: case.id.clone(),
            title: case.title.clone(),
            fixture_digest: fixture_digest(case)?,
            evaluation,
        })
    }
}

// ============================================================================
// SECTION: Verdict Tally
// ============================================================================

/// Counts of verdict outcomes across a fixture set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerdictTally {
    /// Cases where the metric was measured and passed.
    pub pass: usize,
    /// Cases where the metric was measured and failed.
    pub fail: usize,
    /// Cases where the metric could not be measured.
    pub not_evaluated: usize,
}

impl VerdictTally {
    /// Records one verdict into the tally.
    pub const fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Pass => self.pass += 1,
            Verdict::Fail => self.fail += 1,
            Verdict::NotEvaluated => self.not_evaluated += 1,
        }
    }

    /// Returns the number of measured cases in the tally.
    #[must_use]
    pub const fn measured(&self) -> usize {
        self.pass + self.fail
    }
}

// ============================================================================
// SECTION: Bench Report
// ============================================================================

/// Aggregate report over an evaluated fixture set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchReport {
    /// Number of cases evaluated.
    pub case_count: usize,
    /// Tally for the found-best-price metric.
    pub found_best_price: VerdictTally,
    /// Tally for the within-budget metric.
    pub within_budget: VerdictTally,
    /// Cases where the agent's choice was matched to evidence.
    pub matched_choices: usize,
    /// Sum of overpay across cases where it was measured.
    pub total_overpay_usd: Option<f64>,
    /// Mean overpay across cases where it was measured.
    pub mean_overpay_usd: Option<f64>,
    /// Per-case report rows in evaluation order.
    pub cases: Vec<CaseReport>,
}

impl BenchReport {
    /// Aggregates per-case rows into a bench report.
    #[must_use]
    pub fn build(cases: Vec<CaseReport>) -> Self {
        let mut found_best_price = VerdictTally::default();
        let mut within_budget = VerdictTally::default();
        let mut matched_choices = 0;
        let mut overpay_sum = 0.0_f64;
        let mut overpay_count = 0_usize;

        for case in &cases {
            found_best_price.record(case.evaluation.found_best_price);
            within_budget.record(case.evaluation.within_budget);
            if !case.evaluation.choice_qualified.is_not_evaluated() {
                matched_choices += 1;
            }
            if let Some(overpay) = case.evaluation.overpay_usd {
                overpay_sum += overpay;
                overpay_count += 1;
            }
        }

        let (total_overpay_usd, mean_overpay_usd) = if overpay_count == 0 {
            (None, None)
        } else {
            #[allow(
                clippy::cast_precision_loss,
                reason = "Case counts are far below f64 integer precision."
            )]
            let mean = overpay_sum / overpay_count as f64;
            (Some(round_cents(overpay_sum)), Some(round_cents(mean)))
        };

        Self {
            case_count: cases.len(),
            found_best_price,
            within_budget,
            matched_choices,
            total_overpay_usd,
            mean_overpay_usd,
            cases,
        }
    }
}

// ============================================================================
// SECTION: Numeric Helpers
// ============================================================================

/// Rounds an amount to whole cents.
fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
