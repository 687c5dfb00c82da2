// shopscore-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Shopscore Evaluation
// Description: Scores one case study against its evidence set.
// Purpose: Derive deterministic metrics honoring the Not Evaluated convention.
// Dependencies: crate::core, crate::runtime::transcript
// ============================================================================

//! ## Overview
//! Evaluation qualifies each evidence item against the task's purchase
//! rules, finds the best qualifying price, matches the agent's announced
//! choice back to evidence, and derives per-case metrics. A metric whose
//! inputs are missing stays `NotEvaluated`; the evaluator never converts an
//! unmeasured field into a failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::case::CaseStudy;
use crate::core::case::EvidenceItem;
use crate::core::case::TaskRules;
use crate::core::identifiers::Retailer;
use crate::core::verdict::Verdict;
use crate::runtime::transcript::ParsedOffer;
use crate::runtime::transcript::parse_transcript;

// ============================================================================
// SECTION: Evaluator Policy
// ============================================================================

/// Tunable evaluation policy.
///
/// The defaults reproduce the v0 bench behavior; deployments with other
/// retailers override the first-party table through configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorPolicy {
    /// First-party seller table: normalized retailer name to the substring
    /// expected in the seller field of a first-party listing.
    pub first_party_sellers: BTreeMap<String, String>,
    /// Tokens that mark a listing as refurbished, renewed, or used.
    pub refurbished_markers: Vec<String>,
    /// Tolerance in USD when comparing the chosen price to the best price.
    pub price_tolerance_usd: f64,
}

impl Default for EvaluatorPolicy {
    fn default() -> Self {
        let first_party_sellers = [
            ("amazon", "amazon.com"),
            ("best buy", "best buy"),
            ("apple", "apple"),
        ]
        .into_iter()
        .map(|(retailer, seller)| (retailer.to_string(), seller.to_string()))
        .collect();

        Self {
            first_party_sellers,
            refurbished_markers: ["refurb", "renewed", "open-box", "used"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            price_tolerance_usd: 0.01,
        }
    }
}

// ============================================================================
// SECTION: Evaluation Result
// ============================================================================

/// Metrics derived for one case study.
///
/// Every field follows the null convention: `None` / `NotEvaluated` means
/// the fixture lacked the inputs, not that the agent failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Lowest price among qualifying evidence, when any qualified.
    pub best_price_usd: Option<f64>,
    /// Retailer carrying the best qualifying price.
    pub best_price_retailer: Option<Retailer>,
    /// Price of the agent's announced choice, evidence-corrected when matched.
    pub chosen_price_usd: Option<f64>,
    /// Retailer of the agent's announced choice.
    pub chosen_retailer: Option<Retailer>,
    /// Whether the matched choice satisfied the task's purchase rules.
    pub choice_qualified: Verdict,
    /// Whether the agent found the best qualifying price.
    pub found_best_price: Verdict,
    /// Whether the chosen price fit the task budget.
    pub within_budget: Verdict,
    /// The agent's own within-budget claim from the transcript.
    pub claimed_within_budget: Verdict,
    /// USD left on the table versus the best qualifying price.
    pub overpay_usd: Option<f64>,
}

// ============================================================================
// SECTION: Case Evaluation
// ============================================================================

/// Evaluates one case study under the given policy.
#[must_use]
pub fn evaluate_case(case: &CaseStudy, policy: &EvaluatorPolicy) -> Evaluation {
    let transcript = parse_transcript(&case.agent_output.raw_text);

    let best_item = case
        .evidence
        .iter()
        .filter(|item| qualifies(item, case.task.rules, policy))
        .min_by(|left, right| {
            let left_price = left.price_usd.unwrap_or(f64::INFINITY);
            let right_price = right.price_usd.unwrap_or(f64::INFINITY);
            left_price.partial_cmp(&right_price).unwrap_or(std::cmp::Ordering::Equal)
        });

    let chosen_offer = transcript.chosen.as_ref();
    let chosen_evidence = match_offer_to_evidence(chosen_offer, &case.evidence);

    let mut chosen_price = chosen_offer.and_then(|offer| offer.price_usd);
    let mut chosen_retailer = chosen_offer.map(|offer| offer.retailer.clone());
    if let Some(evidence) = chosen_evidence
        && evidence.price_usd.is_some()
    {
        chosen_price = evidence.price_usd;
        chosen_retailer = Some(evidence.retailer.clone());
    }

    let choice_qualified = Verdict::from_measurement(
        chosen_evidence.map(|item| qualifies(item, case.task.rules, policy)),
    );

    let found_best_price = match (best_item, chosen_price) {
        (Some(_), Some(_)) if choice_qualified.is_fail() => Verdict::Fail,
        (Some(best), Some(price)) => {
            let mut matched = prices_equal(Some(price), best.price_usd, policy.price_tolerance_usd);
            if let Some(retailer) = &chosen_retailer
                && !retailer.as_str().is_empty()
            {
                matched = matched && *retailer == best.retailer;
            }
            Verdict::from(matched)
        }
        _ => Verdict::NotEvaluated,
    };

    let within_budget = match (case.task.budget_usd, chosen_price) {
        (Some(budget), Some(price)) => Verdict::from(price <= budget),
        _ => Verdict::NotEvaluated,
    };

    let overpay_usd = match (best_item.and_then(|item| item.price_usd), chosen_price) {
        (Some(best_price), Some(price)) if !choice_qualified.is_fail() => {
            let delta = price - best_price;
            Some(if delta > 0.0 { round_cents(delta) } else { 0.0 })
        }
        _ => None,
    };

    Evaluation {
        best_price_usd: best_item.and_then(|item| item.price_usd),
        best_price_retailer: best_item.map(|item| item.retailer.clone()),
        chosen_price_usd: chosen_price,
        chosen_retailer,
        choice_qualified,
        found_best_price,
        within_budget,
        claimed_within_budget: transcript.within_budget_claim,
        overpay_usd,
    }
}

// ============================================================================
// SECTION: Qualification Rules
// ============================================================================

/// Returns true when an evidence item satisfies the task's purchase rules.
fn qualifies(item: &EvidenceItem, rules: TaskRules, policy: &EvaluatorPolicy) -> bool {
    if item.price_usd.is_none() {
        return false;
    }
    if rules.require_full_set && item.variant_match != Some(true) {
        return false;
    }
    if !rules.allow_refurbished && looks_refurbished(item, policy) {
        return false;
    }
    if !rules.allow_third_party && !is_first_party(item, policy) {
        return false;
    }
    true
}

/// Returns true when the seller matches the first-party table for its retailer.
///
/// A missing seller or an unlisted retailer counts as third-party: without
/// positive evidence the stricter interpretation wins.
fn is_first_party(item: &EvidenceItem, policy: &EvaluatorPolicy) -> bool {
    let Some(seller) = &item.seller else {
        return false;
    };
    let Some(expected) = policy.first_party_sellers.get(&item.retailer.normalized()) else {
        return false;
    };
    seller.trim().to_lowercase().contains(&expected.to_lowercase())
}

/// Returns true when any free-text field carries a refurbished marker.
fn looks_refurbished(item: &EvidenceItem, policy: &EvaluatorPolicy) -> bool {
    let haystack = [&item.availability, &item.notes, &item.seller]
        .into_iter()
        .flatten()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    policy.refurbished_markers.iter().any(|marker| haystack.contains(&marker.to_lowercase()))
}

// ============================================================================
// SECTION: Choice Matching
// ============================================================================

/// Matches a parsed chosen offer back to an evidence item.
///
/// Exact URL equality wins; otherwise the retailer matches only when it is
/// unambiguous (exactly one evidence item for that retailer).
fn match_offer_to_evidence<'a>(
    offer: Option<&ParsedOffer>,
    evidence: &'a [EvidenceItem],
) -> Option<&'a EvidenceItem> {
    let offer = offer?;

    if let Some(url) = &offer.url
        && let Some(item) = evidence.iter().find(|item| &item.url == url)
    {
        return Some(item);
    }

    if !offer.retailer.as_str().is_empty() {
        let mut matches = evidence.iter().filter(|item| item.retailer == offer.retailer);
        if let (Some(item), None) = (matches.next(), matches.next()) {
            return Some(item);
        }
    }

    None
}

// ============================================================================
// SECTION: Numeric Helpers
// ============================================================================

/// Compares two optional prices within the policy tolerance.
fn prices_equal(left: Option<f64>, right: Option<f64>, tolerance_usd: f64) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => (left - right).abs() < tolerance_usd,
        _ => false,
    }
}

/// Rounds an amount to whole cents.
fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
