// shopscore-core/tests/report.rs
// ============================================================================
// Module: Bench Report Tests
// Description: Tests for per-case rows and aggregate tallies.
// ============================================================================
//! ## Overview
//! Checks that aggregation only counts measured metrics, that overpay means
//! exclude unmeasured cases, and that report rows carry fixture digests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use serde_json::json;
use shopscore_core::BenchReport;
use shopscore_core::CaseReport;
use shopscore_core::CaseStudy;
use shopscore_core::EvaluatorPolicy;
use shopscore_core::Verdict;
use shopscore_core::VerdictTally;
use shopscore_core::evaluate_case;

// ============================================================================
// SECTION: Fixture Helpers
// ============================================================================

/// Builds a loaded case study with the given id, transcript, and evidence.
fn case(id: &str, raw_text: &str, evidence: serde_json::Value) -> CaseStudy {
    let value = json!({
        "version": "v0",
        "id": id,
        "title": format!("Case {id}"),
        "created_at": "2025-11-02T18:30:00Z",
        "agent": { "name": "cartwheel" },
        "task": {
            "product_name": "Apple AirPods Pro 2",
            "budget_usd": 240.0,
            "currency": "USD",
            "allowed_retailers": ["Amazon", "Best Buy"],
            "rules": {
                "allow_third_party": false,
                "allow_refurbished": false,
                "require_full_set": false
            }
        },
        "agent_output": {
            "raw_text": raw_text,
            "captured_at": "2025-11-02T18:05:12Z"
        },
        "evidence": evidence
    });
    let mut case: CaseStudy = serde_json::from_value(value).expect("fixture decodes");
    case.normalize();
    case.validate().expect("fixture validates");
    case
}

/// Scores a case and wraps it into a report row.
fn row(case: &CaseStudy) -> CaseReport {
    let evaluation = evaluate_case(case, &EvaluatorPolicy::default());
    CaseReport::from_case(case, evaluation).expect("digest computes")
}

/// One evidence item at the given retailer and price.
fn evidence(retailer: &str, seller: &str, price: f64) -> serde_json::Value {
    json!({
        "retailer": retailer,
        "url": format!("https://{}.example/item", retailer.to_lowercase().replace(' ', "")),
        "price_usd": price,
        "seller": seller,
        "timestamp": "2025-11-02T18:20:00Z"
    })
}

// ============================================================================
// SECTION: Case Rows
// ============================================================================

#[test]
fn test_case_report_carries_digest_and_identity() {
    let case = case(
        "cs-001",
        "Chosen retailer + price + url: Amazon $229.00 https://amazon.example/item\n",
        json!([evidence("Amazon", "Amazon.com", 229.0)]),
    );
    let report = row(&case);

    assert_eq!(report.case_id.as_str(), "cs-001");
    assert_eq!(report.title, "Case cs-001");
    assert!(report.fixture_digest.as_str().starts_with("sha256:"));
    assert_eq!(report.evaluation.found_best_price, Verdict::Pass);
}

// ============================================================================
// SECTION: Aggregation
// ============================================================================

#[test]
fn test_bench_report_tallies_only_measured_metrics() {
    // cs-a: best price found, within budget, overpay 0.
    let case_a = case(
        "cs-a",
        "Chosen retailer + price + url: Amazon $220.00 https://amazon.example/item\n\
         Within budget ($240 hard cap)? Yes\n",
        json!([evidence("Amazon", "Amazon.com", 220.0), evidence("Best Buy", "Best Buy", 239.0)]),
    );
    // cs-b: overpaid at Best Buy.
    let case_b = case(
        "cs-b",
        "Chosen retailer + price + url: Best Buy $239.00 https://bestbuy.example/item\n",
        json!([evidence("Amazon", "Amazon.com", 220.0), evidence("Best Buy", "Best Buy", 239.0)]),
    );
    // cs-c: no announced choice, nothing measured beyond best price.
    let case_c = case(
        "cs-c",
        "Chosen retailer + price + url:\nNo valid choice.\n",
        json!([evidence("Amazon", "Amazon.com", 220.0)]),
    );

    let report = BenchReport::build(vec![row(&case_a), row(&case_b), row(&case_c)]);

    assert_eq!(report.case_count, 3);
    assert_eq!(report.found_best_price.pass, 1);
    assert_eq!(report.found_best_price.fail, 1);
    assert_eq!(report.found_best_price.not_evaluated, 1);
    assert_eq!(report.within_budget.pass, 2);
    assert_eq!(report.within_budget.not_evaluated, 1);
    assert_eq!(report.matched_choices, 2);
    // Overpay mean divides by the two measured cases, not all three.
    assert_eq!(report.total_overpay_usd, Some(19.0));
    assert_eq!(report.mean_overpay_usd, Some(9.5));
}

#[test]
fn test_bench_report_with_no_measured_overpay() {
    let case = case(
        "cs-a",
        "Chosen retailer + price + url:\nNo valid choice.\n",
        json!([evidence("Amazon", "Amazon.com", 220.0)]),
    );
    let report = BenchReport::build(vec![row(&case)]);

    assert_eq!(report.total_overpay_usd, None);
    assert_eq!(report.mean_overpay_usd, None);
    assert_eq!(report.matched_choices, 0);
}

#[test]
fn test_empty_bench_report() {
    let report = BenchReport::build(Vec::new());
    assert_eq!(report.case_count, 0);
    assert_eq!(report.found_best_price, VerdictTally::default());
    assert!(report.cases.is_empty());
    assert_eq!(report.total_overpay_usd, None);
}

// ============================================================================
// SECTION: Serialization
// ============================================================================

#[test]
fn test_report_json_uses_null_for_unmeasured_metrics() {
    let case = case(
        "cs-a",
        "Chosen retailer + price + url:\nNo valid choice.\n",
        json!([evidence("Amazon", "Amazon.com", 220.0)]),
    );
    let report = BenchReport::build(vec![row(&case)]);
    let value = serde_json::to_value(&report).unwrap();

    let evaluation = &value["cases"][0]["evaluation"];
    assert_eq!(evaluation["found_best_price"], serde_json::Value::Null);
    assert_eq!(evaluation["within_budget"], serde_json::Value::Null);
    assert_eq!(evaluation["overpay_usd"], serde_json::Value::Null);
    assert_eq!(evaluation["best_price_usd"], json!(220.0));
}
