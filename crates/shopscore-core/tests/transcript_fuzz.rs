// shopscore-core/tests/transcript_fuzz.rs
// ============================================================================
// Module: Transcript Parser Property Tests
// Description: Property-based robustness checks for transcript parsing.
// ============================================================================
//! ## Overview
//! The parser consumes untrusted free text, so these properties assert it
//! stays total over arbitrary input: no panics, no invented values, and
//! recovered fields always drawn from the text itself.

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

use proptest::prelude::*;
use shopscore_core::Verdict;
use shopscore_core::parse_transcript;

/// Retailer names the parser is allowed to emit.
const KNOWN_RETAILERS: &[&str] = &["Amazon", "Best Buy", "Apple", "Unknown"];

proptest! {
    #[test]
    fn parse_is_total_over_arbitrary_text(raw in "\\PC*") {
        let _ = parse_transcript(&raw);
    }

    #[test]
    fn parse_is_total_over_multiline_text(raw in "(?s).{0,400}") {
        let _ = parse_transcript(&raw);
    }

    #[test]
    fn offers_only_use_table_retailers(raw in "(?s).{0,400}") {
        let transcript = parse_transcript(&raw);
        for offer in &transcript.offers {
            assert!(KNOWN_RETAILERS[..3].contains(&offer.retailer.as_str()));
        }
        if let Some(chosen) = &transcript.chosen {
            assert!(KNOWN_RETAILERS.contains(&chosen.retailer.as_str()));
        }
    }

    #[test]
    fn recovered_prices_are_finite_and_non_negative(raw in "(?s).{0,400}") {
        let transcript = parse_transcript(&raw);
        let prices = transcript
            .offers
            .iter()
            .filter_map(|offer| offer.price_usd)
            .chain(transcript.chosen.iter().filter_map(|offer| offer.price_usd));
        for price in prices {
            assert!(price.is_finite());
            assert!(price >= 0.0);
        }
    }

    #[test]
    fn recovered_urls_come_from_the_text(raw in "(?s).{0,400}") {
        let transcript = parse_transcript(&raw);
        for offer in &transcript.offers {
            if let Some(url) = &offer.url {
                assert!(raw.contains(url.as_str()));
                assert!(url.starts_with("http://") || url.starts_with("https://"));
            }
        }
    }

    #[test]
    fn budget_claim_without_marker_is_not_evaluated(raw in "[a-m ]{0,200}") {
        // Inputs that cannot spell "within budget" never produce a claim.
        let transcript = parse_transcript(&raw);
        assert_eq!(transcript.within_budget_claim, Verdict::NotEvaluated);
    }
}
