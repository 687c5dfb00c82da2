// shopscore-core/src/runtime/transcript.rs
// ============================================================================
// Module: Shopscore Transcript Parsing
// Description: Line-oriented recovery of structured offers from raw agent text.
// Purpose: Extract per-retailer offers, the chosen offer, and budget claims.
// Dependencies: crate::core::{identifiers, verdict}
// ============================================================================

//! ## Overview
//! Agent transcripts are free text; the parser recovers structure without
//! assuming any fixed layout. Scanning top to bottom, a line that mentions a
//! known retailer opens (or reopens) that retailer's offer, and subsequent
//! lines contribute fields until another retailer is mentioned. The first
//! captured value for a field wins. The chosen-offer marker and the
//! within-budget claim are recognized both inline and as headings with the
//! answer on the following lines. Parsing never panics and never invents
//! values: anything not present in the text stays absent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::Retailer;
use crate::core::verdict::Verdict;

// ============================================================================
// SECTION: Retailer Table
// ============================================================================

/// Retailer mention keywords and their canonical display names.
///
/// Order matters: the first matching keyword wins when a line mentions
/// several retailers.
const RETAILER_KEYWORDS: &[(&str, &str)] = &[
    ("amazon", "Amazon"),
    ("best buy", "Best Buy"),
    ("bestbuy", "Best Buy"),
    ("apple", "Apple"),
];

/// Retailer name used when a chosen offer names no known retailer.
const UNKNOWN_RETAILER: &str = "Unknown";

/// Marker phrase announcing the agent's chosen offer.
const CHOSEN_MARKER: &[&str] = &["chosen retailer", "+", "price", "+", "url"];

// ============================================================================
// SECTION: Parsed Types
// ============================================================================

/// One offer recovered from the transcript text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedOffer {
    /// Retailer the offer was recovered for.
    pub retailer: Retailer,
    /// Offer price in USD, when a price was found.
    pub price_usd: Option<f64>,
    /// Offer URL, when one was found.
    pub url: Option<String>,
    /// Availability text, when stated.
    pub availability: Option<String>,
    /// Seller text, when stated.
    pub seller: Option<String>,
    /// Variant-match claim, when stated.
    pub variant_match: Option<bool>,
}

/// Structured view of one agent transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Offers recovered per retailer, in first-mention order.
    pub offers: Vec<ParsedOffer>,
    /// The offer the agent declared as its choice, when announced.
    pub chosen: Option<ParsedOffer>,
    /// The agent's own within-budget claim, when announced.
    pub within_budget_claim: Verdict,
}

// ============================================================================
// SECTION: Parsing Entry Point
// ============================================================================

/// Parses a raw transcript into structured offers and claims.
#[must_use]
pub fn parse_transcript(raw_text: &str) -> Transcript {
    let lines: Vec<&str> =
        raw_text.lines().map(str::trim).filter(|line| !line.is_empty()).collect();

    let offers = collect_offers(&lines);
    let chosen = parse_chosen_offer(&lines);
    let within_budget_claim = parse_within_budget(&lines);

    Transcript {
        offers,
        chosen,
        within_budget_claim,
    }
}

// ============================================================================
// SECTION: Offer Collection
// ============================================================================

/// Partially accumulated offer fields for one retailer.
#[derive(Default)]
struct OfferFields {
    /// First price found.
    price_usd: Option<f64>,
    /// First URL found.
    url: Option<String>,
    /// First availability line value.
    availability: Option<String>,
    /// First seller line value.
    seller: Option<String>,
    /// First variant-match claim.
    variant_match: Option<bool>,
}

/// Scans lines, accumulating offer fields under the current retailer.
fn collect_offers(lines: &[&str]) -> Vec<ParsedOffer> {
    let mut accumulators: Vec<(&str, OfferFields)> = Vec::new();
    let mut current: Option<usize> = None;

    for line in lines {
        if let Some(name) = infer_retailer(line) {
            current = Some(match accumulators.iter().position(|(existing, _)| *existing == name) {
                Some(index) => index,
                None => {
                    accumulators.push((name, OfferFields::default()));
                    accumulators.len() - 1
                }
            });
        }

        if let Some(index) = current
            && let Some((_, fields)) = accumulators.get_mut(index)
        {
            capture_line_fields(fields, line);
        }
    }

    accumulators
        .into_iter()
        .map(|(retailer, fields)| ParsedOffer {
            retailer: Retailer::new(retailer),
            price_usd: fields.price_usd,
            url: fields.url,
            availability: fields.availability,
            seller: fields.seller,
            variant_match: fields.variant_match,
        })
        .collect()
}

/// Captures field values from one line into the accumulator.
fn capture_line_fields(fields: &mut OfferFields, line: &str) {
    if fields.price_usd.is_none() {
        fields.price_usd = find_price(line);
    }

    if fields.url.is_none() {
        fields.url = find_url(line).map(str::to_string);
    }

    if fields.availability.is_none() && find_ascii_ci(line, "availability").is_some() {
        fields.availability = Some(after_colon(line).to_string());
    }

    if fields.seller.is_none() && find_ascii_ci(line, "seller").is_some() {
        fields.seller = Some(after_colon(line).to_string());
    }

    if fields.variant_match.is_none() && find_ascii_ci(line, "variant match").is_some() {
        fields.variant_match = parse_yes_no(after_colon(line));
    }
}

// ============================================================================
// SECTION: Chosen Offer
// ============================================================================

/// Finds the chosen offer, inline or as a heading with following lines.
fn parse_chosen_offer(lines: &[&str]) -> Option<ParsedOffer> {
    for (index, line) in lines.iter().enumerate() {
        match chosen_marker_remainder(line) {
            MarkerMatch::Inline(value) => return Some(build_chosen_offer(value)),
            MarkerMatch::Heading => {
                let next = lines.get(index + 1).copied().unwrap_or("");
                let after_next = lines.get(index + 2).copied().unwrap_or("");
                if find_ascii_ci(next, "no valid choice").is_some() {
                    return None;
                }
                return Some(build_chosen_offer_from_pair(next, after_next));
            }
            MarkerMatch::None => {}
        }
    }
    None
}

/// Builds a chosen offer from inline marker text, inferring the retailer.
fn build_chosen_offer(value_text: &str) -> ParsedOffer {
    ParsedOffer {
        retailer: Retailer::new(infer_retailer(value_text).unwrap_or(UNKNOWN_RETAILER)),
        price_usd: find_price(value_text),
        url: find_url(value_text).map(str::to_string),
        availability: None,
        seller: None,
        variant_match: None,
    }
}

/// Builds a chosen offer from the two lines following a heading marker.
fn build_chosen_offer_from_pair(first: &str, second: &str) -> ParsedOffer {
    ParsedOffer {
        retailer: Retailer::new(infer_retailer(first).unwrap_or(UNKNOWN_RETAILER)),
        price_usd: find_price(first).or_else(|| find_price(second)),
        url: find_url(first).or_else(|| find_url(second)).map(str::to_string),
        availability: None,
        seller: None,
        variant_match: None,
    }
}

/// Result of matching the chosen-offer marker against one line.
enum MarkerMatch<'a> {
    /// Marker with the answer on the same line.
    Inline(&'a str),
    /// Marker alone (possibly with a trailing colon); answer follows.
    Heading,
    /// No marker on this line.
    None,
}

/// Matches the `chosen retailer + price + url` marker at any line position.
fn chosen_marker_remainder(line: &str) -> MarkerMatch<'_> {
    let Some(start) = find_ascii_ci(line, CHOSEN_MARKER[0]) else {
        return MarkerMatch::None;
    };

    let mut cursor = Cursor::new(line, start + CHOSEN_MARKER[0].len());
    for token in &CHOSEN_MARKER[1..] {
        cursor.skip_whitespace();
        if !cursor.eat_ci(token) {
            return MarkerMatch::None;
        }
    }

    cursor.skip_whitespace();
    if !cursor.eat(b':') {
        // Marker without a colon still counts as a heading when the line
        // carries nothing else after it.
        return if cursor.at_end() { MarkerMatch::Heading } else { MarkerMatch::None };
    }
    cursor.skip_whitespace();
    if cursor.at_end() {
        return MarkerMatch::Heading;
    }
    MarkerMatch::Inline(cursor.remainder())
}

// ============================================================================
// SECTION: Within-Budget Claim
// ============================================================================

/// Finds the agent's within-budget claim, inline or heading style.
fn parse_within_budget(lines: &[&str]) -> Verdict {
    for (index, line) in lines.iter().enumerate() {
        if let Some(answer) = within_budget_inline(line) {
            return Verdict::from(answer);
        }
        if starts_with_ci(line, "within budget") {
            let next = lines.get(index + 1).copied().unwrap_or("");
            if starts_with_ci(next, "yes") {
                return Verdict::Pass;
            }
            if starts_with_ci(next, "no") {
                return Verdict::Fail;
            }
        }
    }
    Verdict::NotEvaluated
}

/// Matches `within budget ($N hard cap)? yes|no` inline on one line.
fn within_budget_inline(line: &str) -> Option<bool> {
    let start = find_ascii_ci(line, "within budget")?;
    let mut cursor = Cursor::new(line, start + "within budget".len());

    cursor.skip_whitespace();
    cursor.eat(b'(');
    cursor.eat(b'$');
    if cursor.skip_while(|byte| byte.is_ascii_digit() || byte == b'.') == 0 {
        return None;
    }
    cursor.skip_whitespace();
    if !cursor.eat_ci("hard cap") {
        return None;
    }
    cursor.eat(b')');
    if !cursor.eat(b'?') {
        return None;
    }
    cursor.skip_whitespace();

    if cursor.eat_ci("yes") {
        return Some(true);
    }
    if cursor.eat_ci("no") {
        return Some(false);
    }
    None
}

// ============================================================================
// SECTION: Field Extraction
// ============================================================================

/// Finds the first `$` price on a line (`$12`, `$ 12.99`).
///
/// Cents are captured only as an exact two-digit group, matching how prices
/// are written in retail listings; `$12.5` yields `12`.
fn find_price(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    for position in 0..bytes.len() {
        if bytes[position] != b'$' {
            continue;
        }

        let mut cursor = Cursor::new(text, position + 1);
        cursor.skip_whitespace();
        let digits_start = cursor.position();
        if cursor.skip_while(|byte| byte.is_ascii_digit()) == 0 {
            continue;
        }
        let mut digits_end = cursor.position();

        // Optional exact two-digit cents group.
        let mut cents = Cursor::new(text, digits_end);
        if cents.eat(b'.') && cents.skip_while(|byte| byte.is_ascii_digit()) >= 2 {
            digits_end += 3;
        }

        let amount = &text[digits_start..digits_end];
        if let Ok(value) = amount.parse::<f64>() {
            return Some(value);
        }
    }
    None
}

/// Finds the first `http://` or `https://` URL on a line.
///
/// URLs extend until whitespace or a closing parenthesis, so markdown-style
/// `(https://...)` links terminate cleanly.
fn find_url(text: &str) -> Option<&str> {
    let start = find_ascii_ci(text, "http")?;
    let candidate = &text[start..];
    if !candidate.starts_with("http://") && !candidate.starts_with("https://") {
        // A non-URL mention of "http" hides any later URL on the line, which
        // keeps scanning single-pass; transcripts do not hit this in practice.
        return None;
    }

    let end = candidate
        .char_indices()
        .find(|(_, ch)| ch.is_whitespace() || *ch == ')')
        .map_or(candidate.len(), |(index, _)| index);
    Some(&candidate[..end])
}

/// Returns the trimmed text after the first colon, or the whole line.
fn after_colon(line: &str) -> &str {
    line.split_once(':').map_or(line, |(_, value)| value).trim()
}

/// Infers the first known retailer mentioned in the text.
fn infer_retailer(text: &str) -> Option<&'static str> {
    for (keyword, name) in RETAILER_KEYWORDS {
        if find_ascii_ci(text, keyword).is_some() {
            return Some(name);
        }
    }
    None
}

/// Parses a yes/true/no/false claim value.
fn parse_yes_no(value: &str) -> Option<bool> {
    let lowered = value.trim().to_lowercase();
    match lowered.as_str() {
        "yes" | "true" => Some(true),
        "no" | "false" => Some(false),
        _ => None,
    }
}

// ============================================================================
// SECTION: Scanning Helpers
// ============================================================================

/// Finds an ASCII needle case-insensitively, returning its byte offset.
fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let haystack_bytes = haystack.as_bytes();
    let needle_bytes = needle.as_bytes();
    if needle_bytes.is_empty() || haystack_bytes.len() < needle_bytes.len() {
        return None;
    }
    (0..=haystack_bytes.len() - needle_bytes.len()).find(|&index| {
        haystack_bytes[index..index + needle_bytes.len()].eq_ignore_ascii_case(needle_bytes)
    })
}

/// Returns true when the line starts with the ASCII prefix, ignoring case.
fn starts_with_ci(line: &str, prefix: &str) -> bool {
    let line_bytes = line.as_bytes();
    let prefix_bytes = prefix.as_bytes();
    line_bytes.len() >= prefix_bytes.len()
        && line_bytes[..prefix_bytes.len()].eq_ignore_ascii_case(prefix_bytes)
}

/// Byte cursor over one line for marker matching.
///
/// # Invariants
/// - The cursor only advances past complete ASCII bytes or stops at a char
///   boundary, so `remainder` always slices at a valid boundary.
struct Cursor<'a> {
    /// Line being scanned.
    text: &'a str,
    /// Current byte offset.
    position: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the given byte offset.
    const fn new(text: &'a str, position: usize) -> Self {
        Self {
            text,
            position,
        }
    }

    /// Returns the current byte offset.
    const fn position(&self) -> usize {
        self.position
    }

    /// Returns true when the cursor has consumed the whole line.
    const fn at_end(&self) -> bool {
        self.position >= self.text.len()
    }

    /// Returns the unconsumed remainder of the line.
    fn remainder(&self) -> &'a str {
        self.text.get(self.position..).unwrap_or("")
    }

    /// Consumes one exact byte, returning whether it matched.
    fn eat(&mut self, expected: u8) -> bool {
        if self.text.as_bytes().get(self.position) == Some(&expected) {
            self.position += 1;
            return true;
        }
        false
    }

    /// Consumes an ASCII token case-insensitively, returning whether it matched.
    fn eat_ci(&mut self, token: &str) -> bool {
        let bytes = self.text.as_bytes();
        let end = self.position + token.len();
        if end <= bytes.len() && bytes[self.position..end].eq_ignore_ascii_case(token.as_bytes()) {
            self.position = end;
            return true;
        }
        false
    }

    /// Consumes bytes while the predicate holds, returning how many matched.
    fn skip_while(&mut self, predicate: impl Fn(u8) -> bool) -> usize {
        let bytes = self.text.as_bytes();
        let start = self.position;
        while self.position < bytes.len() && predicate(bytes[self.position]) {
            self.position += 1;
        }
        self.position - start
    }

    /// Consumes ASCII whitespace.
    fn skip_whitespace(&mut self) {
        self.skip_while(|byte| byte == b' ' || byte == b'\t');
    }
}
