//! Transactional vs promotional email classification.
//!
//! Separates bill/receipt-type emails from promotional and newsletter
//! content. Promotional intent dominates: three or more promotional keyword
//! hits short-circuit to "not transactional" regardless of any transactional
//! signal, because bill-like language routinely co-occurs in marketing
//! footers ("special offer" inside a subscription renewal).

use docguard_core::defaults::{
    CURRENCY_POINTS, DATE_POINTS, PROMO_SHORT_CIRCUIT, REFERENCE_POINTS, TRANSACTIONAL_THRESHOLD,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::keywords::match_phrases;

/// Keywords marking promotional/newsletter content.
const PROMO_KEYWORDS: &[&str] = &[
    "unsubscribe",
    "newsletter",
    "sale",
    "discount",
    "% off",
    "limited time",
    "special offer",
    "deal of the day",
    "free shipping",
    "clearance",
    "don't miss",
];

/// Keywords marking transactional (bill/receipt) content.
const TRANSACTIONAL_KEYWORDS: &[&str] = &[
    "invoice",
    "payment",
    "receipt",
    "amount due",
    "due date",
    "statement",
    "bill",
    "order confirmation",
    "shipping",
    "shipped",
    "tuition",
    "renewal",
    "account balance",
    "transaction",
];

/// Currency amounts: a symbol followed by digits, or a decimal amount.
static CURRENCY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[$€£]\s?\d|\b\d+\.\d{2}\b").expect("currency regex"));

/// Date-like patterns or explicit "due by/on" phrasing.
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b|\b\d{4}-\d{2}-\d{2}\b|due (?:by|on)\b")
        .expect("date regex")
});

/// Order/invoice/confirmation reference numbers.
static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:invoice|order|confirmation|reference|ref)\s*(?:number|no\.?|#)?\s*[:#]?\s*[a-z0-9-]*\d|#\d{3,}")
        .expect("reference regex")
});

/// Promotional keyword hit count over subject + body.
fn promotional_score(text: &str) -> usize {
    match_phrases(text, PROMO_KEYWORDS, PROMO_KEYWORDS.len()).count
}

/// Weighted transactional score over subject + body.
fn transactional_score(text: &str) -> i32 {
    let mut score = match_phrases(text, TRANSACTIONAL_KEYWORDS, TRANSACTIONAL_KEYWORDS.len()).count
        as i32;

    if CURRENCY_RE.is_match(text) {
        score += CURRENCY_POINTS;
    }
    if DATE_RE.is_match(text) {
        score += DATE_POINTS;
    }
    if REFERENCE_RE.is_match(text) {
        score += REFERENCE_POINTS;
    }

    score
}

/// Classify an email as transactional (bill/receipt-type) or not.
pub fn is_transactional(subject: &str, body: &str) -> bool {
    let text = format!("{} {}", subject, body).to_lowercase();

    let promo = promotional_score(&text);
    if promo >= PROMO_SHORT_CIRCUIT {
        trace!(promo, "promotional short-circuit");
        return false;
    }

    let score = transactional_score(&text);
    trace!(promo, transactional = score, "email classified");
    score >= TRANSACTIONAL_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_with_amount_and_due_date_is_transactional() {
        assert!(is_transactional(
            "Invoice #4821 – Payment Due",
            "Please pay $150.00, due by 01/15/2026."
        ));
    }

    #[test]
    fn promotional_short_circuit_beats_transactional_signal() {
        // Three promotional keywords force false even with strong
        // transactional language present.
        assert!(!is_transactional(
            "Huge sale: 50% off, limited time",
            "Invoice #123, payment of $99.99 due by 02/01/2026. Unsubscribe here."
        ));
    }

    #[test]
    fn newsletter_is_not_transactional() {
        assert!(!is_transactional(
            "Our weekly newsletter",
            "Catch up on this week's articles. Unsubscribe anytime."
        ));
    }

    #[test]
    fn plain_personal_email_is_not_transactional() {
        assert!(!is_transactional(
            "Lunch tomorrow?",
            "Want to grab lunch at noon?"
        ));
    }

    #[test]
    fn keywords_alone_can_cross_threshold() {
        // invoice + payment + due date = 3 keyword hits, no patterns needed.
        assert!(is_transactional(
            "Invoice",
            "Your payment is expected before the due date."
        ));
    }

    #[test]
    fn single_keyword_is_not_enough() {
        assert!(!is_transactional("Shipping update", "On its way!"));
    }

    #[test]
    fn currency_pattern_detected() {
        assert!(CURRENCY_RE.is_match("total: $12"));
        assert!(CURRENCY_RE.is_match("total: € 45"));
        assert!(CURRENCY_RE.is_match("150.00 charged"));
        assert!(!CURRENCY_RE.is_match("no amounts here"));
    }

    #[test]
    fn date_pattern_detected() {
        assert!(DATE_RE.is_match("due by friday"));
        assert!(DATE_RE.is_match("pay on 01/15/2026"));
        assert!(DATE_RE.is_match("deadline 2026-01-15"));
        assert!(!DATE_RE.is_match("sometime soon"));
    }

    #[test]
    fn reference_pattern_detected() {
        assert!(REFERENCE_RE.is_match("invoice #4821"));
        assert!(REFERENCE_RE.is_match("order number 99812"));
        assert!(REFERENCE_RE.is_match("confirmation no. ab-1234"));
        assert!(REFERENCE_RE.is_match("ticket #123456"));
        assert!(!REFERENCE_RE.is_match("no references"));
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert!(is_transactional(
            "INVOICE #4821 – PAYMENT DUE",
            "PLEASE PAY $150.00, DUE BY 01/15/2026."
        ));
    }

    #[test]
    fn tuition_reminder_is_transactional() {
        assert!(is_transactional(
            "Spring tuition statement",
            "Your tuition payment of $2,400.00 is due on 01/10/2026."
        ));
    }
}
