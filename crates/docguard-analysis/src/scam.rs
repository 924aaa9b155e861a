//! Rule-based scam/phishing risk assessment.
//!
//! Four independent detectors contribute weighted points, each capped before
//! summation so no single category can dominate the total:
//!
//! | Detector | Contribution |
//! |----------|--------------|
//! | Urgency language | `min(matches * 15, 40)` |
//! | Sensitive-information requests | `min(matches * 20, 50)` |
//! | Suspicious sender domain | flat 25 |
//! | Suspicious call-to-action | flat 15 |
//!
//! The total is clamped to [0, 100]; a score of 70 or more is a positive
//! scam verdict. Matching is case-insensitive substring search over fixed
//! phrase lists.

use docguard_core::defaults::{
    RISK_CTA_POINTS, RISK_DOMAIN_POINTS, RISK_EXAMPLE_LIMIT, RISK_LOW_THRESHOLD,
    RISK_MEDIUM_THRESHOLD, RISK_SENSITIVE_CAP, RISK_SENSITIVE_WEIGHT, RISK_URGENCY_CAP,
    RISK_URGENCY_WEIGHT, SCAM_SCORE_THRESHOLD,
};
use docguard_core::RiskAssessment;
use tracing::debug;

use crate::keywords::{capped_score, match_phrases};

/// Urgency/pressure phrases common to phishing campaigns.
const URGENCY_PHRASES: &[&str] = &[
    "urgent",
    "immediately",
    "act now",
    "account suspended",
    "account locked",
    "final notice",
    "last chance",
    "expires today",
    "within 24 hours",
    "action required",
];

/// Requests for credentials or other sensitive information.
const SENSITIVE_PHRASES: &[&str] = &[
    "password",
    "otp",
    "one-time code",
    "cvv",
    "card number",
    "pin",
    "ssn",
    "social security",
    "verify your identity",
    "confirm your account",
    "banking details",
];

/// Suspicious call-to-action phrasing.
const CTA_PHRASES: &[&str] = &[
    "click here",
    "verify now",
    "login here",
    "update account",
    "claim now",
    "download attachment",
];

/// TLDs disproportionately used for throwaway phishing domains.
const RISKY_TLDS: &[&str] = &[".xyz", ".top", ".click", ".buzz", ".icu", ".rest", ".monster"];

/// Brand names commonly typosquatted.
const BRAND_NAMES: &[&str] = &[
    "paypal",
    "amazon",
    "apple",
    "google",
    "microsoft",
    "netflix",
    "facebook",
    "instagram",
    "chase",
    "wellsfargo",
    "barclays",
    "hsbc",
];

/// Extract the domain from a sender address: the substring following `@`,
/// up to the first `>` or end of string, lowercased.
pub fn extract_domain(sender: &str) -> Option<String> {
    let at = sender.find('@')?;
    let rest = &sender[at + 1..];
    let end = rest.find('>').unwrap_or(rest.len());
    let domain = rest[..end].trim().to_lowercase();
    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}

/// Map common digit look-alikes back to the letters they imitate.
///
/// `paypa1-verify.xyz` normalizes to `paypal-verify.xyz`; a brand name that
/// appears only after normalization is a typosquat signal.
fn normalize_lookalikes(domain: &str) -> String {
    domain
        .chars()
        .map(|c| match c {
            '0' => 'o',
            '1' => 'l',
            '3' => 'e',
            '5' => 's',
            '7' => 't',
            _ => c,
        })
        .collect()
}

/// Check a domain against the suspicious-pattern list, returning the first
/// matching reason.
pub fn suspicious_domain_reason(domain: &str) -> Option<&'static str> {
    let digit_count = domain.chars().filter(|c| c.is_ascii_digit()).count();
    if digit_count >= 3 {
        return Some("numeric-heavy domain");
    }

    if domain.matches('-').count() >= 2 {
        return Some("multiple hyphens in domain");
    }

    if RISKY_TLDS.iter().any(|tld| domain.ends_with(tld)) {
        return Some("high-risk top-level domain");
    }

    let normalized = normalize_lookalikes(domain);
    for brand in BRAND_NAMES {
        if normalized.contains(brand) && !domain.contains(brand) {
            return Some("look-alike of a known brand");
        }
    }

    None
}

/// Assess scam/phishing risk for a piece of content and its sender address.
///
/// Deterministic and case-insensitive: uppercasing the entire input does not
/// change the resulting score. For scanned documents the sender is empty and
/// the domain detector contributes nothing.
pub fn assess(content: &str, sender: &str) -> RiskAssessment {
    let mut score: i32 = 0;
    let mut indicators = Vec::new();

    let urgency = match_phrases(content, URGENCY_PHRASES, RISK_EXAMPLE_LIMIT);
    if urgency.any() {
        score += capped_score(urgency.count, RISK_URGENCY_WEIGHT, RISK_URGENCY_CAP);
        indicators.push(format!(
            "Urgency language: {}",
            urgency.examples.join(", ")
        ));
    }

    let sensitive = match_phrases(content, SENSITIVE_PHRASES, RISK_EXAMPLE_LIMIT);
    if sensitive.any() {
        score += capped_score(sensitive.count, RISK_SENSITIVE_WEIGHT, RISK_SENSITIVE_CAP);
        indicators.push(format!(
            "Requests sensitive information: {}",
            sensitive.examples.join(", ")
        ));
    }

    if let Some(domain) = extract_domain(sender) {
        if let Some(reason) = suspicious_domain_reason(&domain) {
            score += RISK_DOMAIN_POINTS;
            indicators.push(format!("Suspicious sender domain {} ({})", domain, reason));
        }
    }

    let cta = match_phrases(content, CTA_PHRASES, RISK_EXAMPLE_LIMIT);
    if cta.any() {
        score += RISK_CTA_POINTS;
        indicators.push(format!(
            "Suspicious call to action: {}",
            cta.examples.join(", ")
        ));
    }

    let score = score.clamp(0, 100);
    let is_scam = score >= SCAM_SCORE_THRESHOLD;
    let recommendation = recommendation_for(score).to_string();

    debug!(risk_score = score, is_scam, "scam assessment complete");

    RiskAssessment {
        score,
        indicators,
        is_scam,
        recommendation,
    }
}

/// Recommendation tier for a clamped score.
pub fn recommendation_for(score: i32) -> &'static str {
    if score >= SCAM_SCORE_THRESHOLD {
        "HIGH RISK: likely scam. Do not respond, click links, or share any information."
    } else if score >= RISK_MEDIUM_THRESHOLD {
        "MEDIUM RISK: verify with the sender through a known, independent channel."
    } else if score >= RISK_LOW_THRESHOLD {
        "LOW RISK: minor caution advised."
    } else {
        "No significant risk indicators; appears legitimate."
    }
}
