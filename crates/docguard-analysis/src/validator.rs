//! Validation of untrusted completion-service output.
//!
//! The completion service returns free text that may embed a JSON object,
//! possibly wrapped in explanatory prose or fenced code blocks. Model output
//! is adversarial-by-default: it omits fields, invents wrong types, and
//! wraps payloads. The validator locates the payload, parses it (parse
//! failure is a hard error), and then coerces each field independently so
//! that one bad field cannot reject an otherwise-good extraction.
//!
//! Coercion table:
//!
//! | Field | Rule |
//! |-------|------|
//! | `title` | non-empty string after trimming; missing/unusable is a hard error |
//! | `amount` | numeric or numeric string; anything else becomes null |
//! | `due_date` | ISO calendar date with year in [2000, 2100]; else null |
//! | `category` | one of the six closed values; else `Other` |
//! | `summary_bullets` | string entries only; empty list gets a fallback bullet |
//! | `is_scam` | bool-ish (bool, "true"/"false", 0/1); default false |

use chrono::{Datelike, NaiveDate};
use docguard_core::defaults::{DUE_DATE_YEAR_MAX, DUE_DATE_YEAR_MIN, FALLBACK_SUMMARY_BULLET};
use docguard_core::{DocumentCategory, Error, ExtractedAnalysis, Result};
use serde_json::Value;
use tracing::debug;

/// Locate and parse the JSON object embedded in a completion response.
///
/// Looks for a fenced code block first, then for the first balanced object
/// literal. Parse failure is a hard [`Error::AnalysisParse`], never a
/// default.
pub fn extract_payload(raw: &str) -> Result<Value> {
    let candidate = find_fenced_block(raw)
        .or_else(|| find_balanced_object(raw))
        .ok_or_else(|| Error::AnalysisParse("no JSON object found in response".to_string()))?;

    serde_json::from_str(candidate)
        .map_err(|e| Error::AnalysisParse(format!("invalid JSON payload: {}", e)))
}

/// Find the contents of the first fenced code block (```json ... ``` or a
/// bare ``` fence).
fn find_fenced_block(raw: &str) -> Option<&str> {
    let start = raw.find("```")?;
    let after_fence = &raw[start + 3..];
    // Skip an optional language tag on the fence line.
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// Find the first balanced `{ ... }` object literal, string- and
/// escape-aware so braces inside string values do not confuse the scan.
fn find_balanced_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let bytes = raw.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Coerce the title field. The whole extraction is unusable without it, so
/// a missing, mistyped, or empty title is a hard error.
pub fn coerce_title(value: &Value) -> Result<String> {
    match value.get("title").and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(Error::AnalysisParse(
            "analysis payload has no usable title".to_string(),
        )),
    }
}

/// Coerce the amount field: numbers pass through, numeric strings parse,
/// anything else becomes null. Never rejects.
pub fn coerce_amount(value: &Value) -> Option<f64> {
    match value.get("amount") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
}

/// Coerce the due date: an ISO calendar date with year in [2000, 2100].
/// Datetime strings are accepted by parsing their date prefix. Anything
/// unparsable or out of range becomes null.
pub fn coerce_due_date(value: &Value) -> Option<NaiveDate> {
    let s = value.get("due_date")?.as_str()?.trim();
    let candidate = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(candidate, "%Y-%m-%d")
        .ok()
        .filter(|d| (DUE_DATE_YEAR_MIN..=DUE_DATE_YEAR_MAX).contains(&d.year()))
}

/// Coerce the category onto the closed enum; unknown values become `Other`.
pub fn coerce_category(value: &Value) -> DocumentCategory {
    value
        .get("category")
        .and_then(Value::as_str)
        .map(DocumentCategory::from_str_loose)
        .unwrap_or(DocumentCategory::Other)
}

/// Coerce summary bullets: keep string entries only; an empty result is
/// replaced with a single fallback bullet.
pub fn coerce_summary(value: &Value) -> Vec<String> {
    let bullets: Vec<String> = value
        .get("summary_bullets")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if bullets.is_empty() {
        vec![FALLBACK_SUMMARY_BULLET.to_string()]
    } else {
        bullets
    }
}

/// Coerce a bool-ish field: bool, "true"/"false" strings, or 0/1 numbers.
/// Defaults to false.
pub fn coerce_flag(value: &Value, field: &str) -> bool {
    match value.get(field) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_i64().is_some_and(|v| v != 0),
        _ => false,
    }
}

/// Coerce the optional risk score onto [0, 100]; non-integers become null.
fn coerce_risk_score(value: &Value) -> Option<i32> {
    value
        .get("risk_score")
        .and_then(Value::as_i64)
        .map(|v| v.clamp(0, 100) as i32)
}

/// Coerce the optional indicator list to string entries only.
fn coerce_risk_indicators(value: &Value) -> Option<Vec<String>> {
    value.get("risk_indicators").and_then(Value::as_array).map(|arr| {
        arr.iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

/// Validate a parsed payload into a canonical [`ExtractedAnalysis`].
///
/// Fields are coerced independently: only the title can fail the whole
/// extraction.
pub fn validate(value: &Value) -> Result<ExtractedAnalysis> {
    let analysis = ExtractedAnalysis {
        title: coerce_title(value)?,
        amount: coerce_amount(value),
        due_date: coerce_due_date(value),
        category: coerce_category(value),
        summary: coerce_summary(value),
        is_scam: coerce_flag(value, "is_scam"),
        risk_score: coerce_risk_score(value),
        risk_indicators: coerce_risk_indicators(value),
    };

    debug!(
        title = %analysis.title,
        category = %analysis.category,
        has_amount = analysis.amount.is_some(),
        has_due_date = analysis.due_date.is_some(),
        "analysis validated"
    );

    Ok(analysis)
}

/// Locate, parse, and validate a raw completion response in one step.
pub fn parse_completion(raw: &str) -> Result<ExtractedAnalysis> {
    let payload = extract_payload(raw)?;
    validate(&payload)
}
