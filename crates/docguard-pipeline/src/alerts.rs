//! Deadline-to-alert scheduling.
//!
//! A document's due date and the current time determine the alert kind:
//!
//! | `days_until_due` | Kind | Gate |
//! |------------------|------|------|
//! | `< 0` | `overdue` | push toggle only |
//! | `0..=1` | `deadline_1day` | push + 1-day toggle |
//! | `2..=7` | `deadline_7day` | push + 7-day toggle |
//! | `> 7` | none yet | none |
//!
//! `days_until_due = ceil((due - now) / 1 day)`. Scheduling is idempotent:
//! an existing non-dismissed alert for the document suppresses creation, so
//! re-scanning never duplicates alerts. Scam warnings are created
//! immediately on a positive verdict, independent of due dates, gated only
//! by the push toggle.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use docguard_core::defaults::{DEADLINE_WINDOW_1DAY, DEADLINE_WINDOW_7DAY};
use docguard_core::{AlertKind, DocumentRecord, DocumentStatus, NotificationSettings, Result};
use docguard_store::Storage;

const SECS_PER_DAY: i64 = 86_400;

/// Whole days until the due date, rounding up. Negative once the document
/// is at least one full day past due.
pub fn days_until_due(due: NaiveDate, now: DateTime<Utc>) -> i64 {
    let due_midnight = due.and_hms_opt(0, 0, 0).expect("midnight is valid").and_utc();
    let secs = (due_midnight - now).num_seconds();
    let days = secs.div_euclid(SECS_PER_DAY);
    if secs.rem_euclid(SECS_PER_DAY) > 0 {
        days + 1
    } else {
        days
    }
}

/// The deadline alert kind for a document due in `days`, after applying the
/// user's notification toggles. None means no alert should exist yet (or
/// the relevant toggle suppressed it).
pub fn deadline_alert_kind(days: i64, settings: &NotificationSettings) -> Option<AlertKind> {
    if !settings.push_enabled {
        return None;
    }
    if days < 0 {
        // Overdue ignores the 7-day/1-day toggles.
        return Some(AlertKind::Overdue);
    }
    if days <= DEADLINE_WINDOW_1DAY {
        return settings.remind_1day.then_some(AlertKind::Deadline1Day);
    }
    if days <= DEADLINE_WINDOW_7DAY {
        return settings.remind_7day.then_some(AlertKind::Deadline7Day);
    }
    None
}

/// Derive and persist the deadline alert for a document, if one is due.
///
/// Returns the created alert kind, or None when nothing was created: no due
/// date, terminal status, due too far out, toggles off, or an active alert
/// already exists (idempotent re-scan).
pub async fn schedule_deadline_alert(
    storage: &Storage,
    document: &DocumentRecord,
    now: DateTime<Utc>,
) -> Result<Option<AlertKind>> {
    let Some(due) = document.due_date else {
        return Ok(None);
    };
    if document.status != DocumentStatus::New {
        return Ok(None);
    }

    if !storage.alerts.active_for_document(document.id).await?.is_empty() {
        debug!(document_id = %document.id, "active alert exists, skipping");
        return Ok(None);
    }

    let settings = storage.settings.get(document.user_id).await?;
    let days = days_until_due(due, now);
    let Some(kind) = deadline_alert_kind(days, &settings) else {
        return Ok(None);
    };

    storage
        .alerts
        .insert(document.user_id, document.id, kind, now)
        .await?;

    info!(
        document_id = %document.id,
        kind = %kind,
        days_until_due = days,
        "deadline alert created"
    );
    Ok(Some(kind))
}

/// Create a scam-warning alert for a document with a positive verdict.
///
/// Gated only by the push toggle; deduplicated against any active alert for
/// the document, like deadline alerts.
pub async fn schedule_scam_alert(
    storage: &Storage,
    document: &DocumentRecord,
    now: DateTime<Utc>,
) -> Result<Option<AlertKind>> {
    if !document.is_scam {
        return Ok(None);
    }

    let settings = storage.settings.get(document.user_id).await?;
    if !settings.push_enabled {
        return Ok(None);
    }

    if !storage.alerts.active_for_document(document.id).await?.is_empty() {
        debug!(document_id = %document.id, "active alert exists, skipping scam warning");
        return Ok(None);
    }

    storage
        .alerts
        .insert(document.user_id, document.id, AlertKind::ScamWarning, now)
        .await?;

    info!(document_id = %document.id, "scam warning created");
    Ok(Some(AlertKind::ScamWarning))
}
