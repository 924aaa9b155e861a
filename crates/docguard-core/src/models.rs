//! Core domain models for docguard.
//!
//! Everything a document becomes on its way through the pipeline lives here:
//! the validated analysis produced from completion-service output, the
//! persisted document record, organizational folders and life stacks,
//! guardian alerts, and per-user notification settings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// CLOSED ENUMS
// =============================================================================

/// Document category. Closed set; anything the completion service invents
/// outside of it is coerced to `Other` by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Finance,
    Education,
    Shopping,
    Health,
    Career,
    Other,
}

impl DocumentCategory {
    /// All categories, in canonical order.
    pub const ALL: [DocumentCategory; 6] = [
        DocumentCategory::Finance,
        DocumentCategory::Education,
        DocumentCategory::Shopping,
        DocumentCategory::Health,
        DocumentCategory::Career,
        DocumentCategory::Other,
    ];

    /// Parse a category, case-insensitively. Unknown values map to `Other`.
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "finance" => Self::Finance,
            "education" => Self::Education,
            "shopping" => Self::Shopping,
            "health" => Self::Health,
            "career" => Self::Career,
            _ => Self::Other,
        }
    }

    /// Canonical display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finance => "Finance",
            Self::Education => "Education",
            Self::Shopping => "Shopping",
            Self::Health => "Health",
            Self::Career => "Career",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Document lifecycle status. Transitions are monotonic: `New` may move to
/// `Paid` or `Archived`; terminal states never move back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    New,
    Paid,
    Archived,
}

impl DocumentStatus {
    /// Whether a transition to `next` is allowed.
    pub fn can_transition_to(&self, next: DocumentStatus) -> bool {
        matches!(
            (self, next),
            (DocumentStatus::New, DocumentStatus::Paid)
                | (DocumentStatus::New, DocumentStatus::Archived)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Paid => "paid",
            Self::Archived => "archived",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "new" => Some(Self::New),
            "paid" => Some(Self::Paid),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a document entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    Scan,
    Email,
    Manual,
}

impl DocumentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Email => "email",
            Self::Manual => "manual",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "scan" => Some(Self::Scan),
            "email" => Some(Self::Email),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Guardian alert kind. Fixed closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    #[serde(rename = "deadline_7day")]
    Deadline7Day,
    #[serde(rename = "deadline_1day")]
    Deadline1Day,
    #[serde(rename = "overdue")]
    Overdue,
    #[serde(rename = "scam_warning")]
    ScamWarning,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deadline7Day => "deadline_7day",
            Self::Deadline1Day => "deadline_1day",
            Self::Overdue => "overdue",
            Self::ScamWarning => "scam_warning",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "deadline_7day" => Some(Self::Deadline7Day),
            "deadline_1day" => Some(Self::Deadline1Day),
            "overdue" => Some(Self::Overdue),
            "scam_warning" => Some(Self::ScamWarning),
            _ => None,
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// DOCUMENTS
// =============================================================================

/// A persisted document record, the durable outcome of a scan or email sync.
///
/// `risk_score` is only non-zero when scam detection actually ran for this
/// document. `folder_id` and `stack_id` are references, not ownership:
/// deleting a folder or stack nulls them out rather than deleting documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub category: DocumentCategory,
    pub amount: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub summary: Vec<String>,
    pub status: DocumentStatus,
    pub is_scam: bool,
    pub risk_score: i32,
    pub source: DocumentSource,
    pub folder_id: Option<Uuid>,
    pub stack_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Request for creating a new document record.
#[derive(Debug, Clone)]
pub struct CreateDocumentRequest {
    pub user_id: Uuid,
    pub title: String,
    pub category: DocumentCategory,
    pub amount: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub summary: Vec<String>,
    pub is_scam: bool,
    pub risk_score: i32,
    pub source: DocumentSource,
    pub folder_id: Option<Uuid>,
    pub stack_id: Option<Uuid>,
}

// =============================================================================
// EXTRACTED ANALYSIS
// =============================================================================

/// The validated, canonical structured result derived from raw
/// completion-service output.
///
/// Only the analysis validator produces this type; it is never persisted
/// directly, only transformed into a [`DocumentRecord`]. All fields other
/// than `amount` and `due_date` are guaranteed populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedAnalysis {
    pub title: String,
    pub amount: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub category: DocumentCategory,
    pub summary: Vec<String>,
    pub is_scam: bool,
    pub risk_score: Option<i32>,
    pub risk_indicators: Option<Vec<String>>,
}

// =============================================================================
// RISK ASSESSMENT
// =============================================================================

/// Result of a scam/phishing risk assessment. Derived fresh on every call;
/// only `score` and `indicators` are copied onto a document record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Additive heuristic score, clamped to [0, 100].
    pub score: i32,
    /// Human-readable indicator strings, in detector order.
    pub indicators: Vec<String>,
    /// Verdict: true when `score` is at or above the scam threshold.
    pub is_scam: bool,
    /// Free-text recommendation tier.
    pub recommendation: String,
}

// =============================================================================
// FOLDERS & STACKS
// =============================================================================

/// An organizational folder. Names are case-insensitively unique per user;
/// the folder router creates folders lazily on first use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Derived count of documents referencing this folder.
    pub document_count: i64,
    pub created_at: DateTime<Utc>,
}

/// A user-defined, keyword-matched bucket for grouping documents across
/// folders and categories. Matching order is the stored `position` order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeStack {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub icon: String,
    pub color: String,
    /// Ordered keyword list; any case-insensitive substring match assigns.
    pub keywords: Vec<String>,
    /// List position; routing evaluates stacks in ascending position order.
    pub position: i32,
    /// Derived count of documents referencing this stack.
    pub document_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Request for creating a new life stack.
#[derive(Debug, Clone)]
pub struct CreateStackRequest {
    pub user_id: Uuid,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub keywords: Vec<String>,
    pub position: i32,
}

// =============================================================================
// GUARDIAN ALERTS
// =============================================================================

/// A scheduled reminder record tied to one document's due date or to a
/// positive scam verdict.
///
/// Invariant (enforced by the scheduler, not storage): at most one
/// non-dismissed alert exists per document at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardianAlert {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_id: Uuid,
    pub kind: AlertKind,
    pub trigger_at: DateTime<Utc>,
    pub dismissed: bool,
    pub sent: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// NOTIFICATION SETTINGS
// =============================================================================

/// Per-user notification toggles.
///
/// `overdue` and `scam_warning` alerts ignore the 7-day/1-day toggles but
/// are suppressed entirely when push is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub push_enabled: bool,
    pub remind_7day: bool,
    pub remind_1day: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            push_enabled: true,
            remind_7day: true,
            remind_1day: true,
        }
    }
}

// =============================================================================
// PIPELINE BOUNDARY TYPES
// =============================================================================

/// Result of the text-extraction (OCR) boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextExtraction {
    pub full_text: String,
    pub confidence: f32,
}

/// An incoming email handed to the sync pipeline. Boundary type only; the
/// pipeline persists a [`DocumentRecord`] derived from it, never the email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingEmail {
    pub id: String,
    pub subject: String,
    pub body: String,
    pub sender: String,
    pub received_at: DateTime<Utc>,
}

/// The single return value of a full scan-to-record operation, consumed by
/// the CLI/UI boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub analysis: ExtractedAnalysis,
    pub document_id: Uuid,
    pub image_url: Option<String>,
    pub auto_assigned_folder_id: Option<Uuid>,
    pub auto_assigned_folder_name: Option<String>,
    pub alert_created: bool,
    pub alert_kind: Option<AlertKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_from_str_loose_known_values() {
        assert_eq!(
            DocumentCategory::from_str_loose("Finance"),
            DocumentCategory::Finance
        );
        assert_eq!(
            DocumentCategory::from_str_loose("EDUCATION"),
            DocumentCategory::Education
        );
        assert_eq!(
            DocumentCategory::from_str_loose(" health "),
            DocumentCategory::Health
        );
    }

    #[test]
    fn category_from_str_loose_unknown_defaults_to_other() {
        assert_eq!(
            DocumentCategory::from_str_loose("groceries"),
            DocumentCategory::Other
        );
        assert_eq!(DocumentCategory::from_str_loose(""), DocumentCategory::Other);
    }

    #[test]
    fn category_display_roundtrip() {
        for cat in DocumentCategory::ALL {
            assert_eq!(DocumentCategory::from_str_loose(cat.as_str()), cat);
        }
    }

    #[test]
    fn category_serde_snake_case() {
        let json = serde_json::to_string(&DocumentCategory::Finance).unwrap();
        assert_eq!(json, "\"finance\"");
    }

    #[test]
    fn status_transitions_are_monotonic() {
        assert!(DocumentStatus::New.can_transition_to(DocumentStatus::Paid));
        assert!(DocumentStatus::New.can_transition_to(DocumentStatus::Archived));
        assert!(!DocumentStatus::Paid.can_transition_to(DocumentStatus::New));
        assert!(!DocumentStatus::Paid.can_transition_to(DocumentStatus::Archived));
        assert!(!DocumentStatus::Archived.can_transition_to(DocumentStatus::New));
        assert!(!DocumentStatus::Archived.can_transition_to(DocumentStatus::Paid));
    }

    #[test]
    fn status_no_self_transition() {
        assert!(!DocumentStatus::New.can_transition_to(DocumentStatus::New));
        assert!(!DocumentStatus::Paid.can_transition_to(DocumentStatus::Paid));
    }

    #[test]
    fn alert_kind_string_roundtrip() {
        for kind in [
            AlertKind::Deadline7Day,
            AlertKind::Deadline1Day,
            AlertKind::Overdue,
            AlertKind::ScamWarning,
        ] {
            assert_eq!(AlertKind::from_str_loose(kind.as_str()), Some(kind));
        }
        assert_eq!(AlertKind::from_str_loose("deadline_30day"), None);
    }

    #[test]
    fn alert_kind_serde_matches_as_str() {
        let json = serde_json::to_string(&AlertKind::Deadline7Day).unwrap();
        assert_eq!(json, "\"deadline_7day\"");
        let json = serde_json::to_string(&AlertKind::ScamWarning).unwrap();
        assert_eq!(json, "\"scam_warning\"");
    }

    #[test]
    fn source_string_roundtrip() {
        for source in [
            DocumentSource::Scan,
            DocumentSource::Email,
            DocumentSource::Manual,
        ] {
            assert_eq!(DocumentSource::from_str_loose(source.as_str()), Some(source));
        }
    }

    #[test]
    fn notification_settings_default_all_enabled() {
        let settings = NotificationSettings::default();
        assert!(settings.push_enabled);
        assert!(settings.remind_7day);
        assert!(settings.remind_1day);
    }

    #[test]
    fn extracted_analysis_serde_roundtrip() {
        let analysis = ExtractedAnalysis {
            title: "Electric Bill".to_string(),
            amount: Some(120.50),
            due_date: NaiveDate::from_ymd_opt(2026, 9, 1),
            category: DocumentCategory::Finance,
            summary: vec!["Monthly electricity charge".to_string()],
            is_scam: false,
            risk_score: None,
            risk_indicators: None,
        };

        let json = serde_json::to_string(&analysis).unwrap();
        let parsed: ExtractedAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, analysis);
    }
}
