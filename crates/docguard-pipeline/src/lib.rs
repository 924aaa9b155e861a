//! # docguard-pipeline
//!
//! Orchestration layer for docguard: folder/stack routing, deadline alert
//! scheduling, named domain operations with enumerated cascades, the
//! scan-to-record service, and batched email sync.
//!
//! Control flow: capture → OCR → throttled completion call → validation →
//! scam assessment (documents) or email classification (emails) → routing →
//! persisted record → alert scheduling.

pub mod alerts;
pub mod email_sync;
pub mod ops;
pub mod routing;
pub mod scan;

pub use alerts::{days_until_due, deadline_alert_kind, schedule_deadline_alert, schedule_scam_alert};
pub use email_sync::{EmailOutcome, EmailStatus, EmailSyncService};
pub use ops::{archive_document, delete_document, delete_folder, delete_stack, mark_paid};
pub use routing::{assign_folder, category_folder, resolve_folder_name, route_stack};
pub use scan::{ScanRequest, ScanService, EXTRACTION_SYSTEM_PROMPT};
