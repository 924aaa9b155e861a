//! Structured logging schema and field name constants for docguard.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data (keyword hits, queue items) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "api", "store", "inference", "analysis", "pipeline"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "throttle", "scan", "email_sync", "alert_scheduler"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "scan_to_record", "submit", "assign_folder", "mark_paid"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Owning user UUID.
pub const USER_ID: &str = "user_id";

/// Document UUID being operated on.
pub const DOCUMENT_ID: &str = "document_id";

/// Folder UUID.
pub const FOLDER_ID: &str = "folder_id";

/// Stack UUID.
pub const STACK_ID: &str = "stack_id";

/// Guardian alert UUID.
pub const ALERT_ID: &str = "alert_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Heuristic risk score assigned to a document.
pub const RISK_SCORE: &str = "risk_score";

/// Depth of the completion throttle queue at submission time.
pub const QUEUE_DEPTH: &str = "queue_depth";

/// Number of emails in a sync batch.
pub const BATCH_SIZE: &str = "batch_size";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for a completion call.
pub const MODEL: &str = "model";

/// Byte length of a completion prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a completion response.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
