//! Application state shared across handlers.

use std::sync::Arc;

use docguard_pipeline::{EmailSyncService, ScanService};
use docguard_store::{CountCache, Storage};

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Storage context (PostgreSQL or local fallback, chosen at startup).
    pub storage: Storage,
    /// Scan-to-record service.
    pub scan: Arc<ScanService>,
    /// Batched email ingestion service.
    pub email_sync: Arc<EmailSyncService>,
    /// TTL cache for folder/stack document counts.
    pub counts: CountCache,
}
