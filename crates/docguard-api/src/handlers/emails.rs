//! Email sync endpoint.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use docguard_core::IncomingEmail;
use docguard_pipeline::EmailOutcome;
use docguard_store::{NS_FOLDER, NS_STACK};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for a sync batch.
#[derive(Debug, Deserialize)]
pub struct SyncEmailsBody {
    pub user_id: Uuid,
    pub emails: Vec<IncomingEmail>,
}

/// Process a batch of fetched emails. Promotional content is dropped,
/// transactional content becomes document records. One email's failure
/// never fails the batch; per-email outcomes are returned.
pub async fn sync_emails(
    State(state): State<AppState>,
    Json(body): Json<SyncEmailsBody>,
) -> Result<Json<Vec<EmailOutcome>>, ApiError> {
    if body.emails.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let outcomes = state.email_sync.sync_batch(body.user_id, body.emails).await;

    state.counts.invalidate_prefix(NS_FOLDER).await;
    state.counts.invalidate_prefix(NS_STACK).await;

    Ok(Json(outcomes))
}
