//! Scan endpoint.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use docguard_core::ScanResult;
use docguard_pipeline::ScanRequest;
use docguard_store::{NS_FOLDER, NS_STACK};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for a scan.
#[derive(Debug, Deserialize)]
pub struct ScanBody {
    pub user_id: Uuid,
    pub image_path: String,
    pub image_url: Option<String>,
}

/// Run the full scan-to-record pipeline for one captured image.
///
/// # Returns
/// - 200 OK with the [`ScanResult`]
/// - 502 Bad Gateway when extraction or the completion service fails
pub async fn scan_document(
    State(state): State<AppState>,
    Json(body): Json<ScanBody>,
) -> Result<Json<ScanResult>, ApiError> {
    if body.image_path.trim().is_empty() {
        return Err(ApiError::BadRequest("image_path must not be empty".into()));
    }

    let result = state
        .scan
        .scan_to_record(ScanRequest {
            user_id: body.user_id,
            image_path: body.image_path,
            image_url: body.image_url,
        })
        .await?;

    // A new document changes folder/stack counts.
    state.counts.invalidate_prefix(NS_FOLDER).await;
    state.counts.invalidate_prefix(NS_STACK).await;

    Ok(Json(result))
}
