//! Document endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use docguard_core::DocumentRecord;
use docguard_pipeline::{archive_document, delete_document, mark_paid};
use docguard_store::{NS_FOLDER, NS_STACK};

use crate::error::ApiError;
use crate::handlers::UserQuery;
use crate::state::AppState;

/// List a user's documents, newest first.
pub async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<DocumentRecord>>, ApiError> {
    let documents = state.storage.documents.list(query.user_id).await?;
    Ok(Json(documents))
}

/// Get one document.
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<Json<DocumentRecord>, ApiError> {
    let document = state
        .storage
        .documents
        .get(id)
        .await?
        .filter(|d| d.user_id == query.user_id)
        .ok_or_else(|| ApiError::NotFound(format!("document {}", id)))?;
    Ok(Json(document))
}

/// Mark a document paid. Dismisses its active alerts as a cascade.
pub async fn mark_document_paid(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<StatusCode, ApiError> {
    mark_paid(&state.storage, query.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Archive a document. Dismisses its active alerts as a cascade.
pub async fn archive_document_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<StatusCode, ApiError> {
    archive_document(&state.storage, query.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a document and dismiss its alerts.
pub async fn delete_document_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<StatusCode, ApiError> {
    delete_document(&state.storage, query.user_id, id).await?;

    state.counts.invalidate_prefix(NS_FOLDER).await;
    state.counts.invalidate_prefix(NS_STACK).await;

    Ok(StatusCode::NO_CONTENT)
}
