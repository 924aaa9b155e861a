//! Folder endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use docguard_core::Folder;
use docguard_pipeline::delete_folder;
use docguard_store::{CountCache, NS_FOLDER};

use crate::error::ApiError;
use crate::handlers::UserQuery;
use crate::state::AppState;

/// Request body for creating a folder.
#[derive(Debug, Deserialize)]
pub struct CreateFolderBody {
    pub user_id: Uuid,
    pub name: String,
}

/// List a user's folders. Document counts are served through the TTL count
/// cache; a miss falls back to the freshly computed value and repopulates.
pub async fn list_folders(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<Folder>>, ApiError> {
    let mut folders = state.storage.folders.list(query.user_id).await?;

    for folder in &mut folders {
        let key = CountCache::folder_key(query.user_id, folder.id);
        match state.counts.get(&key).await {
            Some(count) => folder.document_count = count,
            None => state.counts.set(&key, folder.document_count).await,
        }
    }

    Ok(Json(folders))
}

/// Create a folder. Names are case-insensitively unique per user.
pub async fn create_folder(
    State(state): State<AppState>,
    Json(body): Json<CreateFolderBody>,
) -> Result<(StatusCode, Json<Folder>), ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("folder name must not be empty".into()));
    }

    if let Some(existing) = state
        .storage
        .folders
        .find_by_name_ci(body.user_id, name)
        .await?
    {
        return Err(ApiError::BadRequest(format!(
            "folder '{}' already exists",
            existing.name
        )));
    }

    let id = state.storage.folders.create(body.user_id, name).await?;
    let folder = state
        .storage
        .folders
        .get(id)
        .await?
        .ok_or_else(|| ApiError::Internal("folder vanished after create".into()))?;

    Ok((StatusCode::CREATED, Json(folder)))
}

/// Delete a folder. Documents referencing it keep existing with the
/// reference nulled out.
pub async fn delete_folder_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<StatusCode, ApiError> {
    delete_folder(&state.storage, query.user_id, id).await?;
    state.counts.invalidate_prefix(NS_FOLDER).await;
    Ok(StatusCode::NO_CONTENT)
}
