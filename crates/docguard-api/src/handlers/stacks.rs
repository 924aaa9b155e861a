//! Life stack endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use docguard_core::{CreateStackRequest, LifeStack};
use docguard_pipeline::delete_stack;
use docguard_store::{CountCache, NS_STACK};

use crate::error::ApiError;
use crate::handlers::UserQuery;
use crate::state::AppState;

/// Request body for creating a stack.
#[derive(Debug, Deserialize)]
pub struct CreateStackBody {
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub position: i32,
}

/// List a user's stacks in routing order.
pub async fn list_stacks(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<LifeStack>>, ApiError> {
    let mut stacks = state.storage.stacks.list(query.user_id).await?;

    for stack in &mut stacks {
        let key = CountCache::stack_key(query.user_id, stack.id);
        match state.counts.get(&key).await {
            Some(count) => stack.document_count = count,
            None => state.counts.set(&key, stack.document_count).await,
        }
    }

    Ok(Json(stacks))
}

/// Create a stack.
pub async fn create_stack(
    State(state): State<AppState>,
    Json(body): Json<CreateStackBody>,
) -> Result<(StatusCode, Json<LifeStack>), ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("stack name must not be empty".into()));
    }
    let keywords: Vec<String> = body
        .keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        return Err(ApiError::BadRequest(
            "a stack needs at least one keyword".into(),
        ));
    }

    let id = state
        .storage
        .stacks
        .create(CreateStackRequest {
            user_id: body.user_id,
            name: body.name.trim().to_string(),
            icon: body.icon,
            color: body.color,
            keywords,
            position: body.position,
        })
        .await?;

    let stack = state
        .storage
        .stacks
        .get(id)
        .await?
        .ok_or_else(|| ApiError::Internal("stack vanished after create".into()))?;

    Ok((StatusCode::CREATED, Json(stack)))
}

/// Delete a stack. Documents referencing it keep existing with the
/// reference nulled out.
pub async fn delete_stack_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<StatusCode, ApiError> {
    delete_stack(&state.storage, query.user_id, id).await?;
    state.counts.invalidate_prefix(NS_STACK).await;
    Ok(StatusCode::NO_CONTENT)
}
