//! Guardian alert endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use docguard_core::GuardianAlert;

use crate::error::ApiError;
use crate::handlers::UserQuery;
use crate::state::AppState;

/// List a user's alerts, newest first.
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<GuardianAlert>>, ApiError> {
    let alerts = state.storage.alerts.list_for_user(query.user_id).await?;
    Ok(Json(alerts))
}

/// Dismiss one alert.
pub async fn dismiss_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> Result<StatusCode, ApiError> {
    let alert = state
        .storage
        .alerts
        .get(id)
        .await?
        .filter(|a| a.user_id == query.user_id)
        .ok_or_else(|| ApiError::NotFound(format!("alert {}", id)))?;

    state.storage.alerts.dismiss(alert.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
