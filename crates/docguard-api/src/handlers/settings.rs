//! Notification settings endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use docguard_core::NotificationSettings;

use crate::error::ApiError;
use crate::handlers::UserQuery;
use crate::state::AppState;

/// Request body for replacing a user's settings.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsBody {
    pub user_id: Uuid,
    pub push_enabled: bool,
    pub remind_7day: bool,
    pub remind_1day: bool,
}

/// Get a user's notification settings (defaults when never saved).
pub async fn get_settings(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<NotificationSettings>, ApiError> {
    let settings = state.storage.settings.get(query.user_id).await?;
    Ok(Json(settings))
}

/// Replace a user's notification settings.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(body): Json<UpdateSettingsBody>,
) -> Result<StatusCode, ApiError> {
    state
        .storage
        .settings
        .upsert(
            body.user_id,
            NotificationSettings {
                push_enabled: body.push_enabled,
                remind_7day: body.remind_7day,
                remind_1day: body.remind_1day,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
