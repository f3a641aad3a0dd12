//! Route definitions for the `/push/preferences` resource.

use axum::extract::{Path, State};
use axum::{routing::get, Json, Router};
use peyk_core::types::UserId;
use peyk_core::{should_notify, NotificationCategory};
use peyk_db::models::{NotificationPreference, UpdatePreferences};
use peyk_db::repositories::NotificationPreferenceRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::ServiceCaller;
use crate::state::AppState;

/// A user's preferences with category defaults applied, as the settings
/// UI should render them. Users without a stored row get pure defaults.
#[derive(Debug, Serialize)]
pub struct EffectivePreferences {
    pub user_id: UserId,
    pub task_notifications: bool,
    pub project_notifications: bool,
    pub calendar_notifications: bool,
    pub financial_notifications: bool,
}

/// GET /push/preferences/{user_id} -- effective per-category flags.
async fn get_preferences(
    _caller: ServiceCaller,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<EffectivePreferences>> {
    let row = NotificationPreferenceRepo::get(&state.pool, user_id).await?;
    let flags = row.as_ref().map(NotificationPreference::flags);

    Ok(Json(EffectivePreferences {
        user_id,
        task_notifications: should_notify(flags.as_ref(), NotificationCategory::Task),
        project_notifications: should_notify(flags.as_ref(), NotificationCategory::Project),
        calendar_notifications: should_notify(flags.as_ref(), NotificationCategory::Calendar),
        financial_notifications: should_notify(flags.as_ref(), NotificationCategory::Financial),
    }))
}

/// PUT /push/preferences/{user_id} -- partial update.
///
/// Flags absent from the body keep their stored value; the row is created
/// on first write.
async fn update_preferences(
    _caller: ServiceCaller,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(update): Json<UpdatePreferences>,
) -> AppResult<Json<NotificationPreference>> {
    let saved = NotificationPreferenceRepo::upsert(&state.pool, user_id, &update).await?;
    tracing::info!(user_id = %user_id, "Notification preferences updated");
    Ok(Json(saved))
}

/// Routes mounted at `/push/preferences`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{user_id}", get(get_preferences).put(update_preferences))
}
