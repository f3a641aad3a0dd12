//! Internal routes: the dispatch entry point and the comment-created hook.
//!
//! These are called service-to-service by the main backend, never by
//! browsers.

use axum::extract::State;
use axum::{routing::post, Json, Router};
use peyk_core::types::UserId;
use peyk_core::{NotificationCategory, NotificationMessage};
use peyk_push::DispatchReport;
use peyk_scanners::comment::{self, CommentContext};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::ServiceCaller;
use crate::state::AppState;

/// Request body for `POST /internal/dispatch`.
#[derive(Debug, Deserialize)]
pub struct DispatchRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    pub category: NotificationCategory,
    pub recipient_user_ids: Vec<UserId>,
}

/// Delivery counts returned to the caller. Per-subscription results stay
/// in the logs.
#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    pub sent: usize,
    pub failed: usize,
    pub removed_expired: usize,
}

impl From<DispatchReport> for DispatchResponse {
    fn from(report: DispatchReport) -> Self {
        Self {
            sent: report.sent,
            failed: report.failed,
            removed_expired: report.removed_expired,
        }
    }
}

/// POST /internal/dispatch -- send one notification to a set of users.
async fn dispatch(
    _caller: ServiceCaller,
    State(state): State<AppState>,
    Json(input): Json<DispatchRequest>,
) -> AppResult<Json<DispatchResponse>> {
    if input.title.is_empty() {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }

    let mut message = NotificationMessage::new(input.title, input.body, input.category);
    if let Some(url) = input.url {
        message = message.with_url(url);
    }
    if let Some(icon) = input.icon {
        message = message.with_icon(icon);
    }

    let report = state
        .dispatcher
        .dispatch(&message, &input.recipient_user_ids)
        .await?;
    Ok(Json(report.into()))
}

/// POST /internal/comments -- notify watchers of a freshly created comment.
async fn comment_created(
    _caller: ServiceCaller,
    State(state): State<AppState>,
    Json(ctx): Json<CommentContext>,
) -> AppResult<Json<DispatchResponse>> {
    let report = comment::notify_created(&state.dispatcher, &ctx).await?;
    Ok(Json(report.into()))
}

/// Routes mounted at `/internal`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dispatch", post(dispatch))
        .route("/comments", post(comment_created))
}
