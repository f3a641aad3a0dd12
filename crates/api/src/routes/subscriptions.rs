//! Route definitions for the `/push/subscriptions` resource.
//!
//! The main backend registers a browser's `PushSubscription` here after the
//! service worker subscribes, and removes it when the user opts out.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::post, Json, Router};
use peyk_core::types::UserId;
use peyk_db::models::{PushSubscription, UpsertSubscription};
use peyk_db::repositories::PushSubscriptionRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::ServiceCaller;
use crate::state::AppState;

/// Request body for `DELETE /push/subscriptions`.
#[derive(Debug, Deserialize)]
pub struct RemoveSubscription {
    pub user_id: UserId,
    pub endpoint: String,
}

/// POST /push/subscriptions -- register or refresh a subscription.
///
/// Re-subscribing on the same endpoint replaces the key material rather
/// than creating a duplicate row.
async fn subscribe(
    _caller: ServiceCaller,
    State(state): State<AppState>,
    Json(input): Json<UpsertSubscription>,
) -> AppResult<(StatusCode, Json<PushSubscription>)> {
    let saved = PushSubscriptionRepo::upsert(&state.pool, &input).await?;
    tracing::info!(user_id = %saved.user_id, subscription_id = %saved.id, "Subscription registered");
    Ok((StatusCode::CREATED, Json(saved)))
}

/// DELETE /push/subscriptions -- explicit unsubscribe.
///
/// Removing an endpoint that is already gone still returns 204; the
/// browser may unsubscribe concurrently with an expiry prune.
async fn unsubscribe(
    _caller: ServiceCaller,
    State(state): State<AppState>,
    Json(input): Json<RemoveSubscription>,
) -> AppResult<StatusCode> {
    let removed =
        PushSubscriptionRepo::delete_by_endpoint(&state.pool, input.user_id, &input.endpoint)
            .await?;
    tracing::info!(user_id = %input.user_id, removed, "Subscription removed");
    Ok(StatusCode::NO_CONTENT)
}

/// Routes mounted at `/push/subscriptions`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(subscribe).delete(unsubscribe))
}
