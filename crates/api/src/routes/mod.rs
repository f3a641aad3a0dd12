//! Route definitions, grouped by resource.

pub mod dispatch;
pub mod health;
pub mod preferences;
pub mod subscriptions;

use axum::Router;

use crate::state::AppState;

/// All `/api/v1` routes. The health check is mounted separately at root.
///
/// ```text
/// POST   /push/subscriptions            -> subscribe
/// DELETE /push/subscriptions            -> unsubscribe
/// GET    /push/preferences/{user_id}    -> get_preferences
/// PUT    /push/preferences/{user_id}    -> update_preferences
/// POST   /internal/dispatch             -> dispatch
/// POST   /internal/comments             -> comment_created
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/push/subscriptions", subscriptions::router())
        .nest("/push/preferences", preferences::router())
        .nest("/internal", dispatch::router())
}
