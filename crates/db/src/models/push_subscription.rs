//! Push subscription entity models and DTOs.

use peyk_core::types::{SubscriptionId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `push_subscriptions` table.
///
/// One row per (user, browser/device) pair. The `p256dh`/`auth` key
/// material is supplied by the browser at subscribe time and treated as
/// opaque base64url strings everywhere except the payload encryptor.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PushSubscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub device_info: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating or refreshing a subscription.
///
/// Re-subscribing from the same browser updates the existing
/// `(user_id, endpoint)` row rather than duplicating it.
#[derive(Debug, Deserialize)]
pub struct UpsertSubscription {
    pub user_id: UserId,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub device_info: Option<String>,
}
