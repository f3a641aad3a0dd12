//! Repository for the `push_subscriptions` table.

use peyk_core::types::{SubscriptionId, UserId};
use sqlx::PgPool;

use crate::models::push_subscription::{PushSubscription, UpsertSubscription};

/// Column list for `push_subscriptions` queries.
const COLUMNS: &str = "id, user_id, endpoint, p256dh, auth, device_info, created_at";

/// Provides CRUD operations for push subscriptions.
pub struct PushSubscriptionRepo;

impl PushSubscriptionRepo {
    /// Insert a subscription, or refresh the key material if the same
    /// browser re-subscribes on the same endpoint.
    pub async fn upsert(
        pool: &PgPool,
        sub: &UpsertSubscription,
    ) -> Result<PushSubscription, sqlx::Error> {
        let query = format!(
            "INSERT INTO push_subscriptions (user_id, endpoint, p256dh, auth, device_info) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, endpoint) DO UPDATE SET \
                p256dh = EXCLUDED.p256dh, \
                auth = EXCLUDED.auth, \
                device_info = EXCLUDED.device_info \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PushSubscription>(&query)
            .bind(sub.user_id)
            .bind(&sub.endpoint)
            .bind(&sub.p256dh)
            .bind(&sub.auth)
            .bind(&sub.device_info)
            .fetch_one(pool)
            .await
    }

    /// List every subscription for a single user.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<PushSubscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM push_subscriptions \
             WHERE user_id = $1 \
             ORDER BY created_at"
        );
        sqlx::query_as::<_, PushSubscription>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List every subscription belonging to any of the given users.
    pub async fn list_for_users(
        pool: &PgPool,
        user_ids: &[UserId],
    ) -> Result<Vec<PushSubscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM push_subscriptions \
             WHERE user_id = ANY($1) \
             ORDER BY user_id, created_at"
        );
        sqlx::query_as::<_, PushSubscription>(&query)
            .bind(user_ids)
            .fetch_all(pool)
            .await
    }

    /// Delete a subscription by primary key.
    ///
    /// Returns `false` when the row was already gone. Two overlapping
    /// scans pruning the same expired endpoint must both succeed, so a
    /// missing row is a no-op rather than an error.
    pub async fn delete_by_id(pool: &PgPool, id: SubscriptionId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM push_subscriptions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a subscription by its natural key (explicit unsubscribe).
    ///
    /// Returns `false` when no matching row existed.
    pub async fn delete_by_endpoint(
        pool: &PgPool,
        user_id: UserId,
        endpoint: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM push_subscriptions WHERE user_id = $1 AND endpoint = $2")
                .bind(user_id)
                .bind(endpoint)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
