//! Store seams for subscriptions and preferences.
//!
//! The dispatcher reads and deletes subscription rows and reads preference
//! flags; these traits keep it testable with in-memory fakes. The Postgres
//! implementations delegate to the `peyk-db` repositories.

use async_trait::async_trait;
use peyk_core::prefs::PreferenceFlags;
use peyk_core::types::{SubscriptionId, UserId};
use peyk_db::models::PushSubscription;
use peyk_db::repositories::{NotificationPreferenceRepo, PushSubscriptionRepo};
use peyk_db::DbPool;

/// Backend-agnostic store failure.
#[derive(Debug, thiserror::Error)]
#[error("store error: {0}")]
pub struct StoreError(pub String);

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError(e.to_string())
    }
}

/// Read/delete access to persisted push subscriptions.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Every subscription belonging to any of the given users.
    async fn list_for_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<PushSubscription>, StoreError>;

    /// Delete one subscription. Returns `false` when the row was already
    /// gone — concurrent scans pruning the same endpoint are expected and
    /// must not error.
    async fn delete(&self, id: SubscriptionId) -> Result<bool, StoreError>;
}

/// Read access to stored preference flags.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// The user's stored flags, or `None` when no row exists.
    async fn flags(&self, user_id: UserId) -> Result<Option<PreferenceFlags>, StoreError>;
}

/// Postgres-backed [`SubscriptionStore`].
pub struct PgSubscriptionStore {
    pool: DbPool,
}

impl PgSubscriptionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    async fn list_for_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<PushSubscription>, StoreError> {
        Ok(PushSubscriptionRepo::list_for_users(&self.pool, user_ids).await?)
    }

    async fn delete(&self, id: SubscriptionId) -> Result<bool, StoreError> {
        Ok(PushSubscriptionRepo::delete_by_id(&self.pool, id).await?)
    }
}

/// Postgres-backed [`PreferenceStore`].
pub struct PgPreferenceStore {
    pool: DbPool,
}

impl PgPreferenceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PreferenceStore for PgPreferenceStore {
    async fn flags(&self, user_id: UserId) -> Result<Option<PreferenceFlags>, StoreError> {
        let row = NotificationPreferenceRepo::get(&self.pool, user_id).await?;
        Ok(row.map(|r| r.flags()))
    }
}
