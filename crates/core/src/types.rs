/// Users and subscriptions are keyed by UUIDs issued by the data store.
pub type UserId = uuid::Uuid;

/// Push subscription primary key.
pub type SubscriptionId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
