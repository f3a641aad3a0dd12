//! Repository layer: unit structs with static async methods over `&PgPool`.

pub mod calendar_event_repo;
pub mod notification_preference_repo;
pub mod project_repo;
pub mod push_subscription_repo;
pub mod task_repo;

pub use calendar_event_repo::CalendarEventRepo;
pub use notification_preference_repo::NotificationPreferenceRepo;
pub use project_repo::ProjectRepo;
pub use push_subscription_repo::PushSubscriptionRepo;
pub use task_repo::TaskRepo;
