//! Row models and DTOs.

pub mod calendar_event;
pub mod notification_preference;
pub mod project;
pub mod push_subscription;
pub mod task;

pub use calendar_event::UpcomingEvent;
pub use notification_preference::{NotificationPreference, UpdatePreferences};
pub use project::DeadlineProject;
pub use push_subscription::{PushSubscription, UpsertSubscription};
pub use task::DueTask;
