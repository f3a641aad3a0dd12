//! Calendar reminder scanner: events starting within the next hour,
//! grouped per owner.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use peyk_core::types::UserId;
use peyk_core::{NotificationCategory, NotificationMessage};
use peyk_db::models::UpcomingEvent;
use peyk_db::repositories::CalendarEventRepo;
use peyk_db::DbPool;
use peyk_push::Dispatcher;

use crate::grouping::title_preview;
use crate::{ScanError, ScanSummary};

/// Look-ahead window in minutes. The scheduler runs this scan at the same
/// cadence so each event lands in exactly one window.
const WINDOW_MINUTES: i64 = 60;

/// Scan for imminent events and remind their owners.
pub async fn run(pool: &DbPool, dispatcher: &Dispatcher) -> Result<ScanSummary, ScanError> {
    let now = Utc::now();
    let until = now + Duration::minutes(WINDOW_MINUTES);
    let events = CalendarEventRepo::list_starting_between(pool, now, until).await?;

    let mut summary = ScanSummary::default();
    for (owner, events) in by_owner(events) {
        let message = message_for(&events);
        match dispatcher.dispatch(&message, &[owner]).await {
            Ok(report) => summary.absorb(&report),
            Err(e) => {
                tracing::error!(user_id = %owner, error = %e, "Calendar reminder dispatch failed");
            }
        }
    }

    tracing::info!(
        messages = summary.messages,
        sent = summary.sent,
        "Calendar reminder scan complete"
    );
    Ok(summary)
}

fn by_owner(events: Vec<UpcomingEvent>) -> BTreeMap<UserId, Vec<UpcomingEvent>> {
    let mut grouped: BTreeMap<UserId, Vec<UpcomingEvent>> = BTreeMap::new();
    for event in events {
        grouped.entry(event.user_id).or_default().push(event);
    }
    grouped
}

fn message_for(events: &[UpcomingEvent]) -> NotificationMessage {
    let body = if events.len() == 1 {
        format!(
            "\"{}\" starts at {}.",
            events[0].title,
            format_time(events[0].starts_at)
        )
    } else {
        format!(
            "{} events in the next hour: {}",
            events.len(),
            title_preview(events.iter().map(|e| e.title.as_str()), 3)
        )
    };

    NotificationMessage::new("Upcoming event", body, NotificationCategory::Calendar)
        .with_url("/dashboard/calendar")
}

fn format_time(at: DateTime<Utc>) -> String {
    at.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn event(user: UserId, title: &str, starts_at: DateTime<Utc>) -> UpcomingEvent {
        UpcomingEvent {
            id: Uuid::new_v4(),
            user_id: user,
            title: title.into(),
            starts_at,
        }
    }

    #[test]
    fn single_event_names_time() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 14, 30, 0).unwrap();
        let msg = message_for(&[event(Uuid::new_v4(), "Standup", at)]);
        assert_eq!(msg.body, "\"Standup\" starts at 14:30.");
        assert_eq!(msg.category, NotificationCategory::Calendar);
    }

    #[test]
    fn several_events_are_summarized() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 14, 0, 0).unwrap();
        let user = Uuid::new_v4();
        let events = vec![event(user, "a", at), event(user, "b", at)];
        let msg = message_for(&events);
        assert_eq!(msg.body, "2 events in the next hour: a, b");
    }

    #[test]
    fn grouping_is_per_owner() {
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());
        let at = Utc::now();
        let grouped = by_owner(vec![event(u1, "a", at), event(u2, "b", at), event(u1, "c", at)]);
        assert_eq!(grouped[&u1].len(), 2);
        assert_eq!(grouped[&u2].len(), 1);
    }
}
