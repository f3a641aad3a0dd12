//! Scheduled scan runner.
//!
//! Invoked by cron with a single scan name; runs that one scan against the
//! database and exits. Keeping the scheduler outside the process means a
//! crashed scan only loses one invocation, never the schedule.
//!
//! ```text
//! peyk-worker <scan>
//!
//! scan: task-due | overdue | project-deadline | calendar-reminder | daily-agenda
//! ```

use peyk_push::{Dispatcher, VapidKeys};
use peyk_scanners::{calendar_reminder, daily_agenda, overdue, project_deadline, task_due};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: peyk-worker <task-due|overdue|project-deadline|calendar-reminder|daily-agenda>";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "peyk_worker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let scan = match std::env::args().nth(1) {
        Some(scan) => scan,
        None => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    let keys = match VapidKeys::from_env() {
        Ok(keys) => keys,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load VAPID keys");
            std::process::exit(1);
        }
    };

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = peyk_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    let dispatcher = Dispatcher::postgres(pool.clone(), keys);

    tracing::info!(scan = %scan, "Scan starting");
    let result = match scan.as_str() {
        "task-due" => task_due::run(&pool, &dispatcher).await,
        "overdue" => overdue::run(&pool, &dispatcher).await,
        "project-deadline" => project_deadline::run(&pool, &dispatcher).await,
        "calendar-reminder" => calendar_reminder::run(&pool, &dispatcher).await,
        "daily-agenda" => daily_agenda::run(&pool, &dispatcher).await,
        other => {
            tracing::error!(scan = %other, "Unknown scan");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    match result {
        Ok(summary) => {
            tracing::info!(
                scan = %scan,
                messages = summary.messages,
                sent = summary.sent,
                failed = summary.failed,
                removed_expired = summary.removed_expired,
                "Scan finished"
            );
        }
        Err(e) => {
            tracing::error!(scan = %scan, error = %e, "Scan failed");
            std::process::exit(1);
        }
    }
}
