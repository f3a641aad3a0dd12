//! Event sources.
//!
//! Each scanner runs as one cold, short-lived invocation on an external
//! schedule: it queries the domain tables, computes "who should be told
//! what", and hands fully formed messages plus recipient sets to the
//! [`Dispatcher`](peyk_push::Dispatcher). Scanners are idempotent rescans
//! — a delivery missed today is retried naturally by tomorrow's pass, so
//! none of them implement their own retry.

use peyk_push::{DispatchReport, PushError};

pub mod calendar_reminder;
pub mod comment;
pub mod daily_agenda;
mod grouping;
pub mod overdue;
pub mod project_deadline;
pub mod task_due;

/// Why a scan stopped early.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Push(#[from] PushError),
}

/// Aggregated result of one scan invocation.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Dispatch calls performed (one per grouped message).
    pub messages: usize,
    pub sent: usize,
    pub failed: usize,
    pub removed_expired: usize,
}

impl ScanSummary {
    /// Fold one dispatch report into the running totals.
    pub fn absorb(&mut self, report: &DispatchReport) {
        self.messages += 1;
        self.sent += report.sent;
        self.failed += report.failed;
        self.removed_expired += report.removed_expired;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_accumulates_counts() {
        let mut summary = ScanSummary::default();
        let mut report = DispatchReport::default();
        report.sent = 2;
        report.failed = 1;
        report.removed_expired = 1;

        summary.absorb(&report);
        summary.absorb(&DispatchReport::default());

        assert_eq!(summary.messages, 2);
        assert_eq!(summary.sent, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.removed_expired, 1);
    }
}
