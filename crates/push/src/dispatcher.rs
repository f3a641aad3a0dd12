//! The notification dispatcher.
//!
//! Orchestrates one fan-out: resolve the recipient set against stored
//! preferences, load every surviving recipient's subscriptions, build and
//! send one signed+encrypted request per subscription concurrently,
//! classify each outcome, and prune subscriptions the push service has
//! declared permanently gone.

use std::collections::HashSet;
use std::sync::Arc;

use peyk_core::prefs::should_notify;
use peyk_core::types::{SubscriptionId, UserId};
use peyk_core::NotificationMessage;
use peyk_db::models::PushSubscription;
use peyk_db::DbPool;

use crate::error::PushError;
use crate::request::build_delivery_request;
use crate::store::{PgPreferenceStore, PgSubscriptionStore, PreferenceStore, SubscriptionStore};
use crate::transport::{PushTransport, ReqwestTransport, TransportError};
use crate::vapid::VapidKeys;

// ---------------------------------------------------------------------------
// Outcomes and report
// ---------------------------------------------------------------------------

/// What happened to one delivery attempt.
///
/// Closed set so call sites must handle every case instead of
/// string-matching status codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The push service accepted the message (2xx).
    Delivered,
    /// Might succeed on a future scan: network error, timeout, 5xx, or an
    /// unexpected 4xx. The subscription is preserved.
    TransientFailure { detail: String },
    /// The push service declared the endpoint permanently gone (404/410).
    /// The subscription is deleted.
    TerminalFailure { detail: String },
}

/// Outcome of one subscription's delivery attempt.
#[derive(Debug, Clone)]
pub struct SubscriptionResult {
    pub subscription_id: SubscriptionId,
    pub endpoint: String,
    pub outcome: DeliveryOutcome,
}

/// Exact counts for one dispatch call.
///
/// `removed_expired` counts terminal failures seen by THIS call; a
/// concurrent call racing on the same endpoint reports its own terminal
/// outcome even when the row was already deleted.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
    pub removed_expired: usize,
    pub results: Vec<SubscriptionResult>,
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// The orchestration core.
///
/// All collaborators are injected: no global HTTP client, no cached key
/// pair, no hidden cross-invocation state. Construction is cheap — build
/// one per invocation.
pub struct Dispatcher {
    subscriptions: Arc<dyn SubscriptionStore>,
    preferences: Arc<dyn PreferenceStore>,
    transport: Arc<dyn PushTransport>,
    keys: VapidKeys,
}

impl Dispatcher {
    /// Assemble a dispatcher from explicit collaborators.
    pub fn new(
        subscriptions: Arc<dyn SubscriptionStore>,
        preferences: Arc<dyn PreferenceStore>,
        transport: Arc<dyn PushTransport>,
        keys: VapidKeys,
    ) -> Self {
        Self {
            subscriptions,
            preferences,
            transport,
            keys,
        }
    }

    /// Production wiring: Postgres stores and the reqwest transport.
    pub fn postgres(pool: DbPool, keys: VapidKeys) -> Self {
        Self::new(
            Arc::new(PgSubscriptionStore::new(pool.clone())),
            Arc::new(PgPreferenceStore::new(pool)),
            Arc::new(ReqwestTransport::new()),
            keys,
        )
    }

    /// Fan one message out to every subscription of every recipient that
    /// passes the preference filter.
    ///
    /// Deliveries are independent: one failure never aborts the rest. An
    /// empty recipient set, recipients filtered out by preference, and
    /// recipients without subscriptions all yield a zero-count `Ok`.
    pub async fn dispatch(
        &self,
        message: &NotificationMessage,
        recipients: &[UserId],
    ) -> Result<DispatchReport, PushError> {
        if recipients.is_empty() {
            return Ok(DispatchReport::default());
        }

        let surviving = self.filter_recipients(message, recipients).await?;
        if surviving.is_empty() {
            tracing::debug!(
                category = %message.category,
                "All recipients filtered out by preference"
            );
            return Ok(DispatchReport::default());
        }

        let subscriptions = self.subscriptions.list_for_users(&surviving).await?;
        if subscriptions.is_empty() {
            return Ok(DispatchReport::default());
        }

        // One future per subscription; no shared mutable counters.
        let results = futures::future::join_all(
            subscriptions
                .iter()
                .map(|sub| self.deliver_one(message, sub)),
        )
        .await;

        let mut report = DispatchReport::default();
        for result in results {
            match &result.outcome {
                DeliveryOutcome::Delivered => report.sent += 1,
                DeliveryOutcome::TransientFailure { detail } => {
                    report.failed += 1;
                    tracing::warn!(
                        subscription_id = %result.subscription_id,
                        endpoint = %result.endpoint,
                        detail = %detail,
                        "Push delivery failed (transient)"
                    );
                }
                DeliveryOutcome::TerminalFailure { .. } => {
                    report.failed += 1;
                    report.removed_expired += 1;
                }
            }
            report.results.push(result);
        }

        tracing::info!(
            category = %message.category,
            sent = report.sent,
            failed = report.failed,
            removed_expired = report.removed_expired,
            "Dispatch complete"
        );
        Ok(report)
    }

    /// Deduplicate the recipient set and drop users whose preferences
    /// exclude this message's category. Dropped users were never
    /// attempted, so they appear nowhere in the report.
    async fn filter_recipients(
        &self,
        message: &NotificationMessage,
        recipients: &[UserId],
    ) -> Result<Vec<UserId>, PushError> {
        let mut seen = HashSet::with_capacity(recipients.len());
        let mut surviving = Vec::with_capacity(recipients.len());

        for &user_id in recipients {
            if !seen.insert(user_id) {
                continue;
            }
            let flags = self.preferences.flags(user_id).await?;
            if should_notify(flags.as_ref(), message.category) {
                surviving.push(user_id);
            }
        }
        Ok(surviving)
    }

    /// Build, send, and classify one delivery; prune on terminal failure.
    async fn deliver_one(
        &self,
        message: &NotificationMessage,
        subscription: &PushSubscription,
    ) -> SubscriptionResult {
        let outcome = match build_delivery_request(message, subscription, &self.keys) {
            Ok(request) => classify(self.transport.post(&request).await),
            // Undecodable key material on this row; the row stays (the
            // next scan will hit the same error, which keeps it visible
            // in the logs until someone re-subscribes or cleans up).
            Err(e) => DeliveryOutcome::TransientFailure {
                detail: e.to_string(),
            },
        };

        if let DeliveryOutcome::TerminalFailure { detail } = &outcome {
            match self.subscriptions.delete(subscription.id).await {
                Ok(existed) => {
                    tracing::info!(
                        subscription_id = %subscription.id,
                        endpoint = %subscription.endpoint,
                        detail = %detail,
                        already_removed = !existed,
                        "Pruned expired push subscription"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        subscription_id = %subscription.id,
                        error = %e,
                        "Failed to prune expired push subscription"
                    );
                }
            }
        }

        SubscriptionResult {
            subscription_id: subscription.id,
            endpoint: subscription.endpoint.clone(),
            outcome,
        }
    }
}

/// Map a transport result onto the closed outcome set.
fn classify(result: Result<u16, TransportError>) -> DeliveryOutcome {
    match result {
        Ok(status) if (200..300).contains(&status) => DeliveryOutcome::Delivered,
        Ok(status @ (404 | 410)) => DeliveryOutcome::TerminalFailure {
            detail: format!("HTTP {status}: endpoint gone"),
        },
        Ok(status) => DeliveryOutcome::TransientFailure {
            detail: format!("HTTP {status}"),
        },
        Err(e) => DeliveryOutcome::TransientFailure {
            detail: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_2xx_as_delivered() {
        assert_eq!(classify(Ok(200)), DeliveryOutcome::Delivered);
        assert_eq!(classify(Ok(201)), DeliveryOutcome::Delivered);
        assert_eq!(classify(Ok(204)), DeliveryOutcome::Delivered);
    }

    #[test]
    fn classify_gone_endpoints_as_terminal() {
        assert!(matches!(
            classify(Ok(404)),
            DeliveryOutcome::TerminalFailure { .. }
        ));
        assert!(matches!(
            classify(Ok(410)),
            DeliveryOutcome::TerminalFailure { .. }
        ));
    }

    #[test]
    fn classify_other_statuses_as_transient() {
        for status in [400, 401, 413, 429, 500, 502] {
            assert!(
                matches!(
                    classify(Ok(status)),
                    DeliveryOutcome::TransientFailure { .. }
                ),
                "HTTP {status} should be transient"
            );
        }
    }

    #[test]
    fn classify_network_errors_as_transient() {
        assert!(matches!(
            classify(Err(TransportError::Timeout)),
            DeliveryOutcome::TransientFailure { .. }
        ));
        assert!(matches!(
            classify(Err(TransportError::Network("reset".into()))),
            DeliveryOutcome::TransientFailure { .. }
        ));
    }
}
