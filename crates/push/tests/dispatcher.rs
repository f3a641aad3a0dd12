//! Dispatcher fan-out behavior with fake stores and a scripted transport.
//!
//! Covers the delivery-independence, preference-gating, cleanup-idempotence,
//! and empty-input contracts of `Dispatcher::dispatch`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::SecretKey;
use peyk_core::prefs::PreferenceFlags;
use peyk_core::types::{SubscriptionId, UserId};
use peyk_core::{NotificationCategory, NotificationMessage};
use peyk_db::models::PushSubscription;
use peyk_push::{
    b64, DeliveryOutcome, Dispatcher, PreferenceStore, PushTransport, StoreError,
    SubscriptionStore, TransportError, VapidKeys,
};
use rand_core::OsRng;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// In-memory subscription store that records every call.
#[derive(Default)]
struct FakeSubscriptionStore {
    subs: Mutex<Vec<PushSubscription>>,
    list_calls: AtomicUsize,
    deleted: Mutex<Vec<SubscriptionId>>,
    /// When set, `delete` reports the row as already gone (simulates a
    /// concurrent scan having pruned it first).
    delete_finds_nothing: bool,
}

impl FakeSubscriptionStore {
    fn with_subs(subs: Vec<PushSubscription>) -> Self {
        Self {
            subs: Mutex::new(subs),
            ..Default::default()
        }
    }

    fn remaining_ids(&self) -> Vec<SubscriptionId> {
        self.subs.lock().unwrap().iter().map(|s| s.id).collect()
    }
}

#[async_trait]
impl SubscriptionStore for FakeSubscriptionStore {
    async fn list_for_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<PushSubscription>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .subs
            .lock()
            .unwrap()
            .iter()
            .filter(|s| user_ids.contains(&s.user_id))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: SubscriptionId) -> Result<bool, StoreError> {
        self.deleted.lock().unwrap().push(id);
        if self.delete_finds_nothing {
            return Ok(false);
        }
        let mut subs = self.subs.lock().unwrap();
        let before = subs.len();
        subs.retain(|s| s.id != id);
        Ok(subs.len() < before)
    }
}

/// In-memory preference store that records every lookup.
#[derive(Default)]
struct FakePreferenceStore {
    flags: HashMap<UserId, PreferenceFlags>,
    calls: AtomicUsize,
}

#[async_trait]
impl PreferenceStore for FakePreferenceStore {
    async fn flags(&self, user_id: UserId) -> Result<Option<PreferenceFlags>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.flags.get(&user_id).copied())
    }
}

/// Scripted per-endpoint transport responses.
enum Script {
    Status(u16),
    NetworkError,
}

#[derive(Default)]
struct ScriptedTransport {
    by_endpoint: HashMap<String, Script>,
}

#[async_trait]
impl PushTransport for ScriptedTransport {
    async fn post(&self, request: &peyk_push::DeliveryRequest) -> Result<u16, TransportError> {
        match self.by_endpoint.get(&request.endpoint) {
            Some(Script::Status(status)) => Ok(*status),
            Some(Script::NetworkError) => {
                Err(TransportError::Network("connection reset by peer".into()))
            }
            None => Ok(201),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_keys() -> VapidKeys {
    let private = p256::ecdsa::SigningKey::random(&mut OsRng);
    VapidKeys::from_base64(&b64::encode(private.to_bytes()), "mailto:ops@peyk.app").unwrap()
}

fn subscription(user_id: UserId, endpoint: &str) -> PushSubscription {
    let browser_key = SecretKey::random(&mut OsRng);
    PushSubscription {
        id: Uuid::new_v4(),
        user_id,
        endpoint: endpoint.into(),
        p256dh: b64::encode(browser_key.public_key().to_encoded_point(false).as_bytes()),
        auth: b64::encode([3u8; 16]),
        device_info: Some("firefox on linux".into()),
        created_at: Utc::now(),
    }
}

fn task_message() -> NotificationMessage {
    NotificationMessage::new("Task due", "Review the Q2 report", NotificationCategory::Task)
}

fn dispatcher(
    subs: Arc<FakeSubscriptionStore>,
    prefs: Arc<FakePreferenceStore>,
    transport: ScriptedTransport,
) -> Dispatcher {
    Dispatcher::new(subs, prefs, Arc::new(transport), test_keys())
}

// ---------------------------------------------------------------------------
// Empty input
// ---------------------------------------------------------------------------

/// An empty recipient set returns a zero report without touching any store.
#[tokio::test]
async fn empty_recipient_set_is_a_zero_report_with_no_store_access() {
    let subs = Arc::new(FakeSubscriptionStore::default());
    let prefs = Arc::new(FakePreferenceStore::default());
    let d = dispatcher(Arc::clone(&subs), Arc::clone(&prefs), ScriptedTransport::default());

    let report = d.dispatch(&task_message(), &[]).await.unwrap();

    assert_eq!(report.sent, 0);
    assert_eq!(report.failed, 0);
    assert_eq!(report.removed_expired, 0);
    assert!(report.results.is_empty());
    assert_eq!(prefs.calls.load(Ordering::SeqCst), 0);
    assert_eq!(subs.list_calls.load(Ordering::SeqCst), 0);
}

/// A recipient with no subscriptions is skipped, not an error.
#[tokio::test]
async fn recipient_without_subscriptions_yields_zero_report() {
    let subs = Arc::new(FakeSubscriptionStore::default());
    let prefs = Arc::new(FakePreferenceStore::default());
    let d = dispatcher(subs, prefs, ScriptedTransport::default());

    let report = d.dispatch(&task_message(), &[Uuid::new_v4()]).await.unwrap();

    assert_eq!((report.sent, report.failed, report.removed_expired), (0, 0, 0));
}

// ---------------------------------------------------------------------------
// Preference gating
// ---------------------------------------------------------------------------

/// An opted-out recipient is dropped before any delivery attempt and is
/// not counted as a failure.
#[tokio::test]
async fn opted_out_recipient_is_filtered_not_failed() {
    let user = Uuid::new_v4();
    let subs = Arc::new(FakeSubscriptionStore::with_subs(vec![subscription(
        user,
        "https://push.example/a",
    )]));
    let mut prefs = FakePreferenceStore::default();
    prefs.flags.insert(
        user,
        PreferenceFlags {
            task: Some(false),
            ..Default::default()
        },
    );
    let d = dispatcher(Arc::clone(&subs), Arc::new(prefs), ScriptedTransport::default());

    let report = d.dispatch(&task_message(), &[user]).await.unwrap();

    assert_eq!((report.sent, report.failed), (0, 0));
    assert!(report.results.is_empty());
    // The subscription store was never consulted for a fully filtered set.
    assert_eq!(subs.list_calls.load(Ordering::SeqCst), 0);
}

/// Financial messages are not delivered without an explicit opt-in.
#[tokio::test]
async fn financial_defaults_to_no_delivery() {
    let user = Uuid::new_v4();
    let subs = Arc::new(FakeSubscriptionStore::with_subs(vec![subscription(
        user,
        "https://push.example/a",
    )]));
    let d = dispatcher(subs, Arc::new(FakePreferenceStore::default()), ScriptedTransport::default());

    let msg = NotificationMessage::new("Invoice paid", "…", NotificationCategory::Financial);
    let report = d.dispatch(&msg, &[user]).await.unwrap();

    assert_eq!((report.sent, report.failed), (0, 0));
}

/// A general-category message reaches a user who disabled every specific
/// category.
#[tokio::test]
async fn general_category_bypasses_all_opt_outs() {
    let user = Uuid::new_v4();
    let subs = Arc::new(FakeSubscriptionStore::with_subs(vec![subscription(
        user,
        "https://push.example/a",
    )]));
    let mut prefs = FakePreferenceStore::default();
    prefs.flags.insert(
        user,
        PreferenceFlags {
            task: Some(false),
            project: Some(false),
            calendar: Some(false),
            financial: Some(false),
        },
    );
    let d = dispatcher(subs, Arc::new(prefs), ScriptedTransport::default());

    let msg = NotificationMessage::new("Maintenance tonight", "…", NotificationCategory::General);
    let report = d.dispatch(&msg, &[user]).await.unwrap();

    assert_eq!(report.sent, 1);
    assert_eq!(report.failed, 0);
}

/// Duplicate recipient ids fan out once.
#[tokio::test]
async fn duplicate_recipients_are_deduplicated() {
    let user = Uuid::new_v4();
    let subs = Arc::new(FakeSubscriptionStore::with_subs(vec![subscription(
        user,
        "https://push.example/a",
    )]));
    let prefs = Arc::new(FakePreferenceStore::default());
    let d = dispatcher(subs, Arc::clone(&prefs), ScriptedTransport::default());

    let report = d.dispatch(&task_message(), &[user, user, user]).await.unwrap();

    assert_eq!(report.sent, 1);
    assert_eq!(prefs.calls.load(Ordering::SeqCst), 1);
}

// ---------------------------------------------------------------------------
// Independent delivery and cleanup
// ---------------------------------------------------------------------------

/// Three subscriptions: 201, 410, network error. Exactly the 410 row is
/// pruned; the other failure keeps its row; the success is counted.
#[tokio::test]
async fn failures_are_independent_and_only_gone_endpoints_are_pruned() {
    let user = Uuid::new_v4();
    let ok = subscription(user, "https://push.example/ok");
    let gone = subscription(user, "https://push.example/gone");
    let flaky = subscription(user, "https://push.example/flaky");
    let (ok_id, gone_id, flaky_id) = (ok.id, gone.id, flaky.id);

    let subs = Arc::new(FakeSubscriptionStore::with_subs(vec![ok, gone, flaky]));
    let transport = ScriptedTransport {
        by_endpoint: HashMap::from([
            ("https://push.example/ok".to_string(), Script::Status(201)),
            ("https://push.example/gone".to_string(), Script::Status(410)),
            ("https://push.example/flaky".to_string(), Script::NetworkError),
        ]),
    };
    let d = dispatcher(Arc::clone(&subs), Arc::new(FakePreferenceStore::default()), transport);

    let report = d.dispatch(&task_message(), &[user]).await.unwrap();

    assert_eq!(report.sent, 1);
    assert_eq!(report.failed, 2);
    assert_eq!(report.removed_expired, 1);
    assert_eq!(report.results.len(), 3);

    let outcome_of = |id| {
        report
            .results
            .iter()
            .find(|r| r.subscription_id == id)
            .map(|r| r.outcome.clone())
            .unwrap()
    };
    assert_eq!(outcome_of(ok_id), DeliveryOutcome::Delivered);
    assert!(matches!(outcome_of(gone_id), DeliveryOutcome::TerminalFailure { .. }));
    assert!(matches!(outcome_of(flaky_id), DeliveryOutcome::TransientFailure { .. }));

    // Store state: only the gone endpoint was removed.
    let remaining = subs.remaining_ids();
    assert!(remaining.contains(&ok_id));
    assert!(remaining.contains(&flaky_id));
    assert!(!remaining.contains(&gone_id));
}

/// A 404 is terminal just like a 410.
#[tokio::test]
async fn http_404_prunes_the_subscription() {
    let user = Uuid::new_v4();
    let sub = subscription(user, "https://push.example/old");
    let sub_id = sub.id;
    let subs = Arc::new(FakeSubscriptionStore::with_subs(vec![sub]));
    let transport = ScriptedTransport {
        by_endpoint: HashMap::from([("https://push.example/old".to_string(), Script::Status(404))]),
    };
    let d = dispatcher(Arc::clone(&subs), Arc::new(FakePreferenceStore::default()), transport);

    let report = d.dispatch(&task_message(), &[user]).await.unwrap();

    assert_eq!((report.sent, report.failed, report.removed_expired), (0, 1, 1));
    assert!(!subs.remaining_ids().contains(&sub_id));
}

/// Racing with another scan: the row is already gone when we try to prune
/// it. The call still succeeds and still reports its own removal.
#[tokio::test]
async fn pruning_an_already_deleted_row_is_a_no_op() {
    let user = Uuid::new_v4();
    let sub = subscription(user, "https://push.example/gone");
    let sub_id = sub.id;
    let subs = Arc::new(FakeSubscriptionStore {
        subs: Mutex::new(vec![sub]),
        delete_finds_nothing: true,
        ..Default::default()
    });
    let transport = ScriptedTransport {
        by_endpoint: HashMap::from([("https://push.example/gone".to_string(), Script::Status(410))]),
    };
    let d = dispatcher(Arc::clone(&subs), Arc::new(FakePreferenceStore::default()), transport);

    let report = d.dispatch(&task_message(), &[user]).await.unwrap();

    assert_eq!(report.removed_expired, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(subs.deleted.lock().unwrap().as_slice(), &[sub_id]);
}

/// A row with undecodable key material fails that row only, without
/// pruning it or disturbing siblings.
#[tokio::test]
async fn corrupt_key_material_fails_only_that_subscription() {
    let user = Uuid::new_v4();
    let good = subscription(user, "https://push.example/good");
    let mut bad = subscription(user, "https://push.example/bad");
    bad.p256dh = "!!not-base64!!".into();
    let bad_id = bad.id;

    let subs = Arc::new(FakeSubscriptionStore::with_subs(vec![good, bad]));
    let d = dispatcher(
        Arc::clone(&subs),
        Arc::new(FakePreferenceStore::default()),
        ScriptedTransport::default(),
    );

    let report = d.dispatch(&task_message(), &[user]).await.unwrap();

    assert_eq!(report.sent, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.removed_expired, 0);
    assert!(subs.remaining_ids().contains(&bad_id));
}

/// Subscriptions of several recipients are all attempted in one call.
#[tokio::test]
async fn fans_out_across_recipients() {
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    let subs = Arc::new(FakeSubscriptionStore::with_subs(vec![
        subscription(alice, "https://push.example/a1"),
        subscription(alice, "https://push.example/a2"),
        subscription(bob, "https://push.example/b1"),
    ]));
    let d = dispatcher(subs, Arc::new(FakePreferenceStore::default()), ScriptedTransport::default());

    let report = d.dispatch(&task_message(), &[alice, bob]).await.unwrap();

    assert_eq!(report.sent, 3);
    assert_eq!(report.failed, 0);
}
