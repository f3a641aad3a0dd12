//! Per-subscription delivery request builder.

use chrono::Utc;
use peyk_core::NotificationMessage;
use peyk_db::models::PushSubscription;

use crate::encrypt;
use crate::error::PushError;
use crate::vapid::VapidKeys;

/// How long the push service may hold an undelivered message.
const DEFAULT_TTL_SECS: u32 = 86_400;

/// One ready-to-send HTTP POST: the signed authorization, the encrypted
/// body, and the push-service endpoint to deliver it to.
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    pub endpoint: String,
    pub authorization: String,
    pub ttl_secs: u32,
    pub body: Vec<u8>,
}

/// Serialize, encrypt, and sign one message for one subscription.
///
/// Stateless apart from RNG use inside the encryptor; errors are scoped to
/// this subscription (the server key pair was already validated when
/// `keys` was constructed).
pub fn build_delivery_request(
    message: &NotificationMessage,
    subscription: &PushSubscription,
    keys: &VapidKeys,
) -> Result<DeliveryRequest, PushError> {
    let now = Utc::now();

    let url = reqwest::Url::parse(&subscription.endpoint)
        .map_err(|e| PushError::Subscription(format!("endpoint is not a URL: {e}")))?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(PushError::Subscription(format!(
            "endpoint has no usable origin: {}",
            subscription.endpoint
        )));
    }

    let payload = serde_json::to_vec(&message.wire_payload(now))
        .map_err(|e| PushError::Encryption(format!("payload serialization: {e}")))?;
    let body = encrypt::encrypt(&payload, &subscription.p256dh, &subscription.auth)?;

    Ok(DeliveryRequest {
        endpoint: subscription.endpoint.clone(),
        authorization: keys.authorization(&origin.ascii_serialization(), now),
        ttl_secs: DEFAULT_TTL_SECS,
        body,
    })
}
