//! Error taxonomy for the delivery core.

use crate::store::StoreError;

/// Errors that abort a dispatch call or a single request build.
///
/// Transport-level failures are deliberately NOT represented here: they
/// are per-subscription outcomes (see
/// [`DeliveryOutcome`](crate::dispatcher::DeliveryOutcome)), never an
/// `Err` from `dispatch`.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// Missing or malformed server key pair. Fatal: no deliveries are
    /// attempted until the configuration is fixed.
    #[error("VAPID configuration error: {0}")]
    Config(String),

    /// A subscription row carries undecodable key material or an invalid
    /// endpoint URL. Scoped to that one subscription.
    #[error("invalid subscription record: {0}")]
    Subscription(String),

    /// Payload encryption failed.
    #[error("payload encryption failed: {0}")]
    Encryption(String),

    /// The subscription or preference store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
