//! Web Push delivery core.
//!
//! The pipeline, leaf-first:
//!
//! - [`vapid::VapidKeys`] — server key pair, VAPID authorization headers
//!   (RFC 8292).
//! - [`encrypt`] — payload encryption per the Web Push message encryption
//!   scheme (RFC 8291, `aes128gcm` content coding from RFC 8188).
//! - [`request`] — per-subscription delivery request builder.
//! - [`transport::PushTransport`] — the HTTP seam to the browser vendors'
//!   push services, with a reqwest implementation.
//! - [`store`] — subscription/preference store seams plus the Postgres
//!   implementations.
//! - [`dispatcher::Dispatcher`] — the orchestration core: preference
//!   filtering, concurrent fan-out, outcome classification, and expired
//!   subscription cleanup.

pub mod b64;
pub mod dispatcher;
pub mod encrypt;
pub mod error;
pub mod request;
pub mod store;
pub mod transport;
pub mod vapid;

pub use dispatcher::{DeliveryOutcome, DispatchReport, Dispatcher, SubscriptionResult};
pub use error::PushError;
pub use request::{build_delivery_request, DeliveryRequest};
pub use store::{
    PgPreferenceStore, PgSubscriptionStore, PreferenceStore, StoreError, SubscriptionStore,
};
pub use transport::{PushTransport, ReqwestTransport, TransportError};
pub use vapid::VapidKeys;
