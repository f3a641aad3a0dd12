//! VAPID server identification (RFC 8292).
//!
//! The application server owns one P-256 key pair. Every delivery carries
//! an `Authorization: vapid t=<jwt>, k=<public key>` header whose JWT is
//! signed with that pair and scoped to the push service's origin, so push
//! services can attribute and rate-limit senders.

use chrono::Duration;
use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};
use peyk_core::types::Timestamp;

use crate::b64;
use crate::error::PushError;

/// Token validity window. Push services reject anything over 24 h; tokens
/// are generated fresh per delivery and never persisted.
const TOKEN_VALIDITY_HOURS: i64 = 12;

/// The server's VAPID key pair plus the contact subject.
///
/// Parsing happens once at construction, so a malformed key is caught at
/// startup — before any dispatch call — rather than per delivery.
#[derive(Clone)]
pub struct VapidKeys {
    signing_key: SigningKey,
    public_key_b64: String,
    subject: String,
}

impl std::fmt::Debug for VapidKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the private scalar.
        f.debug_struct("VapidKeys")
            .field("public_key", &self.public_key_b64)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

impl VapidKeys {
    /// Parse a base64url-encoded 32-byte P-256 private scalar.
    ///
    /// `subject` is the `sub` claim, a `mailto:` or `https:` contact URI
    /// the push service can use to reach the operator.
    pub fn from_base64(private_b64: &str, subject: impl Into<String>) -> Result<Self, PushError> {
        let bytes = b64::decode(private_b64)
            .map_err(|e| PushError::Config(format!("VAPID private key is not base64url: {e}")))?;
        let signing_key = SigningKey::from_slice(&bytes)
            .map_err(|e| PushError::Config(format!("VAPID private key is not a P-256 scalar: {e}")))?;
        let public_point = signing_key.verifying_key().to_encoded_point(false);

        Ok(Self {
            public_key_b64: b64::encode(public_point.as_bytes()),
            signing_key,
            subject: subject.into(),
        })
    }

    /// Load `VAPID_PRIVATE_KEY` / `VAPID_SUBJECT` from the environment.
    pub fn from_env() -> Result<Self, PushError> {
        let private = std::env::var("VAPID_PRIVATE_KEY")
            .map_err(|_| PushError::Config("VAPID_PRIVATE_KEY is not set".into()))?;
        let subject = std::env::var("VAPID_SUBJECT")
            .map_err(|_| PushError::Config("VAPID_SUBJECT is not set".into()))?;
        Self::from_base64(&private, subject)
    }

    /// The uncompressed public key, base64url-encoded (the `k` parameter,
    /// also what browsers receive as `applicationServerKey`).
    pub fn public_key_b64(&self) -> &str {
        &self.public_key_b64
    }

    /// Build the `Authorization` header value for one delivery to a push
    /// service at `origin` (e.g. `https://fcm.googleapis.com`).
    pub fn authorization(&self, origin: &str, now: Timestamp) -> String {
        let header = b64::encode(r#"{"typ":"JWT","alg":"ES256"}"#);
        let exp = (now + Duration::hours(TOKEN_VALIDITY_HOURS)).timestamp();
        let claims = b64::encode(
            serde_json::json!({
                "aud": origin,
                "exp": exp,
                "sub": self.subject,
            })
            .to_string(),
        );

        let signing_input = format!("{header}.{claims}");
        let signature: Signature = self.signing_key.sign(signing_input.as_bytes());
        let token = format!("{signing_input}.{}", b64::encode(signature.to_bytes()));

        format!("vapid t={token}, k={}", self.public_key_b64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use p256::ecdsa::signature::Verifier;

    fn test_keys() -> VapidKeys {
        let private = SigningKey::random(&mut rand_core::OsRng);
        VapidKeys::from_base64(&b64::encode(private.to_bytes()), "mailto:ops@peyk.app").unwrap()
    }

    fn fixed_now() -> Timestamp {
        chrono::Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = VapidKeys::from_base64("not-valid!", "mailto:ops@peyk.app").unwrap_err();
        assert!(matches!(err, PushError::Config(_)));
    }

    #[test]
    fn wrong_length_key_is_a_config_error() {
        let err = VapidKeys::from_base64(&b64::encode([1u8; 7]), "mailto:ops@peyk.app").unwrap_err();
        assert!(matches!(err, PushError::Config(_)));
    }

    #[test]
    fn header_shape_and_claims() {
        let keys = test_keys();
        let header = keys.authorization("https://fcm.googleapis.com", fixed_now());

        let token = header
            .strip_prefix("vapid t=")
            .and_then(|rest| rest.split(", k=").next())
            .expect("header should be 'vapid t=<jwt>, k=<key>'");
        assert!(header.ends_with(keys.public_key_b64()));

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);

        let claims: serde_json::Value =
            serde_json::from_slice(&b64::decode(parts[1]).unwrap()).unwrap();
        assert_eq!(claims["aud"], "https://fcm.googleapis.com");
        assert_eq!(claims["sub"], "mailto:ops@peyk.app");
        // exp = now + 12h
        assert_eq!(claims["exp"], fixed_now().timestamp() + 12 * 3600);
    }

    #[test]
    fn signature_verifies_against_the_public_key() {
        let keys = test_keys();
        let header = keys.authorization("https://updates.push.services.mozilla.com", fixed_now());
        let token = header.strip_prefix("vapid t=").unwrap().split(", k=").next().unwrap();

        let (signing_input, sig_b64) = token.rsplit_once('.').unwrap();
        let sig_bytes = b64::decode(sig_b64).unwrap();
        let signature = Signature::from_slice(&sig_bytes).unwrap();

        let public_bytes = b64::decode(keys.public_key_b64()).unwrap();
        let verifying_key =
            p256::ecdsa::VerifyingKey::from_sec1_bytes(&public_bytes).unwrap();
        verifying_key
            .verify(signing_input.as_bytes(), &signature)
            .expect("ES256 signature should verify");
    }
}
