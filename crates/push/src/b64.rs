//! URL-safe base64 (no padding) helpers.
//!
//! Every binary field in the Web Push wire formats — subscription key
//! material, VAPID JWTs, public keys in headers — uses this encoding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Encode bytes as unpadded URL-safe base64.
pub fn encode(data: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode unpadded URL-safe base64.
///
/// Some clients store padded values; trailing `=` is tolerated.
pub fn decode(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(data.trim_end_matches('='))
}
