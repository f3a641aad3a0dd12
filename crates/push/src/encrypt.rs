//! Web Push payload encryption (RFC 8291).
//!
//! The payload is never sent to the push service in plaintext. Each
//! delivery performs an ECDH agreement between a fresh ephemeral P-256 key
//! and the subscription's `p256dh` key, mixes in the subscription's `auth`
//! secret through an HKDF-SHA256 chain, and encrypts with AES-128-GCM
//! using the `aes128gcm` content coding (RFC 8188). The entire scheme is
//! a pure function of (plaintext, subscription keys, ephemeral key, salt);
//! only the ephemeral key and salt generation touch the RNG.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Nonce};
use hkdf::Hkdf;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{PublicKey, SecretKey};
use rand_core::{OsRng, RngCore};
use sha2::Sha256;

use crate::b64;
use crate::error::PushError;

/// Record size written into the `aes128gcm` header. A notification payload
/// always fits in a single record.
const RECORD_SIZE: u32 = 4096;

/// Length of the subscription's `auth` secret.
const AUTH_SECRET_LEN: usize = 16;

/// Length of an uncompressed P-256 public key (the `keyid` field).
const PUBLIC_KEY_LEN: usize = 65;

const IKM_INFO_PREFIX: &[u8] = b"WebPush: info\0";
const CEK_INFO: &[u8] = b"Content-Encoding: aes128gcm\0";
const NONCE_INFO: &[u8] = b"Content-Encoding: nonce\0";

/// Encrypt `plaintext` for the subscription identified by its base64url
/// `p256dh` and `auth` values, producing the full `aes128gcm` body
/// (header || ciphertext) to POST to the push service.
pub fn encrypt(plaintext: &[u8], p256dh_b64: &str, auth_b64: &str) -> Result<Vec<u8>, PushError> {
    let ephemeral = SecretKey::random(&mut OsRng);
    let mut salt = [0u8; 16];
    OsRng.fill_bytes(&mut salt);
    encrypt_with(plaintext, p256dh_b64, auth_b64, &ephemeral, &salt)
}

/// Deterministic core of [`encrypt`], with the ephemeral key and salt
/// supplied by the caller.
pub fn encrypt_with(
    plaintext: &[u8],
    p256dh_b64: &str,
    auth_b64: &str,
    ephemeral: &SecretKey,
    salt: &[u8; 16],
) -> Result<Vec<u8>, PushError> {
    let ua_public = decode_p256dh(p256dh_b64)?;
    let auth_secret = decode_auth(auth_b64)?;

    let shared = p256::ecdh::diffie_hellman(ephemeral.to_nonzero_scalar(), ua_public.as_affine());
    let as_public_point = ephemeral.public_key().to_encoded_point(false);
    let ua_public_point = ua_public.to_encoded_point(false);

    // IKM = HKDF(salt=auth, ikm=ecdh, info="WebPush: info" || 0x00 || ua_pub || as_pub)
    let mut ikm_info = Vec::with_capacity(IKM_INFO_PREFIX.len() + 2 * PUBLIC_KEY_LEN);
    ikm_info.extend_from_slice(IKM_INFO_PREFIX);
    ikm_info.extend_from_slice(ua_public_point.as_bytes());
    ikm_info.extend_from_slice(as_public_point.as_bytes());

    let mut ikm = [0u8; 32];
    Hkdf::<Sha256>::new(Some(&auth_secret), shared.raw_secret_bytes().as_slice())
        .expand(&ikm_info, &mut ikm)
        .map_err(|e| PushError::Encryption(format!("HKDF ikm expand: {e}")))?;

    // CEK and nonce from the freshly salted second stage.
    let hk = Hkdf::<Sha256>::new(Some(salt), &ikm);
    let mut cek = [0u8; 16];
    hk.expand(CEK_INFO, &mut cek)
        .map_err(|e| PushError::Encryption(format!("HKDF cek expand: {e}")))?;
    let mut nonce = [0u8; 12];
    hk.expand(NONCE_INFO, &mut nonce)
        .map_err(|e| PushError::Encryption(format!("HKDF nonce expand: {e}")))?;

    // Single record: plaintext followed by the last-record delimiter.
    let mut record = Vec::with_capacity(plaintext.len() + 1);
    record.extend_from_slice(plaintext);
    record.push(0x02);

    let cipher = Aes128Gcm::new_from_slice(&cek)
        .map_err(|e| PushError::Encryption(format!("AES key: {e}")))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), record.as_slice())
        .map_err(|e| PushError::Encryption(format!("AES-GCM: {e}")))?;

    // aes128gcm header: salt (16) || rs (4, BE) || idlen (1) || keyid.
    let mut body = Vec::with_capacity(16 + 4 + 1 + PUBLIC_KEY_LEN + ciphertext.len());
    body.extend_from_slice(salt);
    body.extend_from_slice(&RECORD_SIZE.to_be_bytes());
    body.push(PUBLIC_KEY_LEN as u8);
    body.extend_from_slice(as_public_point.as_bytes());
    body.extend_from_slice(&ciphertext);
    Ok(body)
}

fn decode_p256dh(p256dh_b64: &str) -> Result<PublicKey, PushError> {
    let bytes = b64::decode(p256dh_b64)
        .map_err(|e| PushError::Subscription(format!("p256dh is not base64url: {e}")))?;
    PublicKey::from_sec1_bytes(&bytes)
        .map_err(|e| PushError::Subscription(format!("p256dh is not a P-256 point: {e}")))
}

fn decode_auth(auth_b64: &str) -> Result<[u8; AUTH_SECRET_LEN], PushError> {
    let bytes = b64::decode(auth_b64)
        .map_err(|e| PushError::Subscription(format!("auth is not base64url: {e}")))?;
    bytes.try_into().map_err(|_| {
        PushError::Subscription(format!("auth secret must be {AUTH_SECRET_LEN} bytes"))
    })
}
