//! AES-256-GCM slot key sealing and opening.

use std::sync::Arc;

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng, Payload},
};
use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};

use courthub_core::config::SlotKeyConfig;
use courthub_core::error::{AppError, codes};

use super::payload::SlotKeyPayload;

const NONCE_LEN: usize = 12;
const ASSOCIATED_DATA: &[u8] = b"courthub:slot-key:v1";

/// Seals slot key payloads into opaque URL-safe tokens.
///
/// Token layout: base64url(nonce || ciphertext || tag), no padding.
#[derive(Clone)]
pub struct SlotKeyCodec {
    cipher: Arc<Aes256Gcm>,
    ttl: Duration,
}

impl std::fmt::Debug for SlotKeyCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotKeyCodec")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SlotKeyCodec {
    /// Build a codec from a raw 32-byte key.
    pub fn new(key: &[u8], ttl: Duration) -> Result<Self, AppError> {
        if key.len() != 32 {
            return Err(AppError::configuration(
                "Slot key secret must be exactly 32 bytes for AES-256-GCM",
            ));
        }
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| {
            AppError::configuration(format!("Failed to initialize slot key cipher: {e}"))
        })?;
        Ok(Self {
            cipher: Arc::new(cipher),
            ttl,
        })
    }

    /// Build a codec from the `[slot_key]` configuration section.
    pub fn from_config(config: &SlotKeyConfig) -> Result<Self, AppError> {
        let key = STANDARD.decode(config.secret.trim()).map_err(|e| {
            AppError::configuration(format!("Slot key secret is not valid base64: {e}"))
        })?;
        if config.ttl_minutes <= 0 {
            return Err(AppError::configuration("Slot key TTL must be positive"));
        }
        Self::new(&key, Duration::minutes(config.ttl_minutes))
    }

    /// Expiry for a key issued at `now`, in Unix seconds.
    pub fn expiry_from(&self, now: DateTime<Utc>) -> i64 {
        (now + self.ttl).timestamp()
    }

    /// Encrypt a payload into a token.
    pub fn seal(&self, payload: &SlotKeyPayload) -> Result<String, AppError> {
        let plaintext = serde_json::to_vec(payload)?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: &plaintext,
                    aad: ASSOCIATED_DATA,
                },
            )
            .map_err(|e| AppError::internal(format!("Slot key encryption failed: {e}")))?;

        let mut token = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        token.extend_from_slice(&nonce);
        token.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(token))
    }

    /// Decrypt and parse a token without checking expiry.
    pub fn open(&self, token: &str) -> Result<SlotKeyPayload, AppError> {
        let invalid = || AppError::validation("Invalid slot key").with_code(codes::INVALID_SLOT_KEY);

        let raw = URL_SAFE_NO_PAD.decode(token.trim()).map_err(|_| invalid())?;
        if raw.len() <= NONCE_LEN {
            return Err(invalid());
        }
        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: ASSOCIATED_DATA,
                },
            )
            .map_err(|_| invalid())?;
        serde_json::from_slice(&plaintext).map_err(|_| invalid())
    }

    /// Decrypt a token and reject it when expired at `now`.
    pub fn open_unexpired(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SlotKeyPayload, AppError> {
        let payload = self.open(token)?;
        if payload.is_expired(now) {
            return Err(
                AppError::conflict("Slot keys expired, refresh availability")
                    .with_code(codes::SLOT_KEY_EXPIRED),
            );
        }
        Ok(payload)
    }
}
