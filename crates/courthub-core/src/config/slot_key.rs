//! Slot key encryption configuration.

use serde::{Deserialize, Serialize};

/// Settings for the encrypted, time-boxed slot quote tokens.
#[derive(Clone, Serialize, Deserialize)]
pub struct SlotKeyConfig {
    /// Standard base64 encoding of the 32-byte AES-256-GCM key.
    pub secret: String,
    /// Validity window of an issued slot key, in minutes.
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,
}

impl std::fmt::Debug for SlotKeyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotKeyConfig")
            .field("secret", &"****")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

fn default_ttl_minutes() -> i64 {
    10
}
