//! The document stored for each post.
//!
//! Serialized with serde_json in declaration order, which keeps the bytes
//! stable for a given envelope. The random `salt` makes every envelope
//! unique even when the plaintext repeats.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::content::crypto;
use crate::content::types::{
    ContentEnvelope, ContentError, ContentResult, SymmetricKey, Visibility,
};

pub const ENVELOPE_VERSION: u32 = 1;

const SALT_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEnvelope {
    pub version: u32,
    pub visibility: Visibility,
    pub encrypted: bool,
    /// Plaintext, or `base64(iv || ciphertext)` when `encrypted`.
    pub content: String,
    pub timestamp: u64,
    /// Hex-encoded random bytes.
    pub salt: String,
}

impl StoredEnvelope {
    /// Wrap an envelope, encrypting it when the visibility requires.
    pub fn seal(envelope: &ContentEnvelope, key: &SymmetricKey) -> ContentResult<Self> {
        let encrypted = envelope.visibility.is_encrypted();
        let content = if encrypted {
            crypto::encrypt(envelope.plaintext.as_bytes(), key)?
        } else {
            envelope.plaintext.clone()
        };

        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);

        Ok(Self {
            version: ENVELOPE_VERSION,
            visibility: envelope.visibility,
            encrypted,
            content,
            timestamp: envelope.produced_at,
            salt: hex::encode(salt),
        })
    }

    /// Recover the plaintext. A key is required only for encrypted envelopes.
    pub fn open(&self, key: Option<&SymmetricKey>) -> ContentResult<String> {
        if !self.encrypted {
            return Ok(self.content.clone());
        }
        let key = key.ok_or_else(|| {
            ContentError::Decryption("content is encrypted and no key was supplied".to_string())
        })?;
        let bytes = crypto::decrypt(&self.content, key)?;
        String::from_utf8(bytes)
            .map_err(|e| ContentError::Decryption(format!("plaintext is not UTF-8: {}", e)))
    }

    pub fn to_bytes(&self) -> ContentResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ContentError::Serialization(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> ContentResult<Self> {
        let envelope: Self =
            serde_json::from_slice(bytes).map_err(|e| ContentError::Serialization(e.to_string()))?;
        if envelope.version != ENVELOPE_VERSION {
            return Err(ContentError::Serialization(format!(
                "unsupported envelope version {}",
                envelope.version
            )));
        }
        Ok(envelope)
    }
}
