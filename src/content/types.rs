//! Content pipeline types and error definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::transaction::FieldElement;

/// Who may read a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Group,
}

impl Visibility {
    /// Non-public content is encrypted before upload.
    pub fn is_encrypted(&self) -> bool {
        !matches!(self, Visibility::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Group => "group",
        };
        f.write_str(s)
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            "group" => Ok(Visibility::Group),
            other => Err(format!("unknown visibility '{}'", other)),
        }
    }
}

/// Plaintext awaiting upload.
#[derive(Debug, Clone)]
pub struct ContentEnvelope {
    pub plaintext: String,
    pub visibility: Visibility,
    /// Milliseconds since the Unix epoch.
    pub produced_at: u64,
}

/// A 256-bit AES key, wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; 32]);

impl SymmetricKey {
    pub const LEN: usize = 32;

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey").field("length", &Self::LEN).finish()
    }
}

/// Key material supplied by, and owned by, the caller.
#[derive(Debug, Clone)]
pub struct EncryptionMaterial {
    pub key: SymmetricKey,
    pub derived_from_passphrase: bool,
}

/// The only content artifact that may appear in a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentReference {
    pub content_address: String,
    pub digest: FieldElement,
}

/// Output of `ContentPipeline::prepare`.
#[derive(Debug, Clone)]
pub struct PreparedContent {
    pub reference: ContentReference,
    /// Base64 key, present only for encrypted content.
    pub exported_key: Option<String>,
    pub size: u64,
    pub url: String,
}

/// Result of a storage upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub address: String,
    pub size: u64,
    pub url: String,
}

/// Errors that can occur in the content pipeline.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Storage client setup failed: {0}")]
    ClientSetup(String),

    #[error("Storage upload failed: {0}")]
    StorageUploadFailed(String),

    #[error("Storage request timed out after {0} seconds")]
    NetworkTimeout(u64),

    #[error("Storage fetch failed: {0}")]
    Fetch(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Malformed content: {0}")]
    Serialization(String),
}

/// Result type for content operations.
pub type ContentResult<T> = Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_round_trip() {
        for v in [Visibility::Public, Visibility::Private, Visibility::Group] {
            assert_eq!(v.to_string().parse::<Visibility>().unwrap(), v);
        }
        assert!(!Visibility::Public.is_encrypted());
        assert!(Visibility::Group.is_encrypted());
    }

    #[test]
    fn test_client_setup_is_not_a_fetch_error() {
        let err = ContentError::ClientSetup("TLS backend unavailable".to_string());
        assert_eq!(err.to_string(), "Storage client setup failed: TLS backend unavailable");
        assert!(!matches!(err, ContentError::Fetch(_)));
    }

    #[test]
    fn test_key_debug_hides_bytes() {
        let key = SymmetricKey::from_bytes([7u8; 32]);
        assert_eq!(format!("{:?}", key), "SymmetricKey { length: 32 }");
    }
}
