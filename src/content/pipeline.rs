//! Encrypt → upload → digest.
//!
//! # Data Flow
//! ```text
//! plaintext + visibility
//!     → StoredEnvelope::seal (AES-256-GCM unless public, fresh salt)
//!     → ContentStore::upload → content address
//!     → SHA-256(address) mod field modulus → digest
//!     → PreparedContent { reference, exported_key }
//! ```
//!
//! # Design Decisions
//! - Keys never leave through logs; only the exported copy returned to the caller
//! - Upload failure stops here, before any transaction exists

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::content::crypto;
use crate::content::envelope::StoredEnvelope;
use crate::content::store::ContentStore;
use crate::content::types::{
    ContentEnvelope, ContentReference, ContentResult, EncryptionMaterial, PreparedContent,
    SymmetricKey, Visibility,
};

#[derive(Clone)]
pub struct ContentPipeline {
    store: Arc<dyn ContentStore>,
    pin_after_upload: bool,
}

impl ContentPipeline {
    /// Create a new pipeline over a store.
    pub fn new(store: Arc<dyn ContentStore>, pin_after_upload: bool) -> Self {
        Self {
            store,
            pin_after_upload,
        }
    }

    /// Prepare content for a `publish_post` call.
    ///
    /// A fresh key is generated when none is supplied. The key is exported
    /// only for non-public content.
    pub async fn prepare(
        &self,
        plaintext: &str,
        visibility: Visibility,
        material: Option<&EncryptionMaterial>,
    ) -> ContentResult<PreparedContent> {
        let key = match material {
            Some(material) => material.key.clone(),
            None => crypto::generate_key(),
        };

        let envelope = ContentEnvelope {
            plaintext: plaintext.to_string(),
            visibility,
            produced_at: now_millis(),
        };
        let bytes = StoredEnvelope::seal(&envelope, &key)?.to_bytes()?;

        let upload = self.store.upload(bytes).await?;

        if self.pin_after_upload {
            match self.store.pin(&upload.address).await {
                Ok(true) => tracing::debug!(address = %upload.address, "Content pinned"),
                Ok(false) => tracing::warn!(address = %upload.address, "Store refused to pin content"),
                Err(e) => tracing::warn!(address = %upload.address, error = %e, "Pin failed"),
            }
        }

        let digest = crypto::content_digest(&upload.address);
        tracing::info!(
            address = %upload.address,
            digest = %digest,
            visibility = %visibility,
            "Content prepared"
        );

        Ok(PreparedContent {
            reference: ContentReference {
                content_address: upload.address,
                digest,
            },
            exported_key: visibility.is_encrypted().then(|| crypto::export_key(&key)),
            size: upload.size,
            url: upload.url,
        })
    }

    /// Fetch an envelope and return its plaintext.
    pub async fn retrieve(&self, address: &str, key: Option<&SymmetricKey>) -> ContentResult<String> {
        let bytes = self.store.fetch(address).await?;
        StoredEnvelope::from_bytes(&bytes)?.open(key)
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
