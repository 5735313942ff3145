//! In-process content store for demo sessions and tests.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};

use crate::content::crypto::hash_content;
use crate::content::store::ContentStore;
use crate::content::types::{ContentError, ContentResult, UploadResult};

pub const MEMORY_SCHEME: &str = "mem://";

/// Addresses are `mem://<sha256 hex>`, so equal bytes share an address.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: Arc<DashMap<String, Vec<u8>>>,
    pinned: Arc<DashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    pub fn is_pinned(&self, address: &str) -> bool {
        self.pinned.contains(address)
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn upload(&self, bytes: Vec<u8>) -> ContentResult<UploadResult> {
        let address = format!("{}{}", MEMORY_SCHEME, hash_content(&bytes));
        let size = bytes.len() as u64;
        self.blobs.insert(address.clone(), bytes);
        Ok(UploadResult {
            url: address.clone(),
            address,
            size,
        })
    }

    async fn fetch(&self, address: &str) -> ContentResult<Vec<u8>> {
        self.blobs
            .get(address)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ContentError::Fetch(format!("{} not found", address)))
    }

    async fn pin(&self, address: &str) -> ContentResult<bool> {
        if !self.blobs.contains_key(address) {
            return Ok(false);
        }
        self.pinned.insert(address.to_string());
        Ok(true)
    }

    async fn unpin(&self, address: &str) -> ContentResult<bool> {
        Ok(self.pinned.remove(address).is_some())
    }
}
