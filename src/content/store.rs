//! The content-addressed storage seam.

use async_trait::async_trait;

use crate::content::types::{ContentResult, UploadResult};

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Store bytes and return their content address.
    async fn upload(&self, bytes: Vec<u8>) -> ContentResult<UploadResult>;

    async fn fetch(&self, address: &str) -> ContentResult<Vec<u8>>;

    /// Returns `false` when the store refused to pin.
    async fn pin(&self, address: &str) -> ContentResult<bool>;

    async fn unpin(&self, address: &str) -> ContentResult<bool>;
}
