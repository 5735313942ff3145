//! IPFS HTTP API client.
//!
//! # Responsibilities
//! - Upload bytes through `/api/v0/add` (multipart field `file`)
//! - Read content back through the configured gateway
//! - Pin and unpin through `/api/v0/pin/add` and `/api/v0/pin/rm`
//!
//! # Design Decisions
//! - Basic auth is sent only when both project id and secret are set
//! - A failed upload is always an error; no placeholder address is made up
//! - Pin failures report `false` rather than erroring, pinning is advisory

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::StorageConfig;
use crate::content::store::ContentStore;
use crate::content::types::{ContentError, ContentResult, UploadResult};
use crate::observability::metrics;

#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
    #[serde(rename = "Size", default)]
    size: Option<SizeField>,
}

/// The add endpoint reports `Size` as a string on some nodes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SizeField {
    Number(u64),
    Text(String),
}

impl SizeField {
    fn value(&self) -> Option<u64> {
        match self {
            SizeField::Number(n) => Some(*n),
            SizeField::Text(s) => s.parse().ok(),
        }
    }
}

#[derive(Clone)]
pub struct IpfsClient {
    client: reqwest::Client,
    gateway: String,
    api_url: String,
    credentials: Option<(String, String)>,
    timeout_secs: u64,
}

impl IpfsClient {
    /// Create a new client from storage config.
    pub fn new(config: &StorageConfig) -> ContentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ContentError::ClientSetup(e.to_string()))?;

        let credentials = match (&config.project_id, &config.project_secret) {
            (Some(id), Some(secret)) => Some((id.clone(), secret.clone())),
            _ => None,
        };

        Ok(Self {
            client,
            gateway: config.gateway.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            credentials,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Gateway URL for an address.
    pub fn url_for(&self, address: &str) -> String {
        format!("{}{}", self.gateway, address)
    }

    fn api(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.client.post(format!("{}{}", self.api_url, path));
        match &self.credentials {
            Some((id, secret)) => request.basic_auth(id, Some(secret)),
            None => request,
        }
    }

    async fn pin_call(&self, path: &str, address: &str) -> bool {
        match self.api(path).query(&[("arg", address)]).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::debug!(address, path, status = %response.status(), "Pin request rejected");
                false
            }
            Err(e) => {
                tracing::warn!(address, error = %e, "Pin request failed");
                false
            }
        }
    }
}

#[async_trait]
impl ContentStore for IpfsClient {
    async fn upload(&self, bytes: Vec<u8>) -> ContentResult<UploadResult> {
        let length = bytes.len() as u64;
        let part = Part::bytes(bytes)
            .file_name("content")
            .mime_str("application/octet-stream")
            .map_err(|e| ContentError::StorageUploadFailed(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self.api("/api/v0/add").multipart(form).send().await.map_err(|e| {
            metrics::record_upload("failed");
            if e.is_timeout() {
                ContentError::NetworkTimeout(self.timeout_secs)
            } else {
                ContentError::StorageUploadFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            metrics::record_upload("failed");
            return Err(ContentError::StorageUploadFailed(format!("HTTP {}", status)));
        }

        let body: AddResponse = response.json().await.map_err(|e| {
            metrics::record_upload("failed");
            ContentError::StorageUploadFailed(format!("invalid add response: {}", e))
        })?;

        metrics::record_upload("ok");
        tracing::info!(address = %body.hash, size = length, "Content uploaded");

        Ok(UploadResult {
            url: self.url_for(&body.hash),
            size: body.size.and_then(|s| s.value()).unwrap_or(length),
            address: body.hash,
        })
    }

    async fn fetch(&self, address: &str) -> ContentResult<Vec<u8>> {
        let response = self.client.get(self.url_for(address)).send().await.map_err(|e| {
            if e.is_timeout() {
                ContentError::NetworkTimeout(self.timeout_secs)
            } else {
                ContentError::Fetch(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Fetch(format!("HTTP {} for {}", status, address)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ContentError::Fetch(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn pin(&self, address: &str) -> ContentResult<bool> {
        Ok(self.pin_call("/api/v0/pin/add", address).await)
    }

    async fn unpin(&self, address: &str) -> ContentResult<bool> {
        Ok(self.pin_call("/api/v0/pin/rm", address).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_field_shapes() {
        let numeric: AddResponse = serde_json::from_str(r#"{"Hash":"Qm1","Size":12}"#).unwrap();
        assert_eq!(numeric.size.and_then(|s| s.value()), Some(12));

        let text: AddResponse = serde_json::from_str(r#"{"Hash":"Qm1","Size":"34"}"#).unwrap();
        assert_eq!(text.size.and_then(|s| s.value()), Some(34));

        let missing: AddResponse = serde_json::from_str(r#"{"Hash":"Qm1"}"#).unwrap();
        assert!(missing.size.is_none());
    }

    #[test]
    fn test_gateway_url() {
        let client = IpfsClient::new(&StorageConfig::default()).unwrap();
        assert_eq!(client.url_for("QmAbc"), "https://ipfs.io/ipfs/QmAbc");
    }
}
