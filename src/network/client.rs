//! Ledger REST client with timeout and failover.
//!
//! # Responsibilities
//! - Read block height, program source, mapping values and transactions
//! - Try each configured endpoint in order until one answers
//! - Bound every request by the configured timeout
//!
//! # Design Decisions
//! - Transport errors, timeouts and 5xx move on to the next endpoint;
//!   any other status is an answer
//! - A mapping lookup that is not 2xx means "no value", not an error

use std::time::Duration;

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::timeout;

use crate::config::NetworkConfig;
use crate::network::types::{NetworkError, NetworkResult};
use crate::observability::metrics;

#[derive(Clone)]
pub struct LedgerClient {
    client: reqwest::Client,
    /// Primary endpoint first, then failovers.
    endpoints: Vec<String>,
    timeout_duration: Duration,
}

impl LedgerClient {
    /// Create a new ledger client.
    ///
    /// # Arguments
    /// * `config` - Network configuration
    ///
    /// # Returns
    /// A new client, or an error if the primary URL is invalid
    pub fn new(config: &NetworkConfig) -> NetworkResult<Self> {
        let mut endpoints = Vec::new();

        url::Url::parse(&config.rpc_url).map_err(|e| NetworkError::InvalidUrl {
            url: config.rpc_url.clone(),
            reason: e.to_string(),
        })?;
        endpoints.push(config.rpc_url.trim_end_matches('/').to_string());

        for url_str in &config.failover_urls {
            if url::Url::parse(url_str).is_ok() {
                endpoints.push(url_str.trim_end_matches('/').to_string());
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover ledger URL");
            }
        }

        Ok(Self {
            client: reqwest::Client::new(),
            endpoints,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
        })
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Latest block height.
    pub async fn latest_block_height(&self) -> NetworkResult<u64> {
        self.get_json("/latest/block/height").await
    }

    /// Program source.
    pub async fn program(&self, program_id: &str) -> NetworkResult<String> {
        self.get_json(&format!("/program/{}", program_id)).await
    }

    /// A mapping value, or `None` when the key is absent.
    pub async fn mapping_value(
        &self,
        program_id: &str,
        mapping: &str,
        key: &str,
    ) -> NetworkResult<Option<Value>> {
        let path = format!("/program/{}/mapping/{}/{}", program_id, mapping, key);
        let response = self.send(&path).await?;
        if !response.status().is_success() {
            tracing::debug!(path = %path, status = response.status().as_u16(), "Mapping value absent");
            return Ok(None);
        }
        let value: Value = decode(response).await?;
        Ok((!value.is_null()).then_some(value))
    }

    /// Transaction details.
    pub async fn transaction(&self, transaction_id: &str) -> NetworkResult<Value> {
        self.get_json(&format!("/transaction/{}", transaction_id)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> NetworkResult<T> {
        let response = self.send(path).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }
        decode(response).await
    }

    async fn send(&self, path: &str) -> NetworkResult<Response> {
        for (i, base) in self.endpoints.iter().enumerate() {
            let fut = self.client.get(format!("{}{}", base, path)).send();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(response)) if response.status().is_server_error() => {
                    metrics::record_network_request("error");
                    tracing::warn!(
                        provider_idx = i,
                        status = response.status().as_u16(),
                        "Ledger server error, trying next endpoint"
                    );
                }
                Ok(Ok(response)) => {
                    metrics::record_network_request("ok");
                    return Ok(response);
                }
                Ok(Err(e)) => {
                    metrics::record_network_request("error");
                    tracing::warn!(provider_idx = i, error = %e, "Ledger request error, trying next endpoint");
                }
                Err(_) => {
                    metrics::record_network_request("timeout");
                    tracing::warn!(provider_idx = i, "Ledger request timeout, trying next endpoint");
                }
            }
        }

        Err(NetworkError::AllEndpointsFailed(path.to_string()))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> NetworkResult<T> {
    response
        .json()
        .await
        .map_err(|e| NetworkError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_order_and_invalid_failover() {
        let config = NetworkConfig {
            rpc_url: "https://primary.example/v1/".to_string(),
            failover_urls: vec!["not a url".to_string(), "https://backup.example/v1".to_string()],
            rpc_timeout_secs: 5,
        };
        let client = LedgerClient::new(&config).unwrap();
        assert_eq!(
            client.endpoints(),
            &["https://primary.example/v1", "https://backup.example/v1"]
        );
    }

    #[test]
    fn test_invalid_primary() {
        let config = NetworkConfig {
            rpc_url: "::".to_string(),
            ..NetworkConfig::default()
        };
        assert!(matches!(
            LedgerClient::new(&config),
            Err(NetworkError::InvalidUrl { .. })
        ));
    }
}
