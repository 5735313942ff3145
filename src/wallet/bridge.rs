//! JSON-RPC wallet bridge adapter.
//!
//! # Responsibilities
//! - Forward wallet capabilities to a local bridge process over HTTP
//! - Map JSON-RPC error codes onto the wallet error taxonomy
//!
//! # Data Flow
//! ```text
//! WalletSession ──▶ BridgeWallet ──POST {"jsonrpc":"2.0","method":..}──▶ bridge
//!                        ◀── {"result": ..} | {"error": {"code", "message"}}
//! ```
//!
//! # Design Decisions
//! - Code 4001 is a user rejection; -32601 (method not found) means the
//!   wallet behind the bridge lacks the capability
//! - Binary payloads (signatures, messages) travel as standard base64

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::wallet::adapter::WalletAdapter;
use crate::wallet::types::{
    ConnectRequest, ReadyState, WalletError, WalletResult, WalletTransaction,
};

const USER_REJECTED_CODE: i64 = 4001;
const METHOD_NOT_FOUND_CODE: i64 = -32601;

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

/// Adapter talking to a wallet bridge at a fixed URL.
pub struct BridgeWallet {
    name: String,
    url: String,
    client: reqwest::Client,
    timeout_secs: u64,
    next_id: AtomicU64,
}

impl BridgeWallet {
    /// Create a new bridge adapter.
    pub fn new(name: impl Into<String>, url: impl Into<String>, timeout_secs: u64) -> WalletResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| WalletError::WalletUnavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            name: name.into(),
            url: url.into(),
            client,
            timeout_secs,
            next_id: AtomicU64::new(1),
        })
    }

    async fn call(&self, method: &str, params: Value) -> WalletResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });

        tracing::debug!(method, id, "Bridge request");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WalletError::Backend(format!(
                "Bridge returned HTTP {} for {}",
                status, method
            )));
        }

        let response: RpcResponse = response
            .json()
            .await
            .map_err(|e| WalletError::Backend(format!("Invalid bridge response: {}", e)))?;

        if let Some(error) = response.error {
            return Err(match error.code {
                USER_REJECTED_CODE => WalletError::UserRejected(error.message),
                METHOD_NOT_FOUND_CODE => WalletError::CapabilityUnsupported(capability_for(method)),
                _ => WalletError::Backend(error.message),
            });
        }

        Ok(response.result.unwrap_or(Value::Null))
    }

    fn transport_error(&self, e: reqwest::Error) -> WalletError {
        if e.is_timeout() {
            WalletError::NetworkTimeout(self.timeout_secs)
        } else {
            WalletError::WalletUnavailable(format!("Bridge unreachable: {}", e))
        }
    }
}

/// Human wording of each capability, matching the default adapter messages.
fn capability_for(method: &str) -> String {
    match method {
        "requestTransaction" => "transactions",
        "signMessage" => "message signing",
        "decrypt" => "decryption",
        "requestRecords" => "record requests",
        "transactionStatus" => "transaction status",
        other => other,
    }
    .to_string()
}

/// Accept either a bare string or an object carrying `key`.
fn string_field(value: &Value, key: &str) -> WalletResult<String> {
    value
        .as_str()
        .or_else(|| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
        .ok_or_else(|| WalletError::Backend(format!("Bridge response missing '{}'", key)))
}

#[async_trait]
impl WalletAdapter for BridgeWallet {
    fn name(&self) -> &str {
        &self.name
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::Installed
    }

    async fn connect(&self, request: &ConnectRequest) -> WalletResult<String> {
        let params = serde_json::to_value(request)
            .map_err(|e| WalletError::Backend(e.to_string()))?;
        let result = self.call("connect", params).await?;
        string_field(&result, "address")
    }

    async fn disconnect(&self) -> WalletResult<()> {
        self.call("disconnect", json!({})).await.map(|_| ())
    }

    async fn request_transaction(&self, transaction: &WalletTransaction) -> WalletResult<String> {
        let params = serde_json::to_value(transaction)
            .map_err(|e| WalletError::Backend(e.to_string()))?;
        let result = self.call("requestTransaction", params).await?;
        string_field(&result, "transactionId")
    }

    async fn sign_message(&self, message: &[u8]) -> WalletResult<Vec<u8>> {
        let result = self
            .call("signMessage", json!({ "message": BASE64.encode(message) }))
            .await?;
        let encoded = string_field(&result, "signature")?;
        BASE64
            .decode(encoded)
            .map_err(|e| WalletError::Backend(format!("Invalid signature encoding: {}", e)))
    }

    async fn decrypt(&self, ciphertext: &str) -> WalletResult<String> {
        let result = self.call("decrypt", json!({ "ciphertext": ciphertext })).await?;
        string_field(&result, "plaintext")
    }

    async fn request_records(&self, program: &str) -> WalletResult<Vec<Value>> {
        let result = self.call("requestRecords", json!({ "program": program })).await?;
        let records = match result {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("records") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Ok(records)
    }

    async fn transaction_status(&self, transaction_id: &str) -> WalletResult<String> {
        let result = self
            .call("transactionStatus", json!({ "transactionId": transaction_id }))
            .await?;
        string_field(&result, "status")
    }
}
