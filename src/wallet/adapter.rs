//! The wallet backend seam.
//!
//! Every real wallet integration implements [`WalletAdapter`]. Only
//! `connect` and `request_transaction` are mandatory; the remaining
//! capabilities default to `CapabilityUnsupported` so partial backends
//! degrade cleanly.

use async_trait::async_trait;

use crate::wallet::types::{
    ConnectRequest, ReadyState, WalletError, WalletResult, WalletTransaction,
};

#[async_trait]
pub trait WalletAdapter: Send + Sync {
    /// Stable backend name, used for selection and the last-wallet marker.
    fn name(&self) -> &str;

    /// Whether the backend can be used right now.
    fn ready_state(&self) -> ReadyState;

    /// Connect and return the account address.
    async fn connect(&self, request: &ConnectRequest) -> WalletResult<String>;

    async fn disconnect(&self) -> WalletResult<()> {
        Ok(())
    }

    /// Sign and broadcast, returning the transaction id.
    async fn request_transaction(&self, transaction: &WalletTransaction) -> WalletResult<String>;

    async fn sign_message(&self, _message: &[u8]) -> WalletResult<Vec<u8>> {
        Err(WalletError::CapabilityUnsupported("message signing".to_string()))
    }

    async fn decrypt(&self, _ciphertext: &str) -> WalletResult<String> {
        Err(WalletError::CapabilityUnsupported("decryption".to_string()))
    }

    /// Raw records owned by the account for one program.
    async fn request_records(&self, _program: &str) -> WalletResult<Vec<serde_json::Value>> {
        Err(WalletError::CapabilityUnsupported("record requests".to_string()))
    }

    /// Raw status string as reported by the backend.
    async fn transaction_status(&self, _transaction_id: &str) -> WalletResult<String> {
        Err(WalletError::CapabilityUnsupported("transaction status".to_string()))
    }
}
