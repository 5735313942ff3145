//! Simulated wallet backend.
//!
//! Used when no real wallet can be connected. Never touches the network:
//! every operation resolves after a configured delay with a fixed or
//! locally generated value.

use std::time::Duration;

use crate::config::WalletConfig;
use crate::transaction::TransactionStatus;
use crate::wallet::alias;

/// Plaintext returned for every demo decryption.
pub const DEMO_DECRYPTED_CONTENT: &str = "demo_decrypted_content";

/// Length of the placeholder signature.
pub const DEMO_SIGNATURE_LEN: usize = 64;

#[derive(Debug, Clone)]
pub struct DemoWallet {
    connect_delay: Duration,
    transaction_delay: Duration,
    status_delay: Duration,
}

impl DemoWallet {
    /// Create a new demo wallet with the configured delays.
    pub fn new(config: &WalletConfig) -> Self {
        Self {
            connect_delay: Duration::from_millis(config.demo_connect_delay_ms),
            transaction_delay: Duration::from_millis(config.demo_transaction_delay_ms),
            status_delay: Duration::from_millis(config.demo_status_delay_ms),
        }
    }

    /// Simulate a connect and return a freshly generated address.
    pub async fn connect(&self) -> String {
        tokio::time::sleep(self.connect_delay).await;
        alias::generate_demo_address()
    }

    pub async fn request_transaction(&self) -> String {
        tokio::time::sleep(self.transaction_delay).await;
        let id = alias::generate_demo_transaction_id();
        tracing::info!(transaction_id = %id, "Demo transaction submitted");
        id
    }

    pub fn sign_message(&self, _message: &[u8]) -> Vec<u8> {
        vec![0u8; DEMO_SIGNATURE_LEN]
    }

    pub fn decrypt(&self, _ciphertext: &str) -> String {
        DEMO_DECRYPTED_CONTENT.to_string()
    }

    pub fn records(&self) -> Vec<serde_json::Value> {
        Vec::new()
    }

    pub async fn transaction_status(&self, _transaction_id: &str) -> TransactionStatus {
        tokio::time::sleep(self.status_delay).await;
        TransactionStatus::Finalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> DemoWallet {
        DemoWallet::new(&WalletConfig {
            demo_connect_delay_ms: 1,
            demo_transaction_delay_ms: 1,
            demo_status_delay_ms: 1,
            ..WalletConfig::default()
        })
    }

    #[tokio::test]
    async fn test_demo_sentinels() {
        let wallet = fast();
        assert_eq!(wallet.sign_message(b"hello"), vec![0u8; 64]);
        assert_eq!(wallet.decrypt("ciphertext"), "demo_decrypted_content");
        assert!(wallet.records().is_empty());
        assert_eq!(
            wallet.transaction_status("at1demo").await,
            TransactionStatus::Finalized
        );
    }

    #[tokio::test]
    async fn test_demo_connect_and_submit() {
        let wallet = fast();
        assert!(wallet.connect().await.starts_with("aleo1"));
        assert!(wallet.request_transaction().await.starts_with("at1demo"));
    }
}
