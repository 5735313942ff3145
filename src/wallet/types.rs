//! Wallet session types and error definitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during wallet operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No backend could be reached or connected.
    #[error("Wallet unavailable: {0}")]
    WalletUnavailable(String),

    /// The user declined the request in the wallet.
    #[error("Request rejected by user: {0}")]
    UserRejected(String),

    /// The active backend does not implement a capability.
    #[error("Wallet does not support {0}")]
    CapabilityUnsupported(String),

    /// A backend request exceeded its deadline.
    #[error("Wallet request timed out after {0} seconds")]
    NetworkTimeout(u64),

    /// A capability was requested without an active session.
    #[error("Wallet not connected")]
    NotConnected,

    /// Any other backend failure, carried verbatim.
    #[error("{0}")]
    Backend(String),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// Whether the session is backed by a real wallet or simulated locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletMode {
    Real,
    Demo,
}

/// Connection phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Availability reported by a wallet backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyState {
    Installed,
    Loadable,
    NotDetected,
    Unsupported,
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReadyState::Installed => "installed",
            ReadyState::Loadable => "loadable",
            ReadyState::NotDetected => "not_detected",
            ReadyState::Unsupported => "unsupported",
        };
        f.write_str(s)
    }
}

/// When the wallet may decrypt records on behalf of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecryptPermission {
    NoDecrypt,
    UponRequest,
    AutoDecrypt,
    OnChainHistory,
}

/// Capabilities requested from a backend when connecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub decrypt_permission: DecryptPermission,
    pub network: String,
    pub programs: Vec<String>,
}

/// One program call inside a wallet transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub program: String,
    pub function_name: String,
    pub inputs: Vec<String>,
}

/// Transaction as handed to a wallet backend for signing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub address: String,
    pub chain_id: String,
    pub transitions: Vec<Transition>,
    pub fee: u64,
    pub private_fee: bool,
}

/// Observable snapshot of the wallet session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub mode: WalletMode,
    pub address: Option<String>,
    /// Pseudonym derived from `address`.
    pub display_alias: Option<String>,
    pub connection: ConnectionState,
    pub last_error: Option<String>,
    pub backend_name: Option<String>,
    /// Bumped on every connect and disconnect.
    pub epoch: u64,
}

impl SessionState {
    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    pub fn is_demo(&self) -> bool {
        self.mode == WalletMode::Demo
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            mode: WalletMode::Real,
            address: None,
            display_alias: None,
            connection: ConnectionState::Disconnected,
            last_error: None,
            backend_name: None,
            epoch: 0,
        }
    }
}

/// A registered backend and its readiness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletInfo {
    pub name: String,
    pub ready: ReadyState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_message() {
        let err = WalletError::CapabilityUnsupported("message signing".to_string());
        assert_eq!(err.to_string(), "Wallet does not support message signing");
    }

    #[test]
    fn test_wallet_transaction_wire_shape() {
        let tx = WalletTransaction {
            address: "aleo1xyz".to_string(),
            chain_id: "testnetbeta".to_string(),
            transitions: vec![Transition {
                program: "anonex_post.aleo".to_string(),
                function_name: "publish_post".to_string(),
                inputs: vec!["1field".to_string()],
            }],
            fee: 100_000,
            private_fee: false,
        };

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["chainId"], "testnetbeta");
        assert_eq!(json["privateFee"], false);
        assert_eq!(json["transitions"][0]["functionName"], "publish_post");
    }

    #[test]
    fn test_default_state_disconnected() {
        let state = SessionState::default();
        assert!(!state.is_connected());
        assert!(!state.is_demo());
        assert_eq!(state.epoch, 0);
    }
}
