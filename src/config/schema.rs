//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Wallet session settings (backends, demo fallback, persistence).
    pub wallet: WalletConfig,

    /// Transaction lifecycle settings (fees, confirmation polling).
    pub orchestrator: OrchestratorConfig,

    /// Content-addressed storage settings.
    pub storage: StorageConfig,

    /// Ledger REST API settings.
    pub network: NetworkConfig,

    /// On-chain program identifiers.
    pub programs: ProgramsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Wallet session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Application name announced to wallet backends.
    pub app_name: String,

    /// Target network requested on connect (e.g., "testnetbeta").
    pub network: String,

    /// Fall back to a simulated wallet when no real backend connects.
    pub allow_simulated_fallback: bool,

    /// Base URL of a local wallet bridge speaking JSON-RPC. Disabled when empty.
    pub bridge_url: String,

    /// Timeout for bridge requests in seconds.
    pub bridge_timeout_secs: u64,

    /// File remembering the last connected backend. Disabled when unset.
    pub last_wallet_path: Option<String>,

    /// Pause after selecting a backend before connecting, in milliseconds.
    pub select_delay_ms: u64,

    /// Simulated connect delay in demo mode, in milliseconds.
    pub demo_connect_delay_ms: u64,

    /// Simulated signing/broadcast delay in demo mode, in milliseconds.
    pub demo_transaction_delay_ms: u64,

    /// Simulated status query delay in demo mode, in milliseconds.
    pub demo_status_delay_ms: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            app_name: "AnoneX".to_string(),
            network: "testnetbeta".to_string(),
            allow_simulated_fallback: true,
            bridge_url: String::new(),
            bridge_timeout_secs: 120,
            last_wallet_path: None,
            select_delay_ms: 300,
            demo_connect_delay_ms: 1500,
            demo_transaction_delay_ms: 2000,
            demo_status_delay_ms: 500,
        }
    }
}

/// Transaction orchestration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Default fee in microcredits.
    pub default_fee: u64,

    /// Pay the fee from a private record instead of the public balance.
    pub private_fee: bool,

    /// Maximum number of confirmation polls before assuming success.
    pub max_poll_attempts: u32,

    /// Delay between confirmation polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Fixed confirmation delay in demo mode, in milliseconds.
    pub demo_confirm_delay_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            default_fee: 100_000, // 0.0001 credits
            private_fee: false,
            max_poll_attempts: 30,
            poll_interval_ms: 2000,
            demo_confirm_delay_ms: 2000,
        }
    }
}

/// Content-addressed storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Gateway used to read content (address is appended).
    pub gateway: String,

    /// Base URL of the storage HTTP API.
    pub api_url: String,

    /// Optional project id for basic auth.
    pub project_id: Option<String>,

    /// Optional project secret for basic auth.
    pub project_secret: Option<String>,

    /// Upload/fetch timeout in seconds.
    pub timeout_secs: u64,

    /// Pin content right after a successful upload.
    pub pin_after_upload: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            gateway: "https://ipfs.io/ipfs/".to_string(),
            api_url: "https://ipfs.infura.io:5001".to_string(),
            project_id: None,
            project_secret: None,
            timeout_secs: 30,
            pin_after_upload: false,
        }
    }
}

/// Ledger REST API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Primary REST endpoint.
    pub rpc_url: String,

    /// Failover REST endpoints.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.explorer.aleo.org/v1/testnet3".to_string(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 10,
        }
    }
}

/// Identifiers of the deployed programs.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProgramsConfig {
    pub post: String,
    pub reaction: String,
    pub follow: String,
    pub group: String,
    pub identity: String,
}

impl ProgramsConfig {
    /// All program ids, in the order requested from wallets on connect.
    pub fn all(&self) -> Vec<String> {
        vec![
            self.post.clone(),
            self.reaction.clone(),
            self.follow.clone(),
            self.group.clone(),
            self.identity.clone(),
        ]
    }
}

impl Default for ProgramsConfig {
    fn default() -> Self {
        Self {
            post: "anonex_post.aleo".to_string(),
            reaction: "anonex_reaction.aleo".to_string(),
            follow: "anonex_follow.aleo".to_string(),
            group: "anonex_group.aleo".to_string(),
            identity: "anonex_identity.aleo".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Use the compact single-line log format.
    pub compact: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            compact: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.wallet.allow_simulated_fallback);
        assert_eq!(config.orchestrator.max_poll_attempts, 30);
        assert_eq!(config.orchestrator.poll_interval_ms, 2000);
        assert_eq!(config.orchestrator.default_fee, 100_000);
        assert_eq!(config.programs.post, "anonex_post.aleo");
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [wallet]
            allow_simulated_fallback = false

            [programs]
            post = "custom_post.aleo"
            "#,
        )
        .unwrap();

        assert!(!config.wallet.allow_simulated_fallback);
        assert_eq!(config.wallet.network, "testnetbeta");
        assert_eq!(config.programs.post, "custom_post.aleo");
        assert_eq!(config.programs.reaction, "anonex_reaction.aleo");
    }

    #[test]
    fn test_program_allow_list_order() {
        let programs = ProgramsConfig::default();
        assert_eq!(
            programs.all(),
            vec![
                "anonex_post.aleo",
                "anonex_reaction.aleo",
                "anonex_follow.aleo",
                "anonex_group.aleo",
                "anonex_identity.aleo",
            ]
        );
    }
}
