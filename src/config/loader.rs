//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `storage.project_id`.
pub const IPFS_PROJECT_ID_ENV_VAR: &str = "ANONEX_IPFS_PROJECT_ID";
/// Environment variable overriding `storage.project_secret`.
pub const IPFS_PROJECT_SECRET_ENV_VAR: &str = "ANONEX_IPFS_PROJECT_SECRET";
/// Environment variable overriding `wallet.bridge_url`.
pub const WALLET_BRIDGE_URL_ENV_VAR: &str = "ANONEX_WALLET_BRIDGE_URL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse, apply environment overrides and validate configuration text.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let mut config: AppConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    apply_env_overrides(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Secrets and deployment-specific endpoints may come from the environment
/// instead of the config file.
pub fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(id) = std::env::var(IPFS_PROJECT_ID_ENV_VAR) {
        config.storage.project_id = Some(id);
    }
    if let Ok(secret) = std::env::var(IPFS_PROJECT_SECRET_ENV_VAR) {
        config.storage.project_secret = Some(secret);
    }
    if let Ok(url) = std::env::var(WALLET_BRIDGE_URL_ENV_VAR) {
        tracing::debug!(bridge_url = %url, "Wallet bridge URL taken from environment");
        config.wallet.bridge_url = url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[orchestrator]\nmax_poll_attempts = 5\npoll_interval_ms = 100\n"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.orchestrator.max_poll_attempts, 5);
        assert_eq!(config.orchestrator.poll_interval_ms, 100);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = parse_config("[orchestrator]\nmax_poll_attempts = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("max_poll_attempts"));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[orchestrator\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/anonex.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
