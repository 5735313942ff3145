//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (poll budget > 0, timeouts > 0)
//! - Check URLs parse before any client is built
//! - Detect duplicate program ids
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;

use crate::config::schema::AppConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.orchestrator.max_poll_attempts == 0 {
        errors.push(ValidationError::new(
            "orchestrator.max_poll_attempts",
            "must be at least 1",
        ));
    }

    if config.storage.timeout_secs == 0 {
        errors.push(ValidationError::new("storage.timeout_secs", "must be greater than 0"));
    }

    if config.network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("network.rpc_timeout_secs", "must be greater than 0"));
    }

    check_url(&mut errors, "storage.api_url", &config.storage.api_url);
    check_url(&mut errors, "storage.gateway", &config.storage.gateway);
    check_url(&mut errors, "network.rpc_url", &config.network.rpc_url);
    for (i, url) in config.network.failover_urls.iter().enumerate() {
        check_url(&mut errors, &format!("network.failover_urls[{}]", i), url);
    }
    if !config.wallet.bridge_url.is_empty() {
        check_url(&mut errors, "wallet.bridge_url", &config.wallet.bridge_url);
    }

    if config.storage.project_id.is_some() != config.storage.project_secret.is_some() {
        errors.push(ValidationError::new(
            "storage.project_secret",
            "project_id and project_secret must be set together",
        ));
    }

    let mut seen = HashSet::new();
    for program in config.programs.all() {
        if !program.ends_with(".aleo") {
            errors.push(ValidationError::new(
                "programs",
                format!("'{}' is not a program id (expected '<name>.aleo')", program),
            ));
        }
        if !seen.insert(program.clone()) {
            errors.push(ValidationError::new(
                "programs",
                format!("'{}' is configured more than once", program),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if let Err(e) = url::Url::parse(value) {
        errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.orchestrator.max_poll_attempts = 0;
        config.network.rpc_url = "not a url".to_string();
        config.programs.follow = config.programs.post.clone();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.field == "orchestrator.max_poll_attempts"));
        assert!(errors.iter().any(|e| e.field == "network.rpc_url"));
        assert!(errors.iter().any(|e| e.message.contains("more than once")));
    }

    #[test]
    fn test_half_configured_credentials() {
        let mut config = AppConfig::default();
        config.storage.project_id = Some("id".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "storage.project_secret");
    }
}
