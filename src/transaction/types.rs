//! Lifecycle types and error definitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::wallet::WalletError;

/// Status of one transaction lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    Idle,
    /// Validating the request; the wallet is not engaged yet.
    Preparing,
    /// Waiting for the wallet to sign.
    Signing,
    /// The wallet returned an id; the transaction is on its way.
    Broadcasting,
    /// Waiting for the network to finalize.
    Confirming,
    Confirmed,
    Failed,
}

impl LifecycleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStatus::Idle => "idle",
            LifecycleStatus::Preparing => "preparing",
            LifecycleStatus::Signing => "signing",
            LifecycleStatus::Broadcasting => "broadcasting",
            LifecycleStatus::Confirming => "confirming",
            LifecycleStatus::Confirmed => "confirmed",
            LifecycleStatus::Failed => "failed",
        }
    }

    /// In-flight states represent pending async work.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            LifecycleStatus::Preparing
                | LifecycleStatus::Signing
                | LifecycleStatus::Broadcasting
                | LifecycleStatus::Confirming
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleStatus::Confirmed | LifecycleStatus::Failed)
    }

    /// Whether `next` directly follows `self` in the state machine.
    ///
    /// ```text
    /// Idle → Preparing → Signing → Broadcasting → Confirming → Confirmed
    ///           └──────────┴───────────┴──────────────┴──────→ Failed
    /// ```
    pub fn can_advance_to(&self, next: LifecycleStatus) -> bool {
        use LifecycleStatus::*;
        match (self, next) {
            (Idle, Preparing)
            | (Preparing, Signing)
            | (Signing, Broadcasting)
            | (Broadcasting, Confirming)
            | (Confirming, Confirmed) => true,
            (from, Failed) => from.is_in_flight(),
            _ => false,
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One run of the transaction state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionLifecycle {
    /// Fresh for every run; a new `execute` never reuses a lifecycle.
    pub id: Uuid,
    pub status: LifecycleStatus,
    /// Bound once the wallet accepts the transaction.
    pub transaction_id: Option<String>,
    /// Human-readable failure message, set only in `Failed`.
    pub error: Option<String>,
}

impl TransactionLifecycle {
    /// A new lifecycle resting in `Idle`.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            status: LifecycleStatus::Idle,
            transaction_id: None,
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_in_flight()
    }

    pub fn is_success(&self) -> bool {
        self.status == LifecycleStatus::Confirmed
    }

    pub fn is_error(&self) -> bool {
        self.status == LifecycleStatus::Failed
    }
}

impl Default for TransactionLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// A single observed transition, published to event subscribers in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub lifecycle_id: Uuid,
    pub status: LifecycleStatus,
    pub transaction_id: Option<String>,
    pub error: Option<String>,
}

impl From<&TransactionLifecycle> for LifecycleEvent {
    fn from(lifecycle: &TransactionLifecycle) -> Self {
        Self {
            lifecycle_id: lifecycle.id,
            status: lifecycle.status,
            transaction_id: lifecycle.transaction_id.clone(),
            error: lifecycle.error.clone(),
        }
    }
}

/// How a lifecycle reached `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// Demo mode: confirmed after the fixed simulated delay.
    Simulated,
    /// A poll reported `Finalized` or `Confirmed`.
    Finalized { attempts: u32 },
    /// Every poll in the budget came back pending or errored.
    ///
    /// The wallet has already committed the transaction, so silence is
    /// reported as success. This may be a false `Confirmed`.
    AssumedAfterBudget { attempts: u32 },
}

impl ConfirmationOutcome {
    /// True when the network never actually reported finality.
    pub fn is_assumed(&self) -> bool {
        matches!(self, ConfirmationOutcome::AssumedAfterBudget { .. })
    }
}

/// Result of a lifecycle that reached `Confirmed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub lifecycle_id: Uuid,
    pub transaction_id: String,
    pub outcome: ConfirmationOutcome,
}

/// Status vocabulary reported by wallets and the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    Finalized,
    Confirmed,
    Failed,
    Rejected,
    /// Anything else is still pending.
    Pending(String),
}

impl TransactionStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Finalized" => TransactionStatus::Finalized,
            "Confirmed" => TransactionStatus::Confirmed,
            "Failed" => TransactionStatus::Failed,
            "Rejected" => TransactionStatus::Rejected,
            other => TransactionStatus::Pending(other.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TransactionStatus::Finalized | TransactionStatus::Confirmed)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TransactionStatus::Failed | TransactionStatus::Rejected)
    }

    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::Finalized => "Finalized",
            TransactionStatus::Confirmed => "Confirmed",
            TransactionStatus::Failed => "Failed",
            TransactionStatus::Rejected => "Rejected",
            TransactionStatus::Pending(raw) => raw,
        }
    }
}

/// Errors that terminate a lifecycle.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Wallet unavailable, user rejection, missing capability, timeout.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// The request failed validation before reaching the wallet.
    #[error("Invalid transaction request: {0}")]
    InvalidRequest(String),

    /// The network explicitly reported a terminal failure.
    #[error("Transaction {}", .status.to_lowercase())]
    RejectedOnChain { status: String },

    /// The lifecycle was reset or superseded, or the session went away.
    #[error("Transaction lifecycle cancelled")]
    Cancelled,

    /// Internal guard against out-of-order transitions.
    #[error("Invalid lifecycle transition from {from} to {to}")]
    InvalidTransition {
        from: LifecycleStatus,
        to: LifecycleStatus,
    },
}

/// Result type for lifecycle operations.
pub type TransactionResult<T> = Result<T, TransactionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleStatus::*;

    #[test]
    fn test_happy_path_transitions() {
        let path = [Idle, Preparing, Signing, Broadcasting, Confirming, Confirmed];
        for pair in path.windows(2) {
            assert!(pair[0].can_advance_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_no_skipping() {
        assert!(!Idle.can_advance_to(Signing));
        assert!(!Preparing.can_advance_to(Broadcasting));
        assert!(!Signing.can_advance_to(Confirming));
        assert!(!Broadcasting.can_advance_to(Confirmed));
        assert!(!Confirmed.can_advance_to(Preparing));
    }

    #[test]
    fn test_failure_only_from_in_flight() {
        for status in [Preparing, Signing, Broadcasting, Confirming] {
            assert!(status.can_advance_to(Failed));
        }
        assert!(!Idle.can_advance_to(Failed));
        assert!(!Confirmed.can_advance_to(Failed));
        assert!(!Failed.can_advance_to(Failed));
    }

    #[test]
    fn test_status_vocabulary() {
        assert!(TransactionStatus::parse("Finalized").is_success());
        assert!(TransactionStatus::parse("Confirmed").is_success());
        assert!(TransactionStatus::parse("Failed").is_failure());
        assert!(TransactionStatus::parse("Rejected").is_failure());

        let pending = TransactionStatus::parse("Broadcasting");
        assert!(!pending.is_success() && !pending.is_failure());
        assert_eq!(pending.as_str(), "Broadcasting");
    }

    #[test]
    fn test_rejected_message() {
        let err = TransactionError::RejectedOnChain {
            status: "Rejected".to_string(),
        };
        assert_eq!(err.to_string(), "Transaction rejected");
    }

    #[test]
    fn test_fresh_lifecycle_ids() {
        assert_ne!(TransactionLifecycle::new().id, TransactionLifecycle::new().id);
    }
}
