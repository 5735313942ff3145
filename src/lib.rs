//! Pseudonymous publishing client.
//!
//! Drives wallet-signed transactions against the AnoneX programs on the
//! Aleo network: content is encrypted and content-addressed, its digest is
//! published on-chain, and every transaction moves through an observable
//! lifecycle until the network confirms it.

pub mod client;
pub mod config;
pub mod content;
pub mod network;
pub mod observability;
pub mod records;
pub mod transaction;
pub mod wallet;

pub use client::{AnonexClient, AnonexError, AnonexResult, IdentityOutcome, PublishOutcome};
pub use config::AppConfig;
pub use transaction::TransactionOrchestrator;
pub use wallet::WalletSession;
