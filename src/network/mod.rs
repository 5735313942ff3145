//! Read-only access to the ledger's public REST API.

pub mod client;
pub mod programs;
pub mod types;

pub use client::LedgerClient;
pub use programs::ProgramQueries;
pub use types::{NetworkError, NetworkResult};
