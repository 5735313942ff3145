//! Wallet-owned record queries.

pub mod query;
pub mod shapes;
pub mod types;

pub use query::RecordQuery;
pub use shapes::classify;
pub use types::{ClassifiedRecord, RecordKind, WalletRecord};
