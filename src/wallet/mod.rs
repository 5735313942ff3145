//! Wallet abstraction layer.
//!
//! # Data Flow
//! ```text
//! WalletSession
//!     ├── WalletAdapter (real backends, e.g. BridgeWallet)
//!     └── DemoWallet (simulated fallback)
//!
//! Orchestrators and record queries hold an Arc<WalletSession>
//! and observe it through `subscribe()`.
//! ```

pub mod adapter;
pub mod alias;
pub mod bridge;
pub mod demo;
pub mod persistence;
pub mod session;
pub mod types;

pub use adapter::WalletAdapter;
pub use alias::generate_pseudonym;
pub use bridge::BridgeWallet;
pub use demo::DemoWallet;
pub use session::WalletSession;
pub use types::{
    ConnectRequest, ConnectionState, DecryptPermission, ReadyState, SessionState, WalletError,
    Transition, WalletInfo, WalletMode, WalletResult, WalletTransaction,
};
