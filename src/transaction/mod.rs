//! Transaction construction and lifecycle management.
//!
//! # Data Flow
//! ```text
//! ProgramCall builders ─▶ TransactionRequest (typed Literals)
//!                              │
//!                              ▼
//!                  TransactionOrchestrator ──▶ WalletSession
//!                              │
//!                              ▼
//!             watch<TransactionLifecycle> + broadcast<LifecycleEvent>
//! ```

pub mod calls;
pub mod literal;
pub mod orchestrator;
pub mod request;
pub mod types;

pub use calls::{text_digest, ProgramCall, Reaction};
pub use literal::{FieldElement, Literal, LiteralError, LiteralType, FIELD_MODULUS};
pub use orchestrator::TransactionOrchestrator;
pub use request::{CallRegistry, TransactionRequest};
pub use types::{
    ConfirmationOutcome, ExecutionReport, LifecycleEvent, LifecycleStatus, TransactionError,
    TransactionLifecycle, TransactionResult, TransactionStatus,
};
