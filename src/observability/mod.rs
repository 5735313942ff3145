//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! wallet / transaction / content / network produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout via tracing-subscriber
//!     → any `metrics` recorder the host installs
//! ```

pub mod logging;
pub mod metrics;
