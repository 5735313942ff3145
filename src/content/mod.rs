//! Content preparation and storage.
//!
//! # Data Flow
//! ```text
//! ContentPipeline
//!     ├── crypto (AES-256-GCM, SHA-256, Argon2id)
//!     ├── envelope (stored document format)
//!     └── ContentStore
//!           ├── IpfsClient (HTTP API + gateway)
//!           └── MemoryStore (in-process)
//! ```

pub mod crypto;
pub mod envelope;
pub mod ipfs;
pub mod memory;
pub mod pipeline;
pub mod store;
pub mod types;

pub use ipfs::IpfsClient;
pub use memory::MemoryStore;
pub use pipeline::ContentPipeline;
pub use store::ContentStore;
pub use types::{
    ContentEnvelope, ContentError, ContentReference, ContentResult, EncryptionMaterial,
    PreparedContent, SymmetricKey, UploadResult, Visibility,
};
