//! A3S Tag Store - repository/tag index for the image store.
//!
//! Maps human-readable repository names, tags and content digests to image
//! ids, persists the mapping as a single JSON file, and arbitrates
//! concurrent pulls and pushes of the same repository.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────── TagStore ────────────────────────────┐
//! │  lock → reload → validate → mutate RepositoryIndex → save       │
//! │                                                                  │
//! │  ┌─────────────┐  ┌──────────────┐  ┌──────────────────────────┐ │
//! │  │ validate    │  │ persist      │  │ AdmissionPool (own lock) │ │
//! │  └─────────────┘  └──────────────┘  └──────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//!          │ ImageResolver                │ NameNormalizer
//! ```

#![allow(clippy::result_large_err)]

pub mod digest;
pub mod index;
pub mod normalize;
pub mod persist;
pub mod pool;
pub mod reference;
pub mod resolver;
pub mod store;
pub mod validate;

// Re-export common types
pub use digest::{compute_digest, Digest};
pub use index::{DigestRepository, Repository, RepositoryIndex};
pub use normalize::{IdentityNormalizer, LocalNameNormalizer, NameNormalizer};
pub use pool::{AdmissionPool, CompletionSignal};
pub use reference::{parse_repository_digest, parse_repository_tag, DEFAULT_TAG};
pub use resolver::{GraphDirResolver, ImageMetadata, ImageResolver, MemoryResolver};
pub use store::TagStore;
pub use validate::{validate_digest, validate_repository_name, validate_tag_name};

pub use a3s_tag_core::{EventEmitter, Result, StoreConfig, TagError, TagEvent, TransferKind};

/// A3S Tag Store version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
