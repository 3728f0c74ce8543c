//! A3S Tag Core - Foundational Types
//!
//! Error taxonomy, configuration and event types shared by the tag store
//! and its front-ends.

pub mod config;
pub mod error;
pub mod event;

// Re-export commonly used types
pub use config::{LogLevel, StoreConfig};
pub use error::{Result, TagError};
pub use event::{EventEmitter, TagEvent, TransferKind};

/// A3S Tag version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
