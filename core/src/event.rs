use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Kind of in-flight transfer tracked by the admission pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferKind {
    Pull,
    Push,
}

impl TransferKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferKind::Pull => "pull",
            TransferKind::Push => "push",
        }
    }
}

impl std::fmt::Display for TransferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag store event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TagEvent {
    /// A tag was created or replaced
    Tagged {
        repository: String,
        tag: String,
        image_id: String,
        replaced: Option<String>,
    },

    /// A single tag was removed
    Untagged { repository: String, tag: String },

    /// A whole repository entry was removed
    RepositoryRemoved { repository: String },

    /// A digest was recorded for a repository
    DigestRecorded {
        repository: String,
        digest: String,
        image_id: String,
    },

    /// A pull or push was admitted
    TransferStarted { kind: TransferKind, key: String },

    /// A pull or push was released
    TransferFinished { kind: TransferKind, key: String },
}

impl TagEvent {
    /// Dotted event key (e.g., "tag.created", "transfer.started").
    pub fn key(&self) -> &'static str {
        match self {
            TagEvent::Tagged { .. } => events::TAG_CREATED,
            TagEvent::Untagged { .. } => events::TAG_REMOVED,
            TagEvent::RepositoryRemoved { .. } => events::REPOSITORY_REMOVED,
            TagEvent::DigestRecorded { .. } => events::DIGEST_RECORDED,
            TagEvent::TransferStarted { .. } => events::TRANSFER_STARTED,
            TagEvent::TransferFinished { .. } => events::TRANSFER_FINISHED,
        }
    }
}

/// Event emitter
#[derive(Clone)]
pub struct EventEmitter {
    sender: Arc<broadcast::Sender<TagEvent>>,
}

impl EventEmitter {
    /// Create a new event emitter
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Emit an event. Having no subscribers is not an error.
    pub fn emit(&self, event: TagEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<TagEvent> {
        self.sender.subscribe()
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("receivers", &self.sender.receiver_count())
            .finish()
    }
}

/// Event catalog - predefined event keys
pub mod events {
    pub const TAG_CREATED: &str = "tag.created";
    pub const TAG_REMOVED: &str = "tag.removed";
    pub const REPOSITORY_REMOVED: &str = "repository.removed";
    pub const DIGEST_RECORDED: &str = "digest.recorded";
    pub const TRANSFER_STARTED: &str = "transfer.started";
    pub const TRANSFER_FINISHED: &str = "transfer.finished";
}
