use thiserror::Error;

/// A3S tag store error types
#[derive(Error, Debug)]
pub enum TagError {
    /// Malformed repository or tag name
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Malformed digest or unsupported digest algorithm
    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    /// Attempted overwrite without force, or a digest collision
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Referenced repository, tag or image does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A pull or push already holds the operation key
    #[error("{kind} {key} is already in progress")]
    AlreadyInProgress { kind: String, key: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Persisted snapshot failed to parse
    #[error("Corrupt data in {path}: {message}")]
    CorruptData { path: String, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Image resolver failure other than "not found"
    #[error("Resolver error: {0}")]
    ResolverError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl TagError {
    /// True for errors a caller should report as "no such object".
    pub fn is_not_found(&self) -> bool {
        matches!(self, TagError::NotFound(_))
    }

    /// True for overwrite refusals and digest collisions.
    pub fn is_conflict(&self) -> bool {
        matches!(self, TagError::Conflict(_))
    }

    /// True for malformed caller input (names or digests).
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, TagError::InvalidName(_) | TagError::InvalidDigest(_))
    }
}

impl From<serde_json::Error> for TagError {
    fn from(err: serde_json::Error) -> Self {
        TagError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for TagError {
    fn from(err: serde_yaml::Error) -> Self {
        TagError::SerializationError(err.to_string())
    }
}

/// Result type alias for tag store operations
pub type Result<T> = std::result::Result<T, TagError>;
